//! Router tests for the form and JSON surfaces
//!
//! Each test drives the full router with a substitute classifier.

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::assessment::{HIGH_RISK_MESSAGE, LOW_RISK_MESSAGE};
    use crate::model::testing::{FailingClassifier, FixedClassifier, RecordingClassifier};
    use crate::model::{Classifier, ModelHandle};
    use crate::{create_router, AppState};

    const SCENARIO_FORM: &str = "age=45&sex=Male&bmi=28.5&hba1c=6.5&hypertension=No\
        &heart_disease=No&smoking_history=Former+smoker&glucose=140";

    fn app_with(classifier: impl Classifier + 'static) -> Router {
        app_with_handle(ModelHandle::from_classifier(classifier))
    }

    fn app_with_handle(model: ModelHandle) -> Router {
        create_router(AppState {
            model: Arc::new(model),
        })
    }

    async fn body_string(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_form_renders_without_outcome() {
        let (status, html) = body_string(app_with(FixedClassifier::new(vec![1])), get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Diabetes Risk Assessment"));
        assert!(!html.contains(HIGH_RISK_MESSAGE));
        assert!(!html.contains(LOW_RISK_MESSAGE));
    }

    #[tokio::test]
    async fn test_form_high_risk() {
        let (status, html) = body_string(app_with(FixedClassifier::new(vec![1])), form_post(SCENARIO_FORM)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(HIGH_RISK_MESSAGE));
        assert!(html.contains("outcome error"));
    }

    #[tokio::test]
    async fn test_form_low_risk() {
        let (status, html) = body_string(app_with(FixedClassifier::new(vec![0])), form_post(SCENARIO_FORM)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(LOW_RISK_MESSAGE));
        assert!(html.contains("outcome success"));
    }

    #[tokio::test]
    async fn test_form_keeps_submitted_values() {
        let (_, html) = body_string(app_with(FixedClassifier::new(vec![0])), form_post(SCENARIO_FORM)).await;
        assert!(html.contains(r#"value="45""#));
        assert!(html.contains(r#"value="28.5""#));
        assert!(html.contains(r#"<option value="Former smoker" selected>"#));
    }

    #[tokio::test]
    async fn test_form_model_failure_is_warning() {
        let app = app_with(FailingClassifier::new("input has 7 features, expected 8"));
        let (status, html) = body_string(app, form_post(SCENARIO_FORM)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("outcome warning"));
        assert!(html.contains("Error processing request: "));
        assert!(html.contains("input has 7 features, expected 8"));
    }

    #[tokio::test]
    async fn test_form_usable_after_failure() {
        let model = Arc::new(RecordingClassifier::new(1));
        let app = app_with_handle(ModelHandle::from_shared(model.clone()));

        let bad = SCENARIO_FORM.replace("Former+smoker", "Pipe");
        let (_, html) = body_string(app.clone(), form_post(&bad)).await;
        assert!(html.contains("outcome warning"));
        assert!(html.contains("Pipe"));

        let (_, html) = body_string(app, form_post(SCENARIO_FORM)).await;
        assert!(html.contains(HIGH_RISK_MESSAGE));
        assert_eq!(model.seen().len(), 1);
    }

    #[tokio::test]
    async fn test_form_out_of_range_is_warning() {
        let body = SCENARIO_FORM.replace("glucose=140", "glucose=400");
        let (status, html) = body_string(app_with(FixedClassifier::new(vec![0])), form_post(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("outcome warning"));
        assert!(html.contains("glucose must be between 50 and 300"));
    }

    #[tokio::test]
    async fn test_form_malformed_number_is_warning() {
        let model = Arc::new(RecordingClassifier::new(0));
        let app = app_with_handle(ModelHandle::from_shared(model.clone()));

        let body = SCENARIO_FORM.replace("age=45", "age=forty");
        let (status, html) = body_string(app, form_post(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("outcome warning"));
        assert!(html.contains("Error processing request: "));
        assert!(model.seen().is_empty());
    }

    #[tokio::test]
    async fn test_form_malformed_number_keeps_other_values() {
        let body = SCENARIO_FORM.replace("age=45", "age=forty");
        let (_, html) = body_string(app_with(FixedClassifier::new(vec![0])), form_post(&body)).await;
        assert!(html.contains(r#"name="age" min="18" max="120" step="1" value="forty""#));
        assert!(html.contains(r#"value="28.5""#));
        assert!(html.contains(r#"value="6.5""#));
        assert!(html.contains(r#"value="140""#));
        assert!(html.contains(r#"<option value="Former smoker" selected>"#));
        assert!(!html.contains(r#"<option value="Never smoked" selected>"#));
    }

    #[tokio::test]
    async fn test_form_shows_the_assessed_value() {
        let model = Arc::new(RecordingClassifier::new(1));
        let app = app_with_handle(ModelHandle::from_shared(model.clone()));

        let body = SCENARIO_FORM.replace("bmi=28.5", "bmi=31.25").replace("hba1c=6.5", "hba1c=6.45");
        let (_, html) = body_string(app, form_post(&body)).await;
        assert!(html.contains(HIGH_RISK_MESSAGE));
        assert!(html.contains(r#"value="31.25""#));
        assert!(html.contains(r#"value="6.45""#));
        assert_eq!(model.seen(), vec![vec![45.0, 1.0, 31.25, 0.0, 0.0, 3.0, 6.45, 140.0]]);
    }

    #[tokio::test]
    async fn test_form_wrong_content_type_is_warning() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(SCENARIO_FORM))
            .unwrap();
        let (status, html) = body_string(app_with(FixedClassifier::new(vec![1])), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("outcome warning"));
        assert!(!html.contains(HIGH_RISK_MESSAGE));
    }

    #[tokio::test]
    async fn test_form_passes_encoded_vector() {
        let model = Arc::new(RecordingClassifier::new(0));
        let app = app_with_handle(ModelHandle::from_shared(model.clone()));

        let body = "age=30&sex=Female&bmi=22.0&hba1c=5.0&hypertension=Yes\
            &heart_disease=Yes&smoking_history=Current+smoker&glucose=95";
        body_string(app, form_post(body)).await;

        assert_eq!(model.seen(), vec![vec![30.0, 0.0, 22.0, 1.0, 1.0, 1.0, 5.0, 95.0]]);
    }

    #[tokio::test]
    async fn test_json_assess() {
        let request = serde_json::json!({
            "age": 45, "sex": "Male", "bmi": 28.5, "hba1c": 6.5,
            "hypertension": "No", "heart_disease": "No",
            "smoking_history": "Former smoker", "glucose": 140
        });
        let (status, body) = body_string(
            app_with(FixedClassifier::new(vec![1])),
            json_post("/api/v1/assess", request),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["risk"], "high");
        assert_eq!(json["label"], 1);
        assert_eq!(json["message"], HIGH_RISK_MESSAGE);
        assert_eq!(json["features"], serde_json::json!([45.0, 1.0, 28.5, 0.0, 0.0, 3.0, 6.5, 140.0]));
        assert!(json["assessment_id"].is_string());
    }

    #[tokio::test]
    async fn test_json_invalid_category() {
        let request = serde_json::json!({
            "age": 45, "sex": "Unknown", "bmi": 28.5, "hba1c": 6.5,
            "hypertension": "No", "heart_disease": "No",
            "smoking_history": "Former smoker", "glucose": 140
        });
        let (status, body) = body_string(
            app_with(FixedClassifier::new(vec![1])),
            json_post("/api/v1/assess", request),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], 400);
        assert!(json["error"].as_str().unwrap().contains("Unknown"));
    }

    #[tokio::test]
    async fn test_json_missing_field() {
        let request = serde_json::json!({ "age": 45 });
        let (status, _) = body_string(
            app_with(FixedClassifier::new(vec![1])),
            json_post("/api/v1/assess", request),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_json_model_failure() {
        let request = serde_json::json!({
            "age": 30, "sex": "Female", "bmi": 22.0, "hba1c": 5.0,
            "hypertension": "Yes", "heart_disease": "Yes",
            "smoking_history": "Current smoker", "glucose": 95
        });
        let (status, body) = body_string(
            app_with(FailingClassifier::new("session poisoned")),
            json_post("/api/v1/assess", request),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("session poisoned"));
    }

    #[tokio::test]
    async fn test_model_status() {
        let app = app_with(FixedClassifier::new(vec![0]));
        let (status, body) = body_string(app, get("/api/v1/model")).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["loaded"], true);
        assert_eq!(json["kind"], "fixed");
        assert_eq!(json["layout"]["feature_count"], 8);
        assert_eq!(json["layout"]["feature_names"][5], "smoking_history");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = body_string(app_with(FixedClassifier::new(vec![0])), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("healthy"));
    }
}
