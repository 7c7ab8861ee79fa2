//! Form handlers - the interactive surface

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};

use crate::AppState;
use crate::assessment::{self, AssessmentRequest, FormSubmission, Outcome};
use crate::render;

/// Empty form with default values
pub async fn show() -> Html<String> {
    Html(render::page(&FormSubmission::from(&AssessmentRequest::default()), None))
}

/// Handle a submission and re-render the form with the outcome.
///
/// Always answers 200: every failure becomes a warning on the page so the
/// form stays usable for the next attempt. The inputs keep what was typed,
/// even when it did not parse.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<FormSubmission>, FormRejection>,
) -> Html<String> {
    let submitted = match form {
        Ok(Form(submitted)) => submitted,
        Err(rejection) => {
            // Wrong content type or an undecodable body; nothing to echo back
            tracing::warn!(error = %rejection.body_text(), "Rejected form submission");
            let outcome = Outcome::Warning(format!("Error processing request: {}", rejection.body_text()));
            return Html(render::page(&FormSubmission::from(&AssessmentRequest::default()), Some(&outcome)));
        }
    };

    let outcome = match submitted.parse() {
        Ok(req) => assessment::assess_outcome(&state.model, &req),
        Err(e) => {
            tracing::warn!(error = %e, "Unparseable form submission");
            Outcome::from_error(&e)
        }
    };

    Html(render::page(&submitted, Some(&outcome)))
}
