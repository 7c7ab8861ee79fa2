//! HTML rendering for the assessment form

use std::fmt::Write;

use crate::assessment::request::limits;
use crate::assessment::{Categorical, FormSubmission, Outcome, RiskLevel, Sex, SmokingHistory, YesNo};

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }
.field { margin-bottom: 1rem; }
.field > label, fieldset > legend { display: block; font-weight: 600; margin-bottom: .25rem; }
fieldset { border: none; padding: 0; }
input[type=number], select { width: 100%; padding: .4rem; }
.outcome { margin-top: 1.5rem; padding: 1rem; border-radius: .4rem; }
.error { background: #fde8e8; color: #9b1c1c; }
.success { background: #e6f4ea; color: #1e6b34; }
.warning { background: #fff8e1; color: #8a5300; }
"#;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn number_input(out: &mut String, name: &str, label: &str, value: &str, min: String, max: String, step: &str) {
    let value = escape_html(value);
    let _ = write!(
        out,
        r#"<div class="field"><label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" min="{min}" max="{max}" step="{step}" value="{value}" required></div>"#,
    );
}

fn radio_group<T: Categorical>(out: &mut String, name: &str, legend: &str, selected: &str) {
    let _ = write!(out, r#"<fieldset class="field"><legend>{}</legend>"#, legend);
    for option in T::labels() {
        let checked = if option == selected { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<label><input type="radio" name="{name}" value="{option}"{checked}> {option}</label> "#,
        );
    }
    out.push_str("</fieldset>");
}

fn select<T: Categorical>(out: &mut String, name: &str, label: &str, selected: &str) {
    let _ = write!(
        out,
        r#"<div class="field"><label for="{name}">{label}</label><select id="{name}" name="{name}">"#,
    );
    for option in T::labels() {
        let sel = if option == selected { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{option}"{sel}>{option}</option>"#);
    }
    out.push_str("</select></div>");
}

fn outcome_banner(outcome: &Outcome) -> String {
    let class = match outcome {
        Outcome::Risk(RiskLevel::High) => "error",
        Outcome::Risk(RiskLevel::Low) => "success",
        Outcome::Warning(_) => "warning",
    };
    format!(
        r#"<div class="outcome {}" role="status">{}</div>"#,
        class,
        escape_html(outcome.message())
    )
}

/// Render the full page. `values` pre-fills the inputs as submitted,
/// `outcome` is shown below the form when present.
pub fn page(values: &FormSubmission, outcome: Option<&Outcome>) -> String {
    let mut form = String::new();

    form.push_str(r#"<div class="columns"><div class="column">"#);
    number_input(
        &mut form,
        "age",
        "Age (years)",
        &values.age,
        limits::AGE.0.to_string(),
        limits::AGE.1.to_string(),
        "1",
    );
    radio_group::<Sex>(&mut form, "sex", "Gender", &escape_html(&values.sex));
    number_input(
        &mut form,
        "bmi",
        "BMI",
        &values.bmi,
        format!("{:.1}", limits::BMI.0),
        format!("{:.1}", limits::BMI.1),
        "0.1",
    );
    number_input(
        &mut form,
        "hba1c",
        "HbA1c Level",
        &values.hba1c,
        format!("{:.1}", limits::HBA1C.0),
        format!("{:.1}", limits::HBA1C.1),
        "0.1",
    );
    form.push_str(r#"</div><div class="column">"#);
    radio_group::<YesNo>(&mut form, "hypertension", "Hypertension", &escape_html(&values.hypertension));
    radio_group::<YesNo>(&mut form, "heart_disease", "Heart Disease", &escape_html(&values.heart_disease));
    select::<SmokingHistory>(&mut form, "smoking_history", "Smoking History", &escape_html(&values.smoking_history));
    number_input(
        &mut form,
        "glucose",
        "Blood Glucose (mg/dL)",
        &values.glucose,
        limits::GLUCOSE.0.to_string(),
        limits::GLUCOSE.1.to_string(),
        "1",
    );
    form.push_str("</div></div>");

    let banner = outcome.map(outcome_banner).unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Diabetes Predictor</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<h1>Diabetes Risk Assessment</h1>
<p>Enter your health information to assess diabetes risk</p>
<form id="health_form" method="post" action="/">
{form}
<button type="submit">Assess Risk</button>
</form>
{banner}
</main>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AssessmentRequest, HIGH_RISK_MESSAGE, LOW_RISK_MESSAGE};

    fn defaults() -> FormSubmission {
        FormSubmission::from(&AssessmentRequest::default())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_page_has_all_fields() {
        let html = page(&defaults(), None);
        for name in ["age", "sex", "bmi", "hba1c", "hypertension", "heart_disease", "smoking_history", "glucose"] {
            assert!(html.contains(&format!(r#"name="{}""#, name)), "missing {}", name);
        }
        assert!(html.contains("Assess Risk"));
        assert!(!html.contains("class=\"outcome"));
    }

    #[test]
    fn test_page_ranges_and_defaults() {
        let html = page(&defaults(), None);
        assert!(html.contains(r#"name="age" min="18" max="120" step="1" value="18""#));
        assert!(html.contains(r#"name="bmi" min="10.0" max="50.0" step="0.1" value="10.0""#));
        assert!(html.contains(r#"name="glucose" min="50" max="300" step="1" value="50""#));
        assert!(html.contains(r#"value="Male" checked"#));
        assert!(html.contains(r#"<option value="Never smoked" selected>"#));
    }

    #[test]
    fn test_page_shows_values_as_submitted() {
        let values = FormSubmission {
            bmi: "31.25".to_string(),
            hba1c: "6.45".to_string(),
            age: "forty".to_string(),
            ..defaults()
        };
        let html = page(&values, None);
        assert!(html.contains(r#"name="bmi" min="10.0" max="50.0" step="0.1" value="31.25""#));
        assert!(html.contains(r#"name="hba1c" min="3.0" max="15.0" step="0.1" value="6.45""#));
        assert!(html.contains(r#"name="age" min="18" max="120" step="1" value="forty""#));
    }

    #[test]
    fn test_submitted_values_are_escaped() {
        let values = FormSubmission {
            glucose: r#""><script>"#.to_string(),
            ..defaults()
        };
        let html = page(&values, None);
        assert!(html.contains(r#"value="&quot;&gt;&lt;script&gt;""#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_outcome_banners() {
        let high = page(&defaults(), Some(&Outcome::Risk(RiskLevel::High)));
        assert!(high.contains("outcome error"));
        assert!(high.contains(HIGH_RISK_MESSAGE));

        let low = page(&defaults(), Some(&Outcome::Risk(RiskLevel::Low)));
        assert!(low.contains("outcome success"));
        assert!(low.contains(LOW_RISK_MESSAGE));
    }

    #[test]
    fn test_warning_is_escaped() {
        let warning = Outcome::Warning("Error processing request: <script>".to_string());
        let html = page(&defaults(), Some(&warning));
        assert!(html.contains("outcome warning"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
