//! HTML for the single input form.

/// Client-side numeric check served at `/static/script.js`.
pub const SCRIPT_JS: &str = include_str!("../static/script.js");

/// What to show under the form after a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Error(String),
    Prediction(String),
}

pub fn render_index(outcome: Option<&Outcome>) -> String {
    let message = match outcome {
        Some(Outcome::Error(msg)) => format!(r#"<p class="error">{}</p>"#, escape(msg)),
        Some(Outcome::Prediction(text)) => format!(r#"<p class="prediction">{}</p>"#, escape(text)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>House Price Prediction</title>
  <style>
    body {{ font-family: sans-serif; max-width: 28rem; margin: 3rem auto; }}
    label, input {{ display: block; width: 100%; margin-bottom: .6rem; }}
    .error {{ color: #b00020; }}
    .prediction {{ font-weight: bold; }}
  </style>
</head>
<body>
  <h1>House Price Prediction</h1>
  <form id="predictionForm" action="/predict" method="post">
    <label for="area">Area (sq ft)</label>
    <input type="text" id="area" name="area" required>
    <label for="bhk">BHK</label>
    <input type="text" id="bhk" name="bhk" required>
    <label for="age">Age (years)</label>
    <input type="text" id="age" name="age" required>
    <label for="city">City</label>
    <input type="text" id="city" name="city" required>
    <label for="state">State</label>
    <input type="text" id="state" name="state" required>
    <input type="submit" value="Predict">
  </form>
  {message}
  <script src="/static/script.js"></script>
</body>
</html>
"#
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
