use axum::{extract::Query, response::Html};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ErrorPageParams {
    pub msg: Option<String>,
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <title>{title}</title>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body {{
      font-family: system-ui, -apple-system, sans-serif;
      display: flex;
      align-items: center;
      justify-content: center;
      min-height: 100vh;
      margin: 0;
      background: #f5f8fa;
    }}
    .container {{
      text-align: center;
      padding: 2rem;
      background: white;
      border-radius: 12px;
      box-shadow: 0 2px 8px rgba(0,0,0,0.1);
      max-width: 32rem;
    }}
    h1 {{
      color: #33475b;
      margin-bottom: 0.5rem;
    }}
    p {{
      color: #516f90;
    }}
    a.button {{
      display: inline-block;
      margin-top: 1rem;
      padding: 0.75rem 1.5rem;
      border-radius: 4px;
      background: #ff7a59;
      color: white;
      text-decoration: none;
    }}
  </style>
</head>
<body>
  <div class="container">
{content}
  </div>
</body>
</html>"#,
        title = escape_html(title),
        content = content,
    )
}

pub fn login_page() -> String {
    render_page(
        "Connect HubSpot",
        r#"    <h1>Connect your HubSpot account</h1>
    <p>Authorize this app to read your CRM contacts.</p>
    <a class="button" href="/oauth">Login with HubSpot</a>"#,
    )
}

pub fn error_page(message: &str) -> String {
    render_page(
        "Error",
        &format!(
            r#"    <h1>Something went wrong</h1>
    <p>{}</p>
    <a class="button" href="/">Back to home</a>"#,
            escape_html(message)
        ),
    )
}

/// GET /error - Render the error page with the message from `msg`
pub async fn show_error(Query(params): Query<ErrorPageParams>) -> Html<String> {
    let message = params
        .msg
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string());
    Html(error_page(&message))
}
