//! HTTP front end (axum): paste form, clean endpoint, clean-and-answer endpoint.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::disclaimer;
use crate::gemini::{self, AnswerGenerator};

pub const EMPTY_INPUT_MESSAGE: &str = "Please paste some text first.";
pub const MISSING_KEY_MESSAGE: &str = "GEMINI_API_KEY not found! Set it before starting the server.";

/// Shared app state. `generator` is `None` when no API key was configured.
pub struct App {
    pub generator: Option<Box<dyn AnswerGenerator>>,
}

pub type AppState = Arc<App>;

/// Body for POST /clean and POST /generate, and params for GET /generate?text=...
#[derive(serde::Deserialize)]
pub struct TextInput {
    #[serde(default)]
    pub text: String,
}

#[derive(serde::Serialize, Debug)]
pub struct CleanResponse {
    pub cleaned: String,
}

#[derive(serde::Serialize, Debug)]
pub struct GenerateResponse {
    pub cleaned: String,
    pub answer: String,
}

#[derive(serde::Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Error half of every JSON handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/clean", post(clean_handler))
        .route("/generate", get(generate_query_handler).post(generate_handler))
        .with_state(state)
}

fn clean_text(text: &str) -> Result<String, ApiError> {
    disclaimer::clean(text).map_err(|e| {
        tracing::error!(error = %e, "disclaimer pattern failed to compile");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// POST /clean {text} -> {cleaned}
pub async fn clean_handler(Json(input): Json<TextInput>) -> Result<Json<CleanResponse>, ApiError> {
    let cleaned = clean_text(&input.text)?;
    Ok(Json(CleanResponse { cleaned }))
}

/// POST /generate {text} -> {cleaned, answer}
pub async fn generate_handler(
    State(app): State<AppState>,
    Json(input): Json<TextInput>,
) -> Result<Json<GenerateResponse>, ApiError> {
    answer(&app, &input.text).await.map(Json)
}

/// GET /generate?text=... -> same as POST.
pub async fn generate_query_handler(
    State(app): State<AppState>,
    Query(input): Query<TextInput>,
) -> Result<Json<GenerateResponse>, ApiError> {
    answer(&app, &input.text).await.map(Json)
}

async fn answer(app: &App, text: &str) -> Result<GenerateResponse, ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, EMPTY_INPUT_MESSAGE));
    }
    let Some(generator) = app.generator.as_deref() else {
        return Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, MISSING_KEY_MESSAGE));
    };
    let cleaned = clean_text(text)?;
    tracing::info!(input_len = text.len(), cleaned_len = cleaned.len(), "cleaned pasted text");

    match generator.generate(&gemini::build_prompt(&cleaned)).await {
        Ok(answer) => Ok(GenerateResponse { cleaned, answer }),
        Err(e) => {
            tracing::warn!(error = %e, "Gemini request failed");
            Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                format!("Error generating Gemini response: {e}"),
            ))
        }
    }
}

/// GET / -> static HTML paste form.
pub async fn index_page() -> axum::response::Html<&'static str> {
    const HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>CopyPastePro</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
    h1 { font-size: 1.5rem; }
    h2 { font-size: 1.1rem; margin-top: 1.5rem; }
    textarea { width: 100%; padding: 0.5rem; font-size: 1rem; box-sizing: border-box; }
    button { margin-top: 0.5rem; padding: 0.5rem 1rem; font-size: 1rem; cursor: pointer; }
    .hidden { display: none; }
    .warning { color: #8a6d00; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>CopyPastePro: Coursera Clean &amp; Copy Made Easy</h1>
  <form id="form">
    <label for="text">Paste your text here:</label>
    <textarea id="text" rows="12" autofocus></textarea>
    <button type="submit">Clean &amp; Generate Answer</button>
  </form>
  <p id="status"></p>
  <section id="cleaned-section" class="hidden">
    <h2>Cleaned Text:</h2>
    <textarea id="cleaned" rows="8" readonly></textarea>
  </section>
  <section id="answer-section" class="hidden">
    <h2>Gemini's Answer:</h2>
    <textarea id="answer" rows="8" readonly></textarea>
  </section>
  <script>
    const form = document.getElementById('form');
    const text = document.getElementById('text');
    const status = document.getElementById('status');
    const show = (id, value) => {
      document.getElementById(id).value = value;
      document.getElementById(id + '-section').classList.remove('hidden');
    };
    const hide = () => {
      for (const id of ['cleaned', 'answer']) {
        document.getElementById(id + '-section').classList.add('hidden');
      }
    };
    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      hide();
      if (!text.value.trim()) {
        status.className = 'warning';
        status.textContent = 'Please paste some text first.';
        return;
      }
      status.className = '';
      status.textContent = 'Generating Gemini response...';
      try {
        const r = await fetch('/generate', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ text: text.value }),
        });
        const body = await r.json();
        if (!r.ok) {
          status.className = r.status === 400 ? 'warning' : 'error';
          status.textContent = body.error;
          if (r.status === 502) {
            const c = await fetch('/clean', {
              method: 'POST',
              headers: { 'Content-Type': 'application/json' },
              body: JSON.stringify({ text: text.value }),
            });
            if (c.ok) show('cleaned', (await c.json()).cleaned);
          }
          return;
        }
        status.textContent = '';
        show('cleaned', body.cleaned);
        show('answer', body.answer);
      } catch (err) {
        status.className = 'error';
        status.textContent = 'Error: ' + err;
      }
    });
  </script>
</body>
</html>
"#;
    axum::response::Html(HTML)
}
