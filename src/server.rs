use crate::config::Config;
use crate::engine::{OcrEngine, OcrResult};
use crate::engines::{EngineInfo, EngineRegistry};
use crate::error::MenuError;
use crate::menu::{extract_menu_items, FilterRules, MenuItem, NoiseFilter};
use crate::query::{process_query, ChatRequest, ChatResponse};
use crate::translate::{translate_items, LibreTranslateClient, Translator};
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Room for multipart boundaries and form fields on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engines: Arc<EngineRegistry>,
    pub filter: Arc<NoiseFilter>,
    pub translator: Option<Arc<dyn Translator>>,
    pub config: Arc<Config>,
}

/// OCR + extraction response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub text: String,
    pub menu_items: Vec<MenuItem>,
    pub engine: String,
    pub confidence: Option<f32>,
    pub translated_to: Option<String>,
    pub processing_time_ms: u64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub menu_items: Vec<MenuItem>,
    pub translated_to: Option<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "language")]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub default_engine: String,
    pub available_engines: Vec<EngineInfo>,
    pub max_file_size_bytes: usize,
    pub ocr_language: String,
    pub translation_enabled: bool,
    pub default_target_language: String,
    pub filter_words: usize,
    pub filter_patterns: usize,
}

impl AppState {
    /// Build OCR engines, filter rules and the translation client from config
    pub fn from_config(config: Config) -> Result<Self, MenuError> {
        let rules = match &config.filter_rules {
            Some(path) => {
                tracing::info!("Loading filter rules from {:?}", path);
                FilterRules::from_json_file(path)?
            }
            None => FilterRules::default(),
        };
        let filter = NoiseFilter::new(&rules)?;

        let translator: Option<Arc<dyn Translator>> = match &config.translate_url {
            Some(url) => {
                tracing::info!("Translating menu items via {}", url);
                Some(Arc::new(LibreTranslateClient::new(
                    url,
                    config.translate_api_key.clone(),
                )?))
            }
            None => {
                tracing::info!("No translation service configured; translation disabled");
                None
            }
        };

        let engines = EngineRegistry::new(&config)?;

        Ok(Self {
            engines: Arc::new(engines),
            filter: Arc::new(filter),
            translator,
            config: Arc::new(config),
        })
    }
}

/// Build the HTTP router
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .config
        .max_file_size
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/ocr", post(handle_ocr))
        .route("/ocr/:engine", post(handle_ocr_with_engine))
        .route("/extract", post(handle_extract))
        .route("/translate", post(handle_translate))
        .route("/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Handle OCR requests with the default engine
async fn handle_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, MenuError> {
    let engine = state
        .engines
        .default_engine()
        .ok_or_else(|| MenuError::Internal("No default OCR engine".to_string()))?;
    process_upload(state, engine, multipart).await
}

/// Handle OCR requests with an explicitly named engine
async fn handle_ocr_with_engine(
    State(state): State<AppState>,
    Path(engine_name): Path<String>,
    multipart: Multipart,
) -> Result<Json<OcrResponse>, MenuError> {
    let engine = state.engines.get(&engine_name).ok_or_else(|| {
        MenuError::InvalidRequest(format!(
            "Unknown engine '{}'. Available: {}",
            engine_name,
            state.engines.list().join(", ")
        ))
    })?;
    process_upload(state, engine, multipart).await
}

async fn process_upload(
    state: AppState,
    engine: Arc<dyn OcrEngine>,
    mut multipart: Multipart,
) -> Result<Json<OcrResponse>, MenuError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut language: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MenuError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" | "image" => {
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(field.bytes().await.map_err(|e| {
                    MenuError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?);
            }
            "language" => {
                let value = field.text().await.map_err(|e| {
                    MenuError::InvalidRequest(format!("Invalid language: {}", e))
                })?;
                language = Some(value.trim().to_string()).filter(|l| !l.is_empty());
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    let data = file_data.ok_or(MenuError::MissingFile)?;

    if data.len() > state.config.max_file_size {
        return Err(MenuError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    let extension = extension_for(&mime)?;

    let mut temp_file = tempfile::Builder::new()
        .suffix(extension)
        .tempfile()
        .map_err(|e| MenuError::Internal(format!("Failed to create temp file: {}", e)))?;

    temp_file
        .write_all(&data)
        .map_err(|e| MenuError::Internal(format!("Failed to write temp file: {}", e)))?;

    // Recognition is CPU bound; keep it off the async workers
    let ocr_engine = engine.clone();
    let OcrResult {
        text,
        confidence,
        mut warnings,
    } = tokio::task::spawn_blocking(move || ocr_engine.recognize(temp_file.path()))
        .await
        .map_err(|e| MenuError::Internal(format!("OCR task failed: {}", e)))??;

    let items = extract_menu_items(&text, &state.filter);
    let (menu_items, translated_to) =
        maybe_translate(&state, items, language.as_deref(), &mut warnings).await;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "OCR completed in {}ms with {}, {} chars, {} menu items",
        processing_time_ms,
        engine.name(),
        text.len(),
        menu_items.len()
    );

    Ok(Json(OcrResponse {
        text,
        menu_items,
        engine: engine.name().to_string(),
        confidence,
        translated_to,
        processing_time_ms,
        warnings,
    }))
}

/// Run the extraction pipeline over text OCR'd elsewhere
async fn handle_extract(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<ExtractResponse>, MenuError> {
    let Json(request) = payload.map_err(|e| MenuError::InvalidRequest(e.body_text()))?;

    let mut warnings = Vec::new();
    let items = extract_menu_items(&request.text, &state.filter);
    let (menu_items, translated_to) =
        maybe_translate(&state, items, request.language.as_deref(), &mut warnings).await;

    Ok(Json(ExtractResponse {
        menu_items,
        translated_to,
        warnings,
    }))
}

/// Translate a single piece of text
async fn handle_translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, MenuError> {
    let Json(request) = payload.map_err(|e| MenuError::InvalidRequest(e.body_text()))?;

    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| MenuError::InvalidRequest("Text is required.".to_string()))?;
    let target = requested_language(request.target_language.as_deref())
        .unwrap_or(&state.config.default_language)
        .to_string();

    let translator = state
        .translator
        .as_ref()
        .ok_or(MenuError::TranslationDisabled)?;
    let translated_text = translator.translate(&text, &target).await?;

    Ok(Json(TranslateResponse { translated_text }))
}

/// Answer a free-text query against a list of menu items
async fn handle_chat(
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, MenuError> {
    let Json(request) = payload.map_err(|e| MenuError::InvalidRequest(e.body_text()))?;
    let (query, candidates) = request.validate()?;

    let response = process_query(query, candidates);
    tracing::debug!(
        "Query {:?} matched {} of {} items",
        query,
        response.len(),
        candidates.len()
    );

    Ok(Json(ChatResponse { response }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    let rules = state.filter.rules();
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        default_engine: state.engines.default_name().to_string(),
        available_engines: state.engines.info(),
        max_file_size_bytes: state.config.max_file_size,
        ocr_language: state.config.ocr_language.clone(),
        translation_enabled: state.translator.is_some(),
        default_target_language: state.config.default_language.clone(),
        filter_words: rules.words.len(),
        filter_patterns: rules.patterns.len(),
    })
}

/// Translate items when a translator is configured.
///
/// Returns the items and the language they were translated to, if any.
async fn maybe_translate(
    state: &AppState,
    items: Vec<MenuItem>,
    language: Option<&str>,
    warnings: &mut Vec<String>,
) -> (Vec<MenuItem>, Option<String>) {
    let language = requested_language(language);
    let Some(translator) = state.translator.as_ref() else {
        if language.is_some() {
            warnings.push("Translation requested but no translation service is configured".to_string());
        }
        return (items, None);
    };

    if items.is_empty() {
        return (items, None);
    }

    let target = language.unwrap_or(&state.config.default_language);
    let translated = translate_items(translator.as_ref(), items, target).await;
    (translated, Some(target.to_string()))
}

/// A blank language field means "use the default"
fn requested_language(language: Option<&str>) -> Option<&str> {
    language.map(str::trim).filter(|l| !l.is_empty())
}

/// Temp file suffix for an uploaded MIME type
fn extension_for(mime: &str) -> Result<&'static str, MenuError> {
    let extension = match mime {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        "image/webp" => ".webp",
        "image/tiff" => ".tiff",
        "application/pdf" => ".pdf",
        "application/octet-stream" => ".tmp",
        other if other.starts_with("image/") => {
            tracing::warn!("Received file with content type: {}", other);
            ".tmp"
        }
        other => return Err(MenuError::UnsupportedFormat(other.to_string())),
    };
    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_known_types() {
        assert_eq!(extension_for("image/jpeg").unwrap(), ".jpg");
        assert_eq!(extension_for("application/pdf").unwrap(), ".pdf");
        assert_eq!(extension_for("image/heic").unwrap(), ".tmp");
        assert_eq!(extension_for("application/octet-stream").unwrap(), ".tmp");
    }

    #[test]
    fn test_extension_for_rejects_non_images() {
        assert!(matches!(
            extension_for("text/plain"),
            Err(MenuError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_startup_fails_on_unreadable_filter_rules() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            filter_rules: Some(dir.path().join("rules.json")),
            ..Config::default()
        };
        assert!(matches!(
            AppState::from_config(config).err(),
            Some(MenuError::InvalidFilterRules(_))
        ));
    }

    #[test]
    fn test_startup_fails_on_invalid_filter_pattern() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"patterns": ["(unclosed"]}"#).unwrap();
        let config = Config {
            filter_rules: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        assert!(matches!(
            AppState::from_config(config).err(),
            Some(MenuError::InvalidFilterRules(_))
        ));
    }

    #[test]
    fn test_blank_language_falls_back_to_default() {
        assert_eq!(requested_language(None), None);
        assert_eq!(requested_language(Some("")), None);
        assert_eq!(requested_language(Some("  ")), None);
        assert_eq!(requested_language(Some(" tr ")), Some("tr"));
    }

    #[test]
    fn test_translate_request_accepts_language_alias() {
        let request: TranslateRequest =
            serde_json::from_str(r#"{"text": "Su", "language": "en"}"#).unwrap();
        assert_eq!(request.target_language.as_deref(), Some("en"));

        let request: TranslateRequest =
            serde_json::from_str(r#"{"text": "Su", "targetLanguage": "fr"}"#).unwrap();
        assert_eq!(request.target_language.as_deref(), Some("fr"));
    }
}
