use crate::preprocess::Preset;
use clap::Parser;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9393;
const DEFAULT_OCR_LANGUAGE: &str = "eng+tur";
const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;
const DEFAULT_TARGET_LANGUAGE: &str = "en";

#[derive(Parser, Debug)]
#[command(name = "menu-ocr-server")]
#[command(about = "Extracts, translates and searches menu items from menu photos")]
#[command(version)]
pub struct Args {
    /// Host address to bind to
    #[arg(long, env = "MENU_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "MENU_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// OCR languages, Tesseract style (e.g., "eng+tur")
    #[arg(long, env = "MENU_OCR_LANGUAGE", default_value = DEFAULT_OCR_LANGUAGE)]
    pub ocr_language: String,

    /// OCR engine used when a request does not name one
    #[arg(long, env = "MENU_OCR_ENGINE")]
    pub engine: Option<String>,

    /// Image preprocessing applied before recognition
    #[arg(long, env = "MENU_PREPROCESS", value_enum, default_value_t = Preset::Default)]
    pub preprocess: Preset,

    /// Maximum file size in bytes (default: 50MB)
    #[arg(long, env = "MENU_MAX_FILE_SIZE", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: usize,

    /// Path to tessdata directory (downloaded to the cache dir if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<PathBuf>,

    /// JSON file with noise filter rules ({"words": [...], "patterns": [...]})
    #[arg(long, env = "MENU_FILTER_RULES")]
    pub filter_rules: Option<PathBuf>,

    /// Base URL of a LibreTranslate-compatible service; translation is off without it
    #[arg(long, env = "MENU_TRANSLATE_URL")]
    pub translate_url: Option<String>,

    /// API key for the translation service
    #[arg(long, env = "MENU_TRANSLATE_API_KEY", hide_env_values = true)]
    pub translate_api_key: Option<String>,

    /// Target language when a request does not specify one
    #[arg(long, env = "MENU_DEFAULT_LANGUAGE", default_value = DEFAULT_TARGET_LANGUAGE)]
    pub default_language: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ocr_language: String,
    pub engine: Option<String>,
    pub preprocess: Preset,
    pub max_file_size: usize,
    pub tessdata_path: Option<PathBuf>,
    pub filter_rules: Option<PathBuf>,
    pub translate_url: Option<String>,
    pub translate_api_key: Option<String>,
    pub default_language: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            ocr_language: args.ocr_language,
            engine: args.engine,
            preprocess: args.preprocess,
            max_file_size: args.max_file_size,
            tessdata_path: args.tessdata_path,
            filter_rules: args.filter_rules,
            translate_url: args.translate_url.filter(|url| !url.is_empty()),
            translate_api_key: args.translate_api_key,
            default_language: args.default_language,
        }
    }
}

impl Default for Config {
    /// The command-line defaults, without consulting the environment
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            engine: None,
            preprocess: Preset::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            tessdata_path: None,
            filter_rules: None,
            translate_url: None,
            translate_api_key: None,
            default_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Individual languages of `ocr_language` ("eng+tur" -> ["eng", "tur"])
    pub fn ocr_languages(&self) -> Vec<String> {
        self.ocr_language
            .split('+')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}
