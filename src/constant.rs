// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1100.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 760.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Revitlegis - Revisor de Textos Legislativos";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "br";
pub const APP_ORGANIZATION: &str = "Revitlegis";
pub const APP_NAME: &str = "revitlegis";

/// Revision API defaults
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const API_KEY_HELP_URL: &str = "https://aistudio.google.com/app/apikey";

/// Font scale bounds for the text panels
pub const MIN_FONT_SCALE: f32 = 0.7;
pub const MAX_FONT_SCALE: f32 = 2.5;
pub const FONT_SCALE_STEP: f32 = 0.1;
pub const BASE_FONT_SIZE: f32 = 16.0;

/// How long copy confirmations stay visible, in milliseconds
pub const FLASH_DURATION_MS: u64 = 2000;
