// Window size constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1100.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 720.0;
pub const DEFAULT_WINDOW_TITLE: &str = "Prompt Compare";

/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "PromptLane";
pub const APP_NAME: &str = "Prompt Compare";

/// App related Magic Numbers
pub const MAX_RECENT_FILES: usize = 10;
pub const AVATAR_COLOR_COUNT: u32 = 6;
pub const TOAST_TIMEOUT_MS: u64 = 5000;
pub const TOAST_HIDE_ANIMATION_MS: u64 = 300;
pub const RELOAD_DELAY_MS: u64 = 1500;
pub const TEAM_RELOAD_DELAY_MS: u64 = 1000;
pub const ROW_FADE_MS: u64 = 300;
pub const DEFAULT_INVITE_EXPIRY_HOURS: u32 = 48;

/// Placeholder substituted in the "set active version" URL template
pub const VERSION_NUMBER_PLACEHOLDER: &str = "VERSION_NUMBER";
pub const DEFAULT_SET_ACTIVE_URL: &str = "/prompts/VERSION_NUMBER/activate";

/// Generic message when the backend error payload has no usable text
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Diff renderer defaults
pub const DEFAULT_MATCHING_THRESHOLD: f32 = 0.25;
pub const DEFAULT_MAX_COMPARISONS: usize = 2500;

/// Dashboard card limits
pub const DASHBOARD_PROJECT_LIMIT: usize = 3;
pub const DASHBOARD_PROMPT_LIMIT: usize = 6;
pub const DASHBOARD_TEAM_LIMIT: usize = 6;

/// Admin dashboard reload timings
pub const DASHBOARD_REFRESH_MS: u64 = 1500;
pub const DASHBOARD_RANGE_RELOAD_MS: u64 = 1000;
