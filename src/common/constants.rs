/// Constants shared across the sync pipeline.
/// The upstream sheet is a human-maintained spreadsheet, so the markers below
/// are matched case-insensitively against trimmed cell text.

// Upstream sheet names
pub const SUBSCRIPTION_SHEET: &str = "Subscription";

// Row filter markers
pub const SERIAL_HEADER_LABEL: &str = "serial no";
pub const SECTION_MARKER: &str = "create subscription";

// Normalization
pub const DEFAULT_TEXT: &str = "N/A";
pub const SERIAL_PREFIX: &str = "SN-";
pub const SERIAL_MIN_DIGITS: usize = 3;
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DEFAULT_RENEWAL_COUNT: &str = "0";

// Record identity
pub const RECORD_ID_PREFIX: &str = "sub";

// Approval status values (compared case-insensitively)
pub const APPROVAL_APPROVED: &str = "approved";
pub const APPROVAL_REJECTED: &str = "rejected";

// Fetch
pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch subscriptions";
pub const CACHE_BUST_PARAM: &str = "_t";
pub const SHEET_PARAM: &str = "sheet";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

// Configuration
pub const DEFAULT_CONFIG_PATH: &str = "subscription_sync.toml";
pub const ENV_SCRIPT_URL: &str = "SUBSCRIPTION_SCRIPT_URL";
pub const ENV_SHEET: &str = "SUBSCRIPTION_SHEET";
