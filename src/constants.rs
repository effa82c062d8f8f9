/// Column and file naming constants shared across the pipeline.
/// Defaults here are what `Config::default()` starts from.

// Sheet columns
pub const FIELD_ID: &str = "ID";
pub const FIELD_NAME: &str = "Name";
pub const FIELD_VINTAGE: &str = "Vintage";
pub const FIELD_TYPE: &str = "Type";
pub const FIELD_REGION: &str = "Region";
pub const FIELD_PURCHASED_AT: &str = "Purchased at";
pub const FIELD_NOTES: &str = "Notes";

/// Admitted IDs must start with this letter, compared case-insensitively.
pub const ID_PREFIX: char = 'W';

// Source
pub const DEFAULT_SHEET_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/1KTddeuZ_0kmwKUqL612lr9dGiQTsD67JGwq9-NN1wAI/gviz/tq?tqx=out:csv&gid=1287485054";
pub const DEFAULT_USER_AGENT: &str = "cellar_sync/0.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Outputs
pub const DEFAULT_SNAPSHOT_PATH: &str = "wines.json";
pub const DEFAULT_PAGES_DIR: &str = "wine_pages";
pub const DEFAULT_LABEL_SHEET_PATH: &str = "wine_labels.pdf";
pub const PAGE_FILE_PREFIX: &str = "wine_";
pub const PAGE_FILE_EXT: &str = "html";

// Publishing
pub const DEFAULT_GITHUB_USER: &str = "tx3d3sign";
pub const DEFAULT_GITHUB_REPO: &str = "wine-db";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Update wines.json after Google Sheet sync";

/// Config file picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cellar_sync.toml";

// Environment overrides
pub const ENV_SHEET_CSV_URL: &str = "CELLAR_SHEET_CSV_URL";
pub const ENV_BASE_URL: &str = "CELLAR_BASE_URL";
pub const ENV_REPO_DIR: &str = "CELLAR_REPO_DIR";
