/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8123";

/// Environment fallback for `--secret`
pub const ENV_SECRET: &str = "UPLOAD_SECRET";
