/// Default directory uploads are saved to
pub const DEFAULT_DIRECTORY: &str = "./";

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: &str = "8123";

/// Environment fallback for the port argument
pub const ENV_PORT: &str = "SERVER_PORT";

/// Environment fallback for `--ip`
pub const ENV_HOST: &str = "SERVER_HOST";

/// Environment fallback for `--directory`
pub const ENV_DIRECTORY: &str = "UPLOAD_DIR";

/// Environment fallback for `--secret`
pub const ENV_SECRET: &str = "UPLOAD_SECRET";
