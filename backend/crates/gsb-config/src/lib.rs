mod config;
mod error;
mod log_level;
mod logging_config;
mod realtime_config;
mod retry_config;
mod session_config;
mod store_config;


pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use realtime_config::RealtimeConfig;
pub use retry_config::RetryConfig;
pub use session_config::SessionConfig;
pub use store_config::StoreConfig;

const CONFIG_DIR_ENV: &str = "GSB_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".gsb";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_STORE_URL: &str = "http://127.0.0.1:54321";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_STORAGE_KEY: &str = "gsb-supabase-auth";
const DEFAULT_SESSION_DIRECTORY: &str = "session";
const DEFAULT_COLLECTION: &str = "businesses";
const DEFAULT_CHANNEL_CAPACITY: usize = 256;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
