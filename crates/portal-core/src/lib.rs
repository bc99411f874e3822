pub mod app_config;
pub mod config;
pub mod cookies;
pub mod date_range;
pub mod error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use cookies::{load_cookies, Cookie, CookieSet};
pub use date_range::DateRange;
pub use error::{ConfigError, CookieError};
