//! Default Configuration Values
//!
//! This module centralizes the defaults the generator builder starts from.

use std::time::Duration;

/// Retry defaults
pub mod retry {
    use super::*;

    /// Attempts per logical call, the first one included
    pub const MAX_ATTEMPTS: u32 = 6;

    /// Fixed delay between attempts
    pub const DELAY: Duration = Duration::from_secs(5);
}

/// Environment variable names read by `GeneratorSettings::from_env`
pub mod env {
    pub const ROOT_URL: &str = "CLIENTGEN_ROOT_URL";
    pub const API_KEY: &str = "CLIENTGEN_API_KEY";
    pub const USER_AGENT: &str = "CLIENTGEN_USER_AGENT";
    pub const RETRY_MAX_ATTEMPTS: &str = "CLIENTGEN_RETRY_MAX_ATTEMPTS";
    pub const RETRY_DELAY_MS: &str = "CLIENTGEN_RETRY_DELAY_MS";
    pub const DISABLE_RETRIES: &str = "CLIENTGEN_DISABLE_RETRIES";
    pub const DISABLE_CACHING: &str = "CLIENTGEN_DISABLE_CACHING";
}

/// `"<application> v<version>"`, where the application is the running
/// executable's file stem.
pub fn default_user_agent() -> String {
    let application = std::env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    format!("{application} v{}", env!("CARGO_PKG_VERSION"))
}
