use anyhow::{anyhow, Result};

/// Static credentials and client settings for the upstream Meridian API.
/// Loaded once at process start; immutable afterwards.
#[derive(Debug, Clone)]
pub struct MeridianConfig {
    /// Upstream host, e.g. "https://api.meridian.example". No trailing slash.
    pub api_host: String,
    /// Account ID sent as X-User-ID and folded into the signature
    pub user_id: String,
    /// Shared secret folded into the signature, never sent on the wire
    pub api_secret: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Raises log verbosity to debug
    pub debug: bool,
}

impl MeridianConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_host = std::env::var("MERIDIAN_API_HOST")
            .map_err(|_| anyhow!("MERIDIAN_API_HOST environment variable not set"))?;
        let user_id = std::env::var("MERIDIAN_USER_ID")
            .map_err(|_| anyhow!("MERIDIAN_USER_ID environment variable not set"))?;
        let api_secret = std::env::var("MERIDIAN_API_SECRET")
            .map_err(|_| anyhow!("MERIDIAN_API_SECRET environment variable not set"))?;

        let timeout_secs = std::env::var("MERIDIAN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let debug = std::env::var("MERIDIAN_DEBUG")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self::new(api_host, user_id, api_secret, timeout_secs, debug)
    }

    /// Validate and normalize the raw values. Malformed credentials are a
    /// configuration error here, never a runtime one.
    pub fn new(
        api_host: String,
        user_id: String,
        api_secret: String,
        timeout_secs: u64,
        debug: bool,
    ) -> Result<Self> {
        let api_host = api_host.trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&api_host)
            .map_err(|e| anyhow!("MERIDIAN_API_HOST is not a valid URL: {e}"))?;
        if parsed.host_str().is_none() {
            return Err(anyhow!("MERIDIAN_API_HOST is missing a host"));
        }
        if user_id.is_empty() {
            return Err(anyhow!("MERIDIAN_USER_ID must not be empty"));
        }
        if api_secret.is_empty() {
            return Err(anyhow!("MERIDIAN_API_SECRET must not be empty"));
        }

        Ok(Self {
            api_host,
            user_id,
            api_secret,
            timeout_secs,
            debug,
        })
    }
}
