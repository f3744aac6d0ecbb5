use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Path of the external handler relative to the deployment's base URL.
pub const DEFAULT_HANDLER_PATH: &str = "/test_task_external_handler/index.php";

pub const DEFAULT_HANDLER_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub handler: HandlerConfig,
    pub nonce_secret: String,
    pub nonce_ttl: Duration,
    pub auth_token: Option<String>,
    pub auth_token_file: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("handler", &self.handler)
            .field("nonce_secret", &"***")
            .field("nonce_ttl", &self.nonce_ttl)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "***"))
            .field("auth_token_file", &self.auth_token_file)
            .field("max_body_size", &self.max_body_size)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Where and how submissions are relayed.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Explicit handler URL. When unset the URL is derived from `base_url`.
    pub url: Option<String>,
    /// Scheme forced onto the derived URL. Defaults to plain `http`, which is
    /// an environment convention rather than a security boundary.
    pub scheme: String,
    pub path: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source. `from_env` passes
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let nonce_secret = lookup("FORM_RELAY_NONCE_SECRET")
            .ok_or("Missing required environment variable: FORM_RELAY_NONCE_SECRET")?;
        if nonce_secret.is_empty() {
            return Err("FORM_RELAY_NONCE_SECRET must not be empty".to_string());
        }

        let host: IpAddr = env_or("FORM_RELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORM_RELAY_HOST: {e}"))?;

        let port: u16 = env_or("FORM_RELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORM_RELAY_PORT: {e}"))?;

        let base_url = env_or("FORM_RELAY_BASE_URL", &format!("http://{host}:{port}"));

        let timeout = match lookup("FORM_RELAY_HANDLER_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .map_err(|e| format!("Invalid FORM_RELAY_HANDLER_TIMEOUT_SECS: {e}"))?,
            ),
            None => DEFAULT_HANDLER_TIMEOUT,
        };

        let handler = HandlerConfig {
            url: lookup("FORM_RELAY_HANDLER_URL").filter(|s| !s.trim().is_empty()),
            scheme: env_or("FORM_RELAY_HANDLER_SCHEME", "http"),
            path: env_or("FORM_RELAY_HANDLER_PATH", DEFAULT_HANDLER_PATH),
            timeout,
        };

        let nonce_ttl_secs: u64 = env_or("FORM_RELAY_NONCE_TTL_SECS", "86400")
            .parse()
            .map_err(|e| format!("Invalid FORM_RELAY_NONCE_TTL_SECS: {e}"))?;

        let auth_token = lookup("FORM_RELAY_AUTH_TOKEN");
        let auth_token_file = PathBuf::from(env_or("FORM_RELAY_AUTH_TOKEN_FILE", "auth_token"));

        let max_body_size: usize = env_or("FORM_RELAY_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid FORM_RELAY_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("FORM_RELAY_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            base_url,
            handler,
            nonce_secret,
            nonce_ttl: Duration::from_secs(nonce_ttl_secs),
            auth_token,
            auth_token_file,
            max_body_size,
            log_level,
        })
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Config {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "https://example.com".to_string(),
            handler: HandlerConfig {
                url: None,
                scheme: "http".to_string(),
                path: DEFAULT_HANDLER_PATH.to_string(),
                timeout: DEFAULT_HANDLER_TIMEOUT,
            },
            nonce_secret: "test-nonce-secret".to_string(),
            nonce_ttl: Duration::from_secs(3600),
            auth_token: None,
            auth_token_file: PathBuf::from("auth_token"),
            max_body_size: 65_536,
            log_level: "warn".to_string(),
        }
    }

    /// The URL submissions are relayed to.
    pub fn handler_url(&self) -> String {
        match &self.handler.url {
            Some(url) => url.clone(),
            None => derive_handler_url(&self.base_url, &self.handler.scheme, &self.handler.path),
        }
    }
}

/// Join `path` onto `base_url` and replace its scheme with `scheme`.
pub fn derive_handler_url(base_url: &str, scheme: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let rest = base.split_once("://").map(|(_, rest)| rest).unwrap_or(base);
    let path = path.trim_start_matches('/');
    format!("{scheme}://{rest}/{path}")
}
