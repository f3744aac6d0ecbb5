use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use rand::Rng;
use rand::distr::Alphanumeric;

pub const CREDENTIAL_LENGTH: usize = 32;

/// Shared secret sent as `X-Auth-Token` to the external handler.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredential(String);

impl ServiceCredential {
    pub fn new(token: impl Into<String>) -> Result<Self, String> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err("Service credential must not be empty".to_string());
        }
        Ok(Self(token.to_string()))
    }

    /// Generate a fresh alphanumeric credential.
    pub fn generate() -> Self {
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CREDENTIAL_LENGTH)
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Resolve the credential at startup: an explicit value wins, otherwise the
    /// persisted file is read, and if it does not exist a new credential is
    /// generated and written there so later starts reuse it.
    pub fn load_or_create(explicit: Option<&str>, path: &Path) -> Result<Self, String> {
        if let Some(token) = explicit {
            return Self::new(token);
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::new(contents).map_err(|e| format!("{e} ({})", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let credential = Self::generate();
                persist(path, credential.expose())
                    .map_err(|e| format!("Failed to persist service credential to {}: {e}", path.display()))?;
                tracing::info!("Generated new service credential at {}", path.display());
                Ok(credential)
            }
            Err(e) => Err(format!("Failed to read service credential from {}: {e}", path.display())),
        }
    }
}

/// Write a new credential file readable only by its owner.
fn persist(path: &Path, token: &str) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path)?.write_all(token.as_bytes())
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceCredential(***)")
    }
}
