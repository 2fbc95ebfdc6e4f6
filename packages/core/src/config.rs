use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::interactions::EvidenceWeighting;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ASSESSMENTS_COLLECTION: &str = "interaction_assessments";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub interactions_file: Option<PathBuf>,
    pub evidence_weighting: EvidenceWeighting,
    pub backend: Option<BackendConfig>,
}

/// Hosted backend used to record assessments
#[derive(Clone)]
pub struct BackendConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key/value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|_| "BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        let interactions_file = get("INTERACTIONS_FILE").map(PathBuf::from);

        let evidence_weighting = match get("EVIDENCE_WEIGHTING") {
            Some(raw) => raw
                .parse::<EvidenceWeighting>()
                .map_err(|err| format!("EVIDENCE_WEIGHTING: {}", err))?,
            None => EvidenceWeighting::Compounding,
        };

        let backend = match get("BACKEND_URL") {
            Some(url) => Some(BackendConfig {
                url: url.trim_end_matches('/').to_string(),
                api_key: get("BACKEND_API_KEY"),
                collection: get("ASSESSMENTS_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_ASSESSMENTS_COLLECTION.to_string()),
            }),
            None => None,
        };

        Ok(Self {
            bind_addr,
            interactions_file,
            evidence_weighting,
            backend,
        })
    }

    /// Command-line flags take precedence over the environment.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bind_addr) = cli.bind_addr {
            self.bind_addr = bind_addr;
        }
        if let Some(path) = &cli.interactions_file {
            self.interactions_file = Some(path.clone());
        }
        if let Some(weighting) = cli.evidence_weighting {
            self.evidence_weighting = weighting;
        }
    }
}
