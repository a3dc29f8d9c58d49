use flarenet_core::error::CoreError;
use flarenet_core::policy::{ReconcilePolicy, DEFAULT_MANUAL_CONFIDENCE, DEFAULT_MATCH_THRESHOLD};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Matching threshold and manual confidence used by every reconciliation.
    pub policy: ReconcilePolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MATCH_IOU_THRESHOLD`  | `0.20`                     |
    /// | `MANUAL_CONFIDENCE`    | `1.0`                      |
    ///
    /// Panics on malformed values; misconfiguration should stop startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let policy = parse_policy(
            std::env::var("MATCH_IOU_THRESHOLD").ok().as_deref(),
            std::env::var("MANUAL_CONFIDENCE").ok().as_deref(),
        )
        .unwrap_or_else(|e| panic!("Invalid reconciliation policy: {e}"));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            policy,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Build the reconciliation policy from optional raw values.
pub fn parse_policy(
    match_threshold: Option<&str>,
    manual_confidence: Option<&str>,
) -> Result<ReconcilePolicy, CoreError> {
    let match_threshold =
        parse_f64(match_threshold, "MATCH_IOU_THRESHOLD", DEFAULT_MATCH_THRESHOLD)?;
    let manual_confidence =
        parse_f64(manual_confidence, "MANUAL_CONFIDENCE", DEFAULT_MANUAL_CONFIDENCE)?;
    ReconcilePolicy::new(match_threshold, manual_confidence)
}

fn parse_f64(raw: Option<&str>, name: &str, default: f64) -> Result<f64, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| CoreError::Validation(format!("{name} must be a number, got '{s}'"))),
    }
}
