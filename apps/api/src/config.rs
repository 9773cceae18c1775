use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Which `HistoryStore` implementation backs score history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    File,
    Postgres,
    Memory,
}

impl HistoryBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("HISTORY_BACKEND must be one of file|postgres|memory, got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup on invalid values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub history_backend: HistoryBackend,
    pub history_dir: PathBuf,
    pub database_url: Option<String>,
    /// Upper bound on resumes scored in parallel in one recruiter batch.
    pub scoring_workers: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            history_backend: HistoryBackend::File,
            history_dir: PathBuf::from("score_history"),
            database_url: None,
            scoring_workers: default_workers(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let history_backend = match lookup("HISTORY_BACKEND") {
            Some(raw) => HistoryBackend::parse(&raw)?,
            None => defaults.history_backend,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if history_backend == HistoryBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL is required when HISTORY_BACKEND=postgres");
        }

        let scoring_workers = match lookup("SCORING_WORKERS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("SCORING_WORKERS must be a positive integer")?,
            None => defaults.scoring_workers,
        };
        if scoring_workers == 0 {
            bail!("SCORING_WORKERS must be at least 1");
        }

        let max_upload_bytes = match lookup("MAX_UPLOAD_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?
                .checked_mul(1024 * 1024)
                .context("MAX_UPLOAD_MB is too large")?,
            None => defaults.max_upload_bytes,
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            history_backend,
            history_dir: lookup("HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_dir),
            database_url,
            scoring_workers,
            max_upload_bytes,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.history_backend, HistoryBackend::File);
        assert_eq!(config.history_dir, PathBuf::from("score_history"));
        assert!(config.scoring_workers >= 1);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("HISTORY_BACKEND", "Memory"),
            ("HISTORY_DIR", "/tmp/scores"),
            ("SCORING_WORKERS", "3"),
            ("MAX_UPLOAD_MB", "2"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.history_backend, HistoryBackend::Memory);
        assert_eq!(config.history_dir, PathBuf::from("/tmp/scores"));
        assert_eq!(config.scoring_workers, 3);
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let err = config_from(&[("HISTORY_BACKEND", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let config = config_from(&[
            ("HISTORY_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/screener"),
        ])
        .unwrap();
        assert_eq!(config.history_backend, HistoryBackend::Postgres);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("HISTORY_BACKEND", "redis")]).is_err());
        assert!(config_from(&[("SCORING_WORKERS", "0")]).is_err());
        assert!(config_from(&[("SCORING_WORKERS", "many")]).is_err());
        assert!(config_from(&[("PORT", "99999")]).is_err());
        assert!(config_from(&[("MAX_UPLOAD_MB", "ten")]).is_err());
    }

    #[test]
    fn test_upload_limit_overflow_is_an_error() {
        let huge = usize::MAX.to_string();
        let err = config_from(&[("MAX_UPLOAD_MB", huge.as_str())]).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_MB is too large"));
    }
}
