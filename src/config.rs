// Command-line configuration. Every option has a default matching the
// public ITIS service, so running with no arguments starts the interactive
// search loop.

use crate::api::DEFAULT_BASE_URL;
use crate::cache::DEFAULT_CAPACITY;
use crate::fetch::RetryPolicy;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "taxa-lookup",
    version,
    about = "Look up an animal's common name and print its taxonomy"
)]
pub struct Config {
    /// Common names to look up once; with none, start the interactive loop.
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Base URL of the ITIS JSON web service.
    #[arg(long, env = "ITIS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Number of resolved names kept in memory.
    #[arg(long, default_value_t = DEFAULT_CAPACITY, value_parser = positive_usize)]
    pub cache_capacity: usize,

    /// Total attempts per request, the first included.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Per-attempt request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Backoff time unit in milliseconds; retry n waits unit * 2^n.
    #[arg(long, default_value_t = 1000)]
    pub backoff_ms: u64,

    /// Answer every disambiguation with this choice number instead of asking
    /// (0 cancels).
    #[arg(long, value_name = "N")]
    pub pick: Option<usize>,

    /// Print hierarchies as JSON.
    #[arg(long)]
    pub json: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn positive_usize(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl Config {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            timeout: Duration::from_secs(self.timeout_secs),
            backoff_unit: Duration::from_millis(self.backoff_ms),
        }
    }

    pub fn interactive(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = Config::try_parse_from(["taxa-lookup"]).unwrap();
        assert!(config.interactive());
        assert_eq!(config.cache_capacity, 100);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn positional_names_and_overrides() {
        let config = Config::try_parse_from([
            "taxa-lookup",
            "--max-attempts",
            "5",
            "--backoff-ms",
            "10",
            "--pick",
            "2",
            "bald eagle",
        ])
        .unwrap();
        assert!(!config.interactive());
        assert_eq!(config.names, vec!["bald eagle".to_string()]);
        assert_eq!(config.pick, Some(2));
        assert_eq!(config.retry_policy().backoff(1), Duration::from_millis(20));
    }

    #[test]
    fn rejects_zero_capacity_and_attempts() {
        assert!(Config::try_parse_from(["taxa-lookup", "--cache-capacity", "0"]).is_err());
        assert!(Config::try_parse_from(["taxa-lookup", "--max-attempts", "0"]).is_err());
    }
}
