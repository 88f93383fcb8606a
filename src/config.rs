use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Command-line / environment configuration for the dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "redbus-dashboard")]
#[command(about = "Browse, filter and export scraped bus route CSV files", long_about = None)]
pub struct Config {
    /// Directory containing the scraped `.csv` files
    #[arg(short, long, env = "REDBUS_DATA_DIR", default_value = "Redbus_data")]
    pub data_dir: PathBuf,

    /// Seconds a loaded directory stays cached before it is re-read
    #[arg(long, default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Print the overall summary as JSON and exit instead of opening a window
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cfg = Config::parse_from([
            "redbus-dashboard",
            "--data-dir",
            "/tmp/buses",
            "--cache-ttl-secs",
            "60",
            "--summary",
        ]);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/buses"));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(60));
        assert!(cfg.summary);
    }

    #[test]
    fn ttl_defaults_to_one_hour() {
        let cfg = Config::parse_from(["redbus-dashboard", "-d", "x"]);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(3600));
        assert!(!cfg.summary);
    }
}
