use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

/// vedad command-line arguments
#[derive(Debug, Parser)]
#[command(name = "vedad")]
#[command(about = "Learning analytics sidecar speaking JSON lines on stdin/stdout")]
#[command(version)]
pub struct Config {
    /// Dataset JSON to serve instead of the built-in fixture
    #[arg(long, env = "VEDA_DATASET")]
    pub dataset: Option<PathBuf>,

    /// Log level for stderr output
    #[arg(long, env = "VEDA_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn level(&self) -> Level {
        self.log_level.parse::<Level>().unwrap_or(Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_flag_is_optional() {
        let cfg = Config::try_parse_from(["vedad", "--log-level", "debug"]).expect("parse");
        assert_eq!(cfg.dataset, None);
        assert_eq!(cfg.level(), Level::DEBUG);

        let cfg = Config::try_parse_from(["vedad", "--dataset", "/tmp/course.json"]).expect("parse");
        assert_eq!(cfg.dataset, Some(PathBuf::from("/tmp/course.json")));
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let cfg = Config::try_parse_from(["vedad", "--log-level", "chatty"]).expect("parse");
        assert_eq!(cfg.level(), Level::INFO);
    }
}
