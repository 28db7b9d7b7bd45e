//! Runtime configuration from the command line and environment.
//!
//! | Flag | Variable | Meaning |
//! |---|---|---|
//! | `--initial-file` | `PRODES_DASHBOARD_FILE` | file loaded at startup, as if picked in Arquivo → Abrir… |
//! | `--export-path` | `PRODES_DASHBOARD_EXPORT` | default target of Arquivo → Exportar visualizações |
//!
//! Logging is configured separately through `RUST_LOG` (env_logger).

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_EXPORT_FILE: &str = "prodes_views.json";

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about = "PRODES deforestation dashboard")]
pub struct DashboardConfig {
    /// Dataset to load before the first frame
    #[arg(long, env = "PRODES_DASHBOARD_FILE", value_name = "FILE")]
    pub initial_file: Option<PathBuf>,

    /// Suggested file name for JSON export
    #[arg(
        long,
        env = "PRODES_DASHBOARD_EXPORT",
        value_name = "FILE",
        default_value = DEFAULT_EXPORT_FILE
    )]
    pub export_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_file: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_flags() {
        let cfg = DashboardConfig::try_parse_from(["prodes-dashboard"]).unwrap();
        if std::env::var_os("PRODES_DASHBOARD_FILE").is_none()
            && std::env::var_os("PRODES_DASHBOARD_EXPORT").is_none()
        {
            assert_eq!(cfg, DashboardConfig::default());
        }
    }

    #[test]
    fn reads_both_flags() {
        let cfg = DashboardConfig::try_parse_from([
            "prodes-dashboard",
            "--initial-file",
            "data/prodes.csv",
            "--export-path",
            "out/views.json",
        ])
        .unwrap();
        assert_eq!(cfg.initial_file, Some(PathBuf::from("data/prodes.csv")));
        assert_eq!(cfg.export_path, PathBuf::from("out/views.json"));
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(DashboardConfig::try_parse_from(["prodes-dashboard", "--bogus"]).is_err());
    }
}
