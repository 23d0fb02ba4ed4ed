use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::session::probe::ProbeConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "page-probe",
    version,
    about = "In-page interaction instrumentation and cataloging"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: page-probe.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep a page description for directly assigned handler properties
    Scan {
        /// Path to a JSON page description
        #[arg(long)]
        page: String,

        /// Output format: console or json
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the structural address of every element in a page description
    Addresses {
        /// Path to a JSON page description
        #[arg(long)]
        page: String,
    },

    /// Instrument a page, replay a call script, and export the catalog
    Trace {
        /// Path to a JSON page description
        #[arg(long)]
        page: String,

        /// Path to a YAML call script
        #[arg(long)]
        script: String,

        /// Output format: console or json
        #[arg(long)]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Cap forwarded timer delays at this many milliseconds
        #[arg(long)]
        max_timer_delay: Option<f64>,

        /// Append one JSONL event per intercepted call to this file
        #[arg(long)]
        trace_file: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `page-probe.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub instrument: ProbeConfig,

    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_console")]
    pub format: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            format: "console".to_string(),
        }
    }
}

// Serde default helpers
fn default_console() -> String {
    "console".to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("page-probe.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build the effective ProbeConfig from resolved CLI/config values.
pub fn build_probe_config(
    base: &ProbeConfig,
    max_timer_delay: Option<f64>,
    trace_file: Option<&str>,
) -> ProbeConfig {
    ProbeConfig {
        max_timer_delay_ms: max_timer_delay.unwrap_or(base.max_timer_delay_ms),
        trace_file: trace_file
            .map(|p| p.to_string())
            .or_else(|| base.trace_file.clone()),
    }
}
