use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bridge::relay::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::browser::session::DEFAULT_SCRIPT;
use crate::panel::panel::DEFAULT_FILL_DELAY;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "rexy",
    version,
    about = "Scan web forms and fill them with proposed values"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Inference endpoint used by the delegated proposer
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Path to config file (default: rexy.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Where the page comes from: a local HTML file or a live URL.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PageArgs {
    /// HTML file to load as the page
    #[arg(long, conflicts_with = "url", required_unless_present = "url")]
    pub html: Option<String>,

    /// URL to open in a browser session
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the page and list fields with proposed values
    Scan {
        #[command(flatten)]
        page: PageArgs,

        /// Proposer: heuristic or delegated
        #[arg(long)]
        strategy: Option<String>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,
    },

    /// Scan the page, then fill fields
    Fill {
        #[command(flatten)]
        page: PageArgs,

        /// Proposer: heuristic or delegated
        #[arg(long)]
        strategy: Option<String>,

        /// Fill only this field (repeatable; default: all fields)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Delay between fills in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Write the filled page HTML here (local pages only)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the sanitized markup that would be sent to the inference service
    Markup {
        #[command(flatten)]
        page: PageArgs,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `rexy.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_heuristic")]
    pub proposer: String,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub trace_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proposer: default_heuristic(),
            relay: RelayConfig::default(),
            panel: PanelConfig::default(),
            browser: BrowserConfig::default(),
            trace_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl RelayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_fill_delay_ms")]
    pub fill_delay_ms: u64,

    #[serde(default = "default_true")]
    pub autofill_enabled: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            fill_delay_ms: default_fill_delay_ms(),
            autofill_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_script")]
    pub script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
        }
    }
}

// Serde default helpers
fn default_heuristic() -> String { "heuristic".to_string() }
fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT.as_secs() }
fn default_connect_timeout_secs() -> u64 { DEFAULT_CONNECT_TIMEOUT.as_secs() }
fn default_fill_delay_ms() -> u64 { DEFAULT_FILL_DELAY.as_millis() as u64 }
fn default_true() -> bool { true }
fn default_script() -> String { DEFAULT_SCRIPT.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("rexy.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config file, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// CLI value first, then the config file.
pub fn resolve_strategy<'a>(cli: Option<&'a str>, config: &'a AppConfig) -> &'a str {
    cli.unwrap_or(&config.proposer)
}
