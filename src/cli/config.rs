use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    draft::store::DEFAULT_MEDIUM_KEY,
    session::session_model::{NoticeTexts, SessionOptions, SessionTiming},
};

pub const DEFAULT_CONFIG_PATH: &str = "form-session.yaml";
pub const DEFAULT_STORE_PATH: &str = ".form-drafts.json";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-session",
    version,
    about = "Draft, validate and submit schema-driven table forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-session.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Draft store file (overrides config)
    #[arg(long, global = true)]
    pub store: Option<String>,
}

/// Which form a command acts on.
#[derive(Args, Debug, Clone, Default)]
pub struct FormArgs {
    /// Form schema YAML (fields + view metadata)
    #[arg(long)]
    pub schema: Option<String>,

    /// Table id (overrides the schema)
    #[arg(long)]
    pub table: Option<String>,

    /// View id (overrides the schema)
    #[arg(long)]
    pub view: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the storage key for a table/view pair
    Key {
        #[arg(long)]
        table: Option<String>,

        #[arg(long)]
        view: Option<String>,
    },

    /// Print the saved draft for a form
    Show {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Set one field of the draft
    Set {
        #[command(flatten)]
        form: FormArgs,

        /// Field id
        #[arg(long)]
        field: String,

        /// Value as JSON; anything that does not parse is taken as a string
        #[arg(long)]
        value: String,
    },

    /// Remove one field from the draft
    Clear {
        #[command(flatten)]
        form: FormArgs,

        /// Field id
        #[arg(long)]
        field: String,
    },

    /// Check required fields without submitting
    Verify {
        #[command(flatten)]
        form: FormArgs,
    },

    /// Verify and submit the draft, then clear it
    Submit {
        #[command(flatten)]
        form: FormArgs,

        /// POST the submission here instead of printing it
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Discard the draft without submitting
    Reset {
        #[command(flatten)]
        form: FormArgs,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-session.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub timing: SessionTiming,
    #[serde(default)]
    pub notify: NoticeTexts,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

impl AppConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            timing: self.timing.clone(),
            notices: self.notify.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,

    /// Key the whole draft mapping is stored under
    #[serde(default = "default_medium_key")]
    pub medium_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            medium_key: default_medium_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SubmitConfig {
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    /// JSONL trace file; tracing is off when unset
    pub path: Option<String>,
}

// Serde default helpers
fn default_store_path() -> String { DEFAULT_STORE_PATH.to_string() }
fn default_medium_key() -> String { DEFAULT_MEDIUM_KEY.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Map `-v` count to a log level filter: warn, info, debug, trace.
pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
