use std::{path::PathBuf, time::Duration};

use clap::Args;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::logging::Verbosity;

pub const CONFIG_FILE: &str = "iisc.toml";
pub const ENV_PREFIX: &str = "IISC_";

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "defaults::api_base_url")]
    pub api_base_url: String,

    #[serde(default = "defaults::storage_file")]
    pub storage_file: PathBuf,

    #[serde(default = "defaults::verbosity")]
    pub verbosity: Verbosity,

    #[serde(default = "defaults::log_file")]
    pub log_file: PathBuf,

    // none by default: the transport's own behaviour applies
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn figment(args: &CliArgs) -> Figment {
        // merge semantic: bottom overrides top
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(args)) // CLI
    }

    pub fn load(args: &CliArgs) -> Result<Self, figment::Error> {
        Self::figment(args).extract()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

// kept apart from Config so that unset flags (`None`) are skipped instead of
// overriding values from the file or environment
#[derive(Args, Serialize, Deserialize, Debug, Default)]
pub struct CliArgs {
    /// Base URL of the intake service [default: https://iiscapis.bridgebrilliance.com]
    #[arg(short = 'u', long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// File holding the stored session [default: iisc-session.json]
    #[arg(short, long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,

    /// How much information to show and log [default: normal]
    #[arg(short, long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,

    /// File to log to, in append mode [default: /tmp/iisc-support.log]
    #[arg(short = 'f', long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,

    /// Give up on requests after this many seconds [no default]
    #[arg(short = 't', long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

// #[serde(default = "path")] only takes functions, hence these
mod defaults {
    use std::path::PathBuf;

    use crate::logging::Verbosity;

    pub fn api_base_url() -> String {
        "https://iiscapis.bridgebrilliance.com".to_owned()
    }

    pub fn storage_file() -> PathBuf {
        PathBuf::from("iisc-session.json")
    }

    pub const fn verbosity() -> Verbosity {
        Verbosity::Normal
    }

    pub fn log_file() -> PathBuf {
        PathBuf::from("/tmp/iisc-support.log")
    }
}
