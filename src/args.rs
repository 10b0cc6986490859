//! Command line interface

use crate::live::LiveConfig;
use clap::Parser;
use std::path::PathBuf;

/// A collaborative terminal line editor
#[derive(Parser, Debug)]
#[command(name = "duet", version, about)]
pub struct Args {
    /// Host a Live Share session on this port
    #[arg(long, value_name = "PORT", conflicts_with = "join")]
    pub host: Option<u16>,

    /// Join a Live Share session at HOST:PORT
    #[arg(long, value_name = "HOST:PORT")]
    pub join: Option<String>,

    /// One or two files to edit
    #[arg(value_name = "FILE", required = true, num_args = 1..=2)]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// The Live Share mode these arguments select
    #[must_use]
    pub fn live_config(&self) -> LiveConfig {
        match (self.host, &self.join) {
            (Some(port), _) => LiveConfig::Host(port),
            (None, Some(addr)) => LiveConfig::Join(addr.clone()),
            (None, None) => LiveConfig::Off,
        }
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
