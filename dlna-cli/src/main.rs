use clap::{ArgAction, Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

mod commands;
mod logging;

/// DLNA media renderer control tool
///
/// Discovers renderers on the local network and plays, stops or inspects
/// media on them.
#[derive(Parser, Debug)]
#[command(name = "dlna")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Discover DLNA devices on the network
    Discover {
        /// Scan timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,

        /// Print the devices as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a media URL or local file on a device
    Play {
        /// Media URL (http://...) or path to a local file
        url: String,

        /// Device name; the configured default is used when omitted
        device: Option<String>,

        /// Scan timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,

        /// Port for serving a local file (0 picks a free port)
        #[arg(short, long, default_value = "0")]
        port: u16,
    },

    /// Stop playback on a device
    Stop {
        /// Device name; the configured default is used when omitted
        device: Option<String>,

        /// Scan timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,
    },

    /// Show the playback state of a device
    Status {
        /// Device name; the configured default is used when omitted
        device: Option<String>,

        /// Scan timeout in seconds
        #[arg(short, long, default_value = "5")]
        timeout: u64,
    },

    /// Manage the default device
    Config {
        /// Set the default device name
        #[arg(short, long, conflicts_with_all = ["unset_device", "show"])]
        device: Option<String>,

        /// Clear the default device
        #[arg(long, conflicts_with = "show")]
        unset_device: bool,

        /// Show the current configuration
        #[arg(short, long)]
        show: bool,
    },
}

/// Convert a timeout argument in seconds to a Duration
pub fn timeout_secs(secs: u64) -> Duration {
    Duration::from_secs(secs)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    match commands::run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
