use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wgsync", about = "Declarative WireGuard interface manager", version)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bring an interface up and converge it to its configuration
    Up {
        /// Path to WireGuard config file
        config: PathBuf,

        /// Interface name (defaults to the config file stem)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Bring an interface down
    Down {
        /// Path to WireGuard config file
        config: PathBuf,

        /// Interface name (defaults to the config file stem)
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Parse a config file and print its canonical rendering
    Render {
        /// Path to WireGuard config file
        config: PathBuf,
    },

    /// Generate a new private key
    Genkey,

    /// Derive public key from private key (reads from stdin)
    Pubkey,
}
