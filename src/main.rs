use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use wgsync::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Up { config, interface } => commands::cmd_up(config, interface).await,
        Commands::Down { config, interface } => commands::cmd_down(config, interface).await,
        Commands::Render { config } => commands::cmd_render(config),
        Commands::Genkey => {
            commands::cmd_genkey();
            Ok(())
        }
        Commands::Pubkey => commands::cmd_pubkey(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
