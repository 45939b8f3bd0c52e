mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use hubsub::config::Config;
use hubsub::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = Config::load(args.config)?;
            init_tracing(&config.telemetry.log_level);

            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }

            hubsub::api::run(config).await?;
        }
    }

    Ok(())
}
