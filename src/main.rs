mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use jukebot::{api, catalog, config::Config, observability};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = Config::load()?;
            observability::init_tracing(&config.telemetry.log_filter);
            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }
            api::run(config).await?;
        }
        Commands::AuthorizeUrl => {
            let config = Config::load_settings()?;
            let url = catalog::authorize_url(&config.catalog, &Uuid::new_v4().simple().to_string())?;
            println!("{url}");
        }
    }

    Ok(())
}
