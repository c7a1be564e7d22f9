mod progress;
mod variants;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_core::DEFAULT_PROGRESS_MESSAGE;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "storefront-cli")]
#[command(about = "Inspect storefront carts and variant data from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the free-shipping progress message for the live cart
    CartProgress {
        /// Free-shipping threshold in minor units (e.g. 10000 for 100,00 €)
        #[arg(long)]
        threshold: i64,
        /// Message template; `[[amount]]` is replaced by the missing amount
        #[arg(long, default_value = DEFAULT_PROGRESS_MESSAGE)]
        message: String,
        /// Shop `money_format` template, e.g. "{{amount_with_comma_separator}} €"
        #[arg(long)]
        money_format: Option<String>,
    },
    /// Print the variant a cross-sell card would pick for a selection
    ResolveVariant {
        /// JSON file holding the embedded variant list
        #[arg(long)]
        variants: PathBuf,
        /// Option values in select order; repeat for each select
        #[arg(long = "option", conflicts_with = "id")]
        options: Vec<String>,
        /// Hidden variant id, for cards without option selects
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = storefront_core::load_storefront_config();
    let log_level = config
        .as_ref()
        .map_or(DEFAULT_LOG_LEVEL, |c| c.log_level.as_str())
        .to_owned();
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::CartProgress {
            threshold,
            message,
            money_format,
        } => {
            let config = config?;
            progress::run_cart_progress(&config, threshold, &message, money_format.as_deref())
                .await?;
        }
        Commands::ResolveVariant {
            variants: path,
            options,
            id,
        } => variants::run_resolve_variant(&path, &options, id.as_deref())?,
    }

    Ok(())
}
