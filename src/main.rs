use std::env;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::Requester;

use kinethos::app::{bot_from_config, build_handler, load_aws_config};
use kinethos::cli::{Cli, Commands};
use kinethos::core::{config::Config, init_logger, log_startup_configuration};
use kinethos::telegram::{register_webhook, setup_bot_commands};
use kinethos::webhook::{run_lambda, start_webhook_server};

/// Main entry point for the webhook
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration) or a
/// one-shot Bot API command fails.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();

    let cli = Cli::parse_args();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::default_for(env::var("AWS_LAMBDA_RUNTIME_API").ok().as_deref()));

    init_logger(command == Commands::Lambda)?;

    let config = Config::from_env()?;

    match command {
        Commands::Serve => {
            log_startup_configuration(&config);
            let aws = load_aws_config().await;
            let handler = Arc::new(build_handler(&config, &aws));
            start_webhook_server(config.bind_addr, &config.webhook_path, handler).await
        }
        Commands::Lambda => {
            log_startup_configuration(&config);
            let aws = load_aws_config().await;
            let handler = Arc::new(build_handler(&config, &aws));
            run_lambda(handler).await.map_err(|e| anyhow::anyhow!("Lambda runtime error: {}", e))
        }
        Commands::SetWebhook { url } => {
            let bot = bot_from_config(&config)?;
            register_webhook(&bot, url, config.webhook_secret.as_ref()).await?;
            Ok(())
        }
        Commands::DeleteWebhook => {
            let bot = bot_from_config(&config)?;
            bot.delete_webhook().await?;
            log::info!("Webhook deleted");
            Ok(())
        }
        Commands::SetCommands => {
            let bot = bot_from_config(&config)?;
            setup_bot_commands(&bot).await?;
            log::info!("Bot commands published");
            Ok(())
        }
    }
}
