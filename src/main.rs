use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

mod args;
mod commands;
mod config;
mod discord;
mod format;
mod lookup;
mod snowflake;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize the logging
    let logging_config = config::get_logging_config();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(logging_config)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting useridrs...");

    let features_config = config::get_features_config();
    debug!("Disabled features: {:?}", features_config.disabled_features);

    // Run the bot on its own task
    let bot_handle = tokio::spawn(discord::start_discord_bot(config::get_config()));

    match bot_handle.await? {
        Ok(()) => {
            info!("Bot stopped");
            Ok(())
        }
        Err(e) => {
            error!("Bot exited with an error: {}", e);
            let e: Box<dyn std::error::Error> = e;
            Err(e)
        }
    }
}
