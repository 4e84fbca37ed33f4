use crate::config::{Config, Features};
use crate::commands;
use crate::lookup::{HttpLookup, UserLookup};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// Types used by all command functions
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

// Custom user data passed to all command functions
pub struct Data {
    // resolved once at startup and shared by every invocation
    pub lookup: Arc<dyn UserLookup>,
}

/// Every command the bot knows, minus the ones disabled in the config
pub fn enabled_commands(features: &Features) -> Vec<poise::Command<Data, Error>> {
    vec![
        commands::userid::userid(),
        commands::contextmenu::user_info(),
        commands::help::help(),
    ]
    .into_iter()
    .filter(|command| {
        let disabled = features.is_disabled(&command.name)
            || command
                .context_menu_name
                .as_deref()
                .is_some_and(|name| features.is_disabled(name));
        if disabled {
            info!("Command {} is disabled in the config, skipping", command.name);
        }
        !disabled
    })
    .collect()
}

pub async fn start_discord_bot(config: &'static Config) -> Result<(), Error> {
    let token = &config.discord.bot_token;
    if token.is_empty() {
        return Err(Error::from("No Discord token configured"));
    }

    // prefix commands need to read message content
    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let commands = enabled_commands(&config.features);
    debug!(
        "Registering commands: {:?}",
        commands.iter().map(|command| command.name.as_str()).collect::<Vec<_>>()
    );

    let framework = poise::Framework::builder()
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data {
                    lookup: Arc::new(HttpLookup::new(ctx.http.clone())),
                })
            })
        })
        .options(poise::FrameworkOptions {
            commands,
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.discord.command_prefix.clone()).filter(|prefix| !prefix.is_empty()),
                mention_as_prefix: true,
                ..Default::default()
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |_ctx, event, _framework, _data| Box::pin(log_event(event)),
            ..Default::default()
        })
        .build();

    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await?;

    tokio::spawn(unregister_on_shutdown(
        client.http.clone(),
        client.shard_manager.clone(),
    ));

    // Start the client
    client.start().await.map_err(|e| {
        error!("Client error: {:?}", e);
        Error::from(e)
    })
}

// Remove our application commands when the process is asked to stop,
// so nothing stale is left in the Discord client
async fn unregister_on_shutdown(http: Arc<serenity::Http>, shard_manager: Arc<serenity::ShardManager>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        return;
    }

    info!("Shutting down, unregistering commands...");
    match serenity::Command::set_global_commands(&http, Vec::new()).await {
        Ok(_) => info!("Unregistered global commands"),
        Err(e) => warn!("Failed to unregister global commands: {:?}", e),
    }

    shard_manager.shutdown_all().await;
}

async fn log_event(event: &serenity::FullEvent) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            info!("{} is connected to {} guilds", data_about_bot.user.name, data_about_bot.guilds.len());
        }
        serenity::FullEvent::Resume { .. } => {
            debug!("Gateway session resumed");
        }
        _ => {}
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            let reply = poise::CreateReply::default()
                .content(error.to_string())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to report command error: {:?}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {:?}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(features: &Features) -> Vec<String> {
        enabled_commands(features)
            .into_iter()
            .map(|command| command.name)
            .collect()
    }

    #[test]
    fn all_commands_enabled_by_default() {
        assert_eq!(names(&Features::default()), ["userid", "user_info", "help"]);
    }

    #[test]
    fn disabled_commands_are_dropped() {
        let features = Features {
            disabled_features: vec!["help".to_string(), "User information".to_string()],
        };
        assert_eq!(names(&features), ["userid"]);
    }

    #[test]
    fn userid_aliases() {
        let command = commands::userid::userid();
        assert_eq!(command.aliases, ["useridinfo", "idinfo"]);
        assert!(command.prefix_action.is_some());
        assert!(command.slash_action.is_some());
    }
}
