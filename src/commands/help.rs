use crate::{config, discord};

/// Show the available commands, or details about one of them
#[poise::command(prefix_command, slash_command, track_edits, category = "Misc")]
pub async fn help(
    ctx: discord::Context<'_>,
    #[description = "Command to show details about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> Result<(), discord::Error> {
    let prefix = &config::get_config().discord.command_prefix;
    let footer = format!(
        "Example: {prefix}userid 175928847299117063 --send --format=md\n\
         Lookups without --send are only shown to you."
    );

    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: &footer,
            ephemeral: true,
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}
