use crate::commands::userid;
use crate::discord;
use poise::serenity_prelude as serenity;
use tracing::info;

/// Look up the selected Discord profile
#[poise::command(context_menu_command = "User information", category = "Lookup")]
pub async fn user_info(
    ctx: discord::Context<'_>,
    #[description = "Discord profile to query information about"] user: serenity::User,
) -> Result<(), discord::Error> {
    info!("User information requested for {}", user.id);

    let id = user.id.to_string();
    userid::reply(ctx, &[id.as_str()]).await
}
