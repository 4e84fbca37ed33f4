use crate::args::{self, LookupArgs};
use crate::format::{self, OutputFormat, ProfileEmbed, ResultFields};
use crate::lookup::{self, LookupError, UserLookup};
use crate::{config, discord, snowflake};
use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

/// Settings that shape the reply but don't come from the caller
#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub asset_base_url: String,
    pub default_format: OutputFormat,
}

impl LookupOptions {
    pub fn from_config() -> Self {
        let lookup_config = config::get_lookup_config();
        LookupOptions {
            asset_base_url: lookup_config.asset_base_url.clone(),
            default_format: lookup_config.default_format,
        }
    }
}

/// What the command hands back to Discord
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupReply {
    // `send: false` is only shown to the caller
    Text { content: String, send: bool },
    Embed(ProfileEmbed),
}

impl LookupReply {
    fn error(content: impl ToString) -> Self {
        LookupReply::Text {
            content: content.to_string(),
            send: false,
        }
    }

    pub fn to_create_reply(&self) -> poise::CreateReply {
        match self {
            LookupReply::Text { content, send } => poise::CreateReply::default()
                .content(content.clone())
                .ephemeral(!send),
            LookupReply::Embed(embed) => poise::CreateReply::default()
                .embed(embed.to_create_embed())
                .ephemeral(true),
        }
    }
}

/// Look a user up and render the result for the given command tokens
pub async fn get_info<L, S>(lookup: &L, tokens: &[S], now_ms: u64, options: &LookupOptions) -> LookupReply
where
    L: UserLookup + ?Sized,
    S: AsRef<str>,
{
    let args = LookupArgs::parse(tokens);
    debug!("Parsed lookup args: {:?}", args);

    match render(lookup, &args, now_ms, options).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!("User lookup failed: {}", e);
            LookupReply::error(e)
        }
    }
}

async fn render<L>(lookup: &L, args: &LookupArgs, now_ms: u64, options: &LookupOptions) -> Result<LookupReply, LookupError>
where
    L: UserLookup + ?Sized,
{
    let given = args.id.as_deref().ok_or(LookupError::MissingId)?;
    let raw_id = Some(given)
        .filter(|given| given.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|given| given.parse::<u64>().ok())
        .filter(|raw_id| *raw_id != 0)
        .ok_or_else(|| LookupError::InvalidId(given.to_string()))?;
    // echo the canonical form, never the caller's spelling
    let id = raw_id.to_string();

    let profile = lookup.get_user(serenity::UserId::new(raw_id)).await?;

    let username = profile.full_username();
    let avatar_url = lookup::normalize_avatar_url(&profile.avatar_url, &options.asset_base_url);
    let created_ms = snowflake::created_at_ms(raw_id);
    let human_time = snowflake::human_date(created_ms);
    let relative_time = snowflake::time_difference(now_ms, created_ms);

    if !args.send {
        let fields = ResultFields {
            id: id.clone(),
            username,
            tag: format!("<@{}>", id),
            is_bot: profile.bot,
            avatar_url,
            human_time,
            relative_time,
        };
        return Ok(LookupReply::Embed(ProfileEmbed::new(&fields)));
    }

    let fields = ResultFields {
        id: id.clone(),
        username,
        tag: if args.tag { format!("<@{}>", id) } else { format!("@{}", id) },
        is_bot: profile.bot,
        avatar_url: if args.show_avatar { avatar_url } else { format!("<{}>", avatar_url) },
        human_time,
        relative_time,
    };

    let output_format = args.format.unwrap_or(options.default_format);
    debug!("Rendering lookup of {} as {}", id, output_format);

    let content = match output_format {
        OutputFormat::Raw => format::format_raw(&profile)?,
        other => format::format_result(&fields, other),
    };

    Ok(LookupReply::Text { content, send: true })
}

pub(crate) async fn reply(ctx: discord::Context<'_>, tokens: &[&str]) -> Result<(), discord::Error> {
    let options = LookupOptions::from_config();
    let now_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;

    let lookup = ctx.data().lookup.clone();
    let result = get_info(lookup.as_ref(), tokens, now_ms, &options).await;

    ctx.send(result.to_create_reply()).await?;
    Ok(())
}

/// Lookup user info from a user id
///
/// Usage: userid <id> [--send] [--no-tag] [--show-avatar] [--format=<default|md|json|yaml|raw>]
#[poise::command(
    prefix_command,
    slash_command,
    track_edits,
    aliases("useridinfo", "idinfo"),
    category = "Lookup"
)]
pub async fn userid(
    ctx: discord::Context<'_>,
    #[description = "User id followed by flags, e.g. 175928847299117063 --send --format=md"]
    #[rest]
    query: Option<String>,
) -> Result<(), discord::Error> {
    info!("userid command called by {}", ctx.author().name);

    let query = query.unwrap_or_default();
    reply(ctx, &args::tokenize(&query)).await
}
