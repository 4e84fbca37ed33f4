use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Missing argument id")]
    MissingId,
    #[error("Invalid user id: {0}")]
    InvalidId(String),
    #[error("{0}")]
    Http(#[from] serenity::Error),
    #[error("Failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

/// What the bot knows about a user, shaped like the client's user record
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub bot: bool,
    pub avatar: Option<String>,
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
    pub created_at: String,
    pub has_premium_perks: bool,
}

impl UserProfile {
    /// `name#discriminator`, with `#0` for accounts on the new username system
    pub fn full_username(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }
}

impl From<&serenity::User> for UserProfile {
    fn from(user: &serenity::User) -> Self {
        let discriminator = match user.discriminator {
            Some(discriminator) => format!("{:04}", discriminator.get()),
            None => "0".to_string(),
        };

        UserProfile {
            id: user.id.to_string(),
            username: user.name.clone(),
            discriminator,
            bot: user.bot,
            avatar: user.avatar.as_ref().map(|hash| hash.to_string()),
            avatar_url: user.avatar_url().unwrap_or_else(|| user.default_avatar_url()),
            created_at: user.created_at().to_string(),
            has_premium_perks: user.premium_type != serenity::PremiumType::None,
        }
    }
}

#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_user(&self, id: serenity::UserId) -> Result<UserProfile, LookupError>;
}

/// Looks users up through the Discord REST API
pub struct HttpLookup {
    http: Arc<serenity::Http>,
}

impl HttpLookup {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        HttpLookup { http }
    }
}

#[async_trait]
impl UserLookup for HttpLookup {
    async fn get_user(&self, id: serenity::UserId) -> Result<UserProfile, LookupError> {
        debug!("Fetching user {} from the API", id);
        let user = self.http.get_user(id).await?;
        Ok(UserProfile::from(&user))
    }
}

/// Turn an avatar reference into an absolute URL without a `?size=` suffix.
///
/// Default avatars can come back as host-relative `/assets/...` paths, those
/// get `asset_base` prepended.
pub fn normalize_avatar_url(raw: &str, asset_base: &str) -> String {
    let absolute = if raw.contains("assets") && raw.starts_with('/') {
        format!("{}{}", asset_base.trim_end_matches('/'), raw)
    } else {
        raw.to_string()
    };

    match absolute.rsplit_once("?size=") {
        Some((base, size)) if !size.is_empty() && size.bytes().all(|b| b.is_ascii_digit()) => {
            base.to_string()
        }
        _ => absolute,
    }
}
