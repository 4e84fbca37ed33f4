use poise::serenity_prelude as serenity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lookup::UserProfile;

/// Text layout used when the lookup result is posted with `--send`
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Default,
    Md,
    Json,
    Yaml,
    Raw,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(OutputFormat::Default),
            "md" => Ok(OutputFormat::Md),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "raw" => Ok(OutputFormat::Raw),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Default => "default",
            OutputFormat::Md => "md",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Raw => "raw",
        };
        f.write_str(name)
    }
}

/// Already-stringified values shared by every template
#[derive(Debug, Clone)]
pub struct ResultFields {
    pub id: String,
    pub username: String,
    pub tag: String,
    pub is_bot: bool,
    pub avatar_url: String,
    pub human_time: String,
    pub relative_time: String,
}

// Undo the `<url>` wrapping that suppresses link previews; code blocks don't need it
fn unwrap_angle_brackets(url: &str) -> &str {
    let url = url.strip_prefix('<').unwrap_or(url);
    url.strip_suffix('>').unwrap_or(url)
}

pub fn format_result(fields: &ResultFields, format: OutputFormat) -> String {
    let ResultFields {
        id,
        username,
        tag,
        is_bot,
        avatar_url,
        human_time,
        relative_time,
    } = fields;

    match format {
        OutputFormat::Md => format!(
            "```md\n\
             # UserID Lookup for {username}\n\
             \n\
             ## ID\n\
             {id}\n\
             \n\
             ## Tag\n\
             {tag}\n\
             \n\
             ## Username\n\
             {username}\n\
             \n\
             ## Is Bot\n\
             {is_bot}\n\
             \n\
             ## Avatar\n\
             {avatar}\n\
             \n\
             ## Created\n\
             {human_time} ({relative_time})\n\
             ```",
            avatar = unwrap_angle_brackets(avatar_url),
        ),
        OutputFormat::Json => format!(
            "```json\n\
             {{\n    \
             \"id\": \"{id}\",\n    \
             \"tag\": \"{tag}\",\n    \
             \"username\": \"{username}\",\n    \
             \"isBot\": {is_bot},\n    \
             \"avatarURL\": \"{avatar}\",\n    \
             \"created\": \"{human_time} ({relative_time})\"\n\
             }}\n\
             ```",
            avatar = unwrap_angle_brackets(avatar_url),
        ),
        OutputFormat::Yaml => format!(
            "```yaml\n\
             id: \"{id}\"\n\
             tag: {tag}\n\
             username: {username}\n\
             isBot: {is_bot}\n\
             avatarURL: {avatar}\n\
             created: {human_time} ({relative_time})\n\
             ```",
            avatar = unwrap_angle_brackets(avatar_url),
        ),
        // raw needs the whole profile, see format_raw; anything else gets the plain layout
        OutputFormat::Default | OutputFormat::Raw => format!(
            "**UserID Lookup for {username}**\n\
             \n\
             _ID_: {id}\n\
             _Tag_: {tag}\n\
             _Username_: {username}\n\
             _Is Bot_: {is_bot}\n\
             _Avatar_: {avatar_url}\n\
             _Created_: {human_time} ({relative_time})\n"
        ),
    }
}

/// Every field of the profile as `(key, value)` pairs, sorted by key
pub fn sorted_entries(profile: &UserProfile) -> Result<Vec<(String, serde_json::Value)>, serde_json::Error> {
    let value = serde_json::to_value(profile)?;
    let mut entries: Vec<(String, serde_json::Value)> = match value {
        serde_json::Value::Object(map) => map.into_iter().collect(),
        other => vec![("value".to_string(), other)],
    };
    // serde_json::Map is only ordered without the preserve_order feature, so sort anyway
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// The full profile record dumped as a JSON code block with sorted keys
pub fn format_raw(profile: &UserProfile) -> Result<String, serde_json::Error> {
    let sorted: serde_json::Map<String, serde_json::Value> = sorted_entries(profile)?.into_iter().collect();
    let body = serde_json::to_string_pretty(&serde_json::Value::Object(sorted))?;
    Ok(format!("```json\n{}\n```", body))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Rich embed shown to the caller when the result isn't sent to the channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEmbed {
    pub title: String,
    pub fields: Vec<EmbedField>,
}

impl ProfileEmbed {
    pub fn new(fields: &ResultFields) -> Self {
        let field = |name: &str, value: String| EmbedField {
            name: name.to_string(),
            value,
            inline: false,
        };

        ProfileEmbed {
            title: format!("UserID Lookup for {}", fields.username),
            fields: vec![
                field("ID", fields.id.clone()),
                field("Tag", format!("<@{}>", fields.id)),
                field("Username", fields.username.clone()),
                field("Is Bot", fields.is_bot.to_string()),
                field("Avatar", fields.avatar_url.clone()),
                field(
                    "Created",
                    format!("{} ({})", fields.human_time, fields.relative_time),
                ),
            ],
        }
    }

    pub fn to_create_embed(&self) -> serenity::CreateEmbed {
        self.fields.iter().fold(
            serenity::CreateEmbed::new().title(&self.title),
            |embed, field| embed.field(&field.name, &field.value, field.inline),
        )
    }
}
