use colored::Colorize;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, io, path::Path, str::FromStr};
use tracing::Level;

use crate::format::OutputFormat;

pub const CONFIG_PATH: &str = "config.toml";
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

//expect root Table and configure subtables
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub discord: Discord,
    #[serde(default)]
    pub lookup: Lookup,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Logging {
    #[serde(default = "default_logging_level")]
    pub level: String,
}

// Commands listed here by name are never registered
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Features {
    #[serde(default = "default_features")]
    pub disabled_features: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Discord {
    #[serde(default = "default_discord")]
    pub bot_token: String,
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Lookup {
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
    #[serde(default)]
    pub default_format: OutputFormat,
}

// Default values for the deserializer
// These only kick in when a key is missing, the file itself is untouched
fn default_logging_level() -> String {
    "Info".to_string()
}

fn default_features() -> Vec<String> {
    vec!["".to_string(), "".to_string()]
}

fn default_discord() -> String {
    "".to_string()
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_asset_base_url() -> String {
    "https://canary.discord.com".to_string()
}

impl Default for Logging {
    fn default() -> Self {
        Logging { level: default_logging_level() }
    }
}

impl Default for Features {
    fn default() -> Self {
        Features { disabled_features: default_features() }
    }
}

impl Default for Discord {
    fn default() -> Self {
        Discord {
            bot_token: default_discord(),
            command_prefix: default_prefix(),
        }
    }
}

impl Default for Lookup {
    fn default() -> Self {
        Lookup {
            asset_base_url: default_asset_base_url(),
            default_format: OutputFormat::default(),
        }
    }
}

impl Features {
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled_features
            .iter()
            .any(|feature| !feature.is_empty() && feature.eq_ignore_ascii_case(name))
    }
}

const DEFAULT_CONFIG: &str = r#"[logging]
# This is the log level that useridrs will use.
# options: Error, Warn, Info, Debug, Trace
# Default: Info
level = "Info"

[features]
# Commands to leave unregistered, by name
# options: "userid", "help", "user_info" (or "User information")
# default: ["",""]
disabled_features = ["",""]

[discord]
# This defines the Discord token for the bot
# This is required for the bot to function
# The DISCORD_TOKEN environment variable takes precedence
# default: ""
bot_token = ""
# Prefix for text commands, slash commands work regardless
# default: "!"
command_prefix = "!"

[lookup]
# Host used for avatar paths that come back relative, e.g. /assets/...
# default: "https://canary.discord.com"
asset_base_url = "https://canary.discord.com"
# Layout used with --send when no --format is given
# options: default, md, json, yaml, raw
# default: "default"
default_format = "default"
"#;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    let mut config = match load_config(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            println!("{}{}{}", "ERROR:".red().bold(), "Failed to load config, using defaults: ", e);
            Config::default()
        }
    };

    if let Ok(token) = env::var(TOKEN_ENV) {
        if !token.is_empty() {
            config.discord.bot_token = token;
        }
    }

    verify_config(&config);
    config
});

pub fn get_config() -> &'static Config {
    &CONFIG
}

/// Read the config at `path`, writing the default file first if there is none
/// and rewriting a file that fails to parse.
pub fn load_config(path: &Path) -> io::Result<Config> {
    let config_str = match fs::read_to_string(path) {
        Ok(config_str) => config_str,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            create_config(path)?;
            fs::read_to_string(path)?
        }
        Err(e) => return Err(e),
    };

    match toml::from_str::<Config>(&config_str) {
        Ok(config) => Ok(config),
        Err(e) => {
            println!("{}{}{}", "Warn:".yellow().bold(), "Failed to parse config: ", e);
            repair_config(path, &config_str)
        }
    }
}

fn create_config(path: &Path) -> io::Result<()> {
    println!("{}{}", "Info:".green().bold(), "Creating a new config file...");
    fs::write(path, DEFAULT_CONFIG)
}

/// Salvage what parses section by section, defaults for the rest
pub fn recover_config(config_str: &str) -> Config {
    let table = match toml::from_str::<toml::Table>(config_str) {
        Ok(table) => table,
        Err(_) => return Config::default(),
    };

    fn section<T>(table: &toml::Table, key: &str) -> T
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        table
            .get(key)
            .cloned()
            .and_then(|value| value.try_into().ok())
            .unwrap_or_default()
    }

    Config {
        logging: section(&table, "logging"),
        features: section(&table, "features"),
        discord: section(&table, "discord"),
        lookup: section(&table, "lookup"),
    }
}

// Rebuild the file from whatever was readable in the old one
fn repair_config(path: &Path, config_str: &str) -> io::Result<Config> {
    println!("{}{}", "Warn:".yellow().bold(), "Repairing the Config file...");

    let rebuilt_config = recover_config(config_str);
    let rebuilt_str = toml::to_string(&rebuilt_config)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, rebuilt_str)?;

    Ok(rebuilt_config)
}

/// Parse the configured log level, defaulting to Debug when it isn't one
pub fn get_logging_config() -> Level {
    parse_level(&CONFIG.logging.level)
}

fn parse_level(log_level_str: &str) -> Level {
    let level = Level::from_str(log_level_str).unwrap_or_else(|_| {
        println!(
            "{}{}{}{}",
            "Warn:".yellow().bold(),
            "Unable to parse log level from config: ",
            log_level_str,
            ". Defaulting to 'Debug'"
        );
        Level::DEBUG
    });

    println!("{}{}{:?}", "Info:".green().bold(), "Logging level: ", level);
    level
}

pub fn get_features_config() -> &'static Features {
    &CONFIG.features
}

pub fn get_lookup_config() -> &'static Lookup {
    &CONFIG.lookup
}

fn verify_config(config: &Config) {
    if config.logging.level.is_empty() {
        println!("{}{}", "Warn:".yellow().bold(), "Empty log level found in config\n This is not a valid log level and will be defaulted to 'Debug'");
    }

    for feature in &config.features.disabled_features {
        if feature.is_empty() {
            println!("{}{}", "Warn:".yellow().bold(), "Empty disabled feature found in config\n This is not a valid feature and will be ignored.");
        }
    }

    if config.discord.command_prefix.is_empty() {
        println!("{}{}", "Warn:".yellow().bold(), "Empty command prefix found in config\n Text commands will only respond to mentions.");
    }

    if !config.lookup.asset_base_url.starts_with("http") {
        println!("{}{}", "Warn:".yellow().bold(), "Asset base URL in config is not an http(s) URL\n Default avatars may not link correctly.");
    }

    if config.discord.bot_token.is_empty() {
        println!("{}{}", "ERROR:".red().bold(), "Empty discord token found in config\n This means the bot will not work.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup.asset_base_url, "https://canary.discord.com");
        assert_eq!(config.discord.command_prefix, "!");
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = toml::from_str("[lookup]\ndefault_format = \"yaml\"\n").unwrap();
        assert_eq!(config.lookup.default_format, OutputFormat::Yaml);
        assert_eq!(config.lookup.asset_base_url, "https://canary.discord.com");
        assert_eq!(config.logging.level, "Info");
    }

    #[test]
    fn broken_section_is_recovered_alone() {
        let config_str = "[logging]\nlevel = \"Trace\"\n\n[lookup]\ndefault_format = \"xml\"\n";
        assert!(toml::from_str::<Config>(config_str).is_err());

        let config = recover_config(config_str);
        assert_eq!(config.logging.level, "Trace");
        assert_eq!(config.lookup, Lookup::default());
    }

    #[test]
    fn unreadable_toml_recovers_to_defaults() {
        assert_eq!(recover_config("[logging\nlevel ="), Config::default());
    }

    #[test]
    fn disabled_features_ignore_blanks() {
        let features = Features {
            disabled_features: vec!["".to_string(), "Help".to_string()],
        };
        assert!(features.is_disabled("help"));
        assert!(!features.is_disabled("userid"));
        assert!(!features.is_disabled(""));
    }

    #[test]
    fn log_levels() {
        assert_eq!(parse_level("Info"), Level::INFO);
        assert_eq!(parse_level("trace"), Level::TRACE);
        assert_eq!(parse_level("loud"), Level::DEBUG);
    }

    #[test]
    fn load_creates_and_repairs_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let created = load_config(&path).unwrap();
        assert_eq!(created, Config::default());
        assert!(fs::read_to_string(&path).unwrap().contains("asset_base_url"));

        fs::write(&path, "[discord]\nbot_token = \"abc\"\n[features]\ndisabled_features = 3\n").unwrap();
        let repaired = load_config(&path).unwrap();
        assert_eq!(repaired.discord.bot_token, "abc");
        assert_eq!(repaired.features, Features::default());
        assert_eq!(toml::from_str::<Config>(&fs::read_to_string(&path).unwrap()).unwrap(), repaired);
    }
}
