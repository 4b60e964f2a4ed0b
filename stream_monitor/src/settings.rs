use std::{path::PathBuf, time::Duration};

use teloxide::types::{ChatId, Recipient};

/// Interval between live checks if `CHECK_INTERVAL` is unset.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(600);

/// How long sending a recording may take if `UPLOAD_TIMEOUT` is unset.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the monitor is configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `BOT_TOKEN`
    pub bot_token: String,
    /// `CHAT_ID`, where recordings are sent to. Either a numeric chat ID or
    /// a `@channelusername`.
    pub chat_id: Recipient,
    /// `LIVE_UID`, the broadcaster to watch.
    pub live_uid: u64,
    /// `CHECK_INTERVAL`, in seconds.
    pub check_interval: Duration,
    /// `UPLOAD_TIMEOUT`, in seconds. Applies to every request the bot makes.
    pub upload_timeout: Duration,
    /// `STREAMLINK_PATH`
    pub streamlink_path: PathBuf,
    /// `RECORD_DIR`, where recordings are kept until they're sent.
    pub record_dir: PathBuf,
}

impl Settings {
    /// Read settings from the environment, after loading a `.env` file
    /// from the working directory if there is one.
    pub fn from_env() -> Result<Settings, SettingsError> {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => (),
            Err(e) => log::warn!("Failed to load .env file: {e}"),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings with `lookup` giving the value of each variable by name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings, SettingsError> {
        // Empty values count as unset.
        let get = |name: &'static str| lookup(name).filter(|x| !x.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(SettingsError::Missing(name));

        let bot_token = require("BOT_TOKEN")?;
        let chat_id = parse_recipient(require("CHAT_ID")?)?;
        let live_uid = parse("LIVE_UID", require("LIVE_UID")?)?;

        let check_interval = match get("CHECK_INTERVAL") {
            Some(value) => parse_seconds("CHECK_INTERVAL", value)?,
            None => DEFAULT_CHECK_INTERVAL,
        };
        let upload_timeout = match get("UPLOAD_TIMEOUT") {
            Some(value) => parse_seconds("UPLOAD_TIMEOUT", value)?,
            None => DEFAULT_UPLOAD_TIMEOUT,
        };

        let streamlink_path = get("STREAMLINK_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("streamlink"));
        let record_dir = get("RECORD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Settings {
            bot_token,
            chat_id,
            live_uid,
            check_interval,
            upload_timeout,
            streamlink_path,
            record_dir,
        })
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, SettingsError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| SettingsError::Invalid { name, value })
}

/// A nonzero amount of seconds.
fn parse_seconds(name: &'static str, value: String) -> Result<Duration, SettingsError> {
    match parse::<u64>(name, value.clone())? {
        0 => Err(SettingsError::Invalid { name, value }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// `@channelusername` or a numeric chat ID.
fn parse_recipient(value: String) -> Result<Recipient, SettingsError> {
    let trimmed = value.trim();
    if let Some(username) = trimmed.strip_prefix('@') {
        let valid = !username.is_empty()
            && username
                .chars()
                .all(|x| x.is_ascii_alphanumeric() || x == '_');
        if !valid {
            return Err(SettingsError::Invalid {
                name: "CHAT_ID",
                value,
            });
        }
        return Ok(Recipient::ChannelUsername(trimmed.to_string()));
    }

    Ok(Recipient::Id(ChatId(parse("CHAT_ID", value)?)))
}

/// Human readable form of a recipient for logs.
pub fn recipient_name(recipient: &Recipient) -> String {
    match recipient {
        Recipient::Id(id) => format!("chat {id}"),
        Recipient::ChannelUsername(username) => username.clone(),
    }
}
