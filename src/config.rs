use anyhow::{Context, Result};
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CHANNEL: &str = "https://t.me/lolofest2025";

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub event: EventInfo,
    pub links: Links,
    pub updates: UpdateConfig,
}

#[derive(Debug, Clone)]
pub struct EventInfo {
    pub name: String,
    pub date: String,
    pub location: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Links {
    pub tickets: Url,
    pub visit_rules: Url,
    pub schedule: Url,
    pub cosplay_solo: Url,
    pub cosplay_group: Url,
    pub cosplay_rules: Url,
    pub market_apply: Url,
    pub market_info: Url,
    pub vk_group: Url,
    pub telegram_channel: Url,
    pub organizer: Url,
    pub chat_rules: Url,
}

#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// `owner/name` of the repository whose releases are tracked.
    pub github_repo: Option<String>,
    pub github_api_url: String,
    pub version_file: PathBuf,
    pub check_timeout: Duration,
    /// Zero disables the periodic re-check.
    pub check_interval: Duration,
    pub update_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let url = |key: &str, default: &str| -> Result<Url> {
            let raw = var(key, default);
            Url::parse(&raw).with_context(|| format!("{} is not a valid URL: {}", key, raw))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secs = |key: &str, default: u64| -> Result<u64> {
            match optional(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be a whole number, got {}", key, raw)),
                None => Ok(default),
            }
        };

        let telegram_token = optional("TELEGRAM_BOT_TOKEN")
            .context("TELEGRAM_BOT_TOKEN environment variable is required")?;

        let event = EventInfo {
            name: var("EVENT_NAME", "LoloFest 2025"),
            date: var("EVENT_DATE", "уточняется"),
            location: var("EVENT_LOCATION", "уточняется"),
            address: var("EVENT_ADDRESS", "уточняется"),
        };

        let links = Links {
            tickets: url("TICKETS_URL", DEFAULT_CHANNEL)?,
            visit_rules: url("VISIT_RULES_URL", "https://t.me/lolofest2025/41")?,
            schedule: url("SCHEDULE_URL", DEFAULT_CHANNEL)?,
            cosplay_solo: url("COSPLAY_SOLO_URL", DEFAULT_CHANNEL)?,
            cosplay_group: url("COSPLAY_GROUP_URL", DEFAULT_CHANNEL)?,
            cosplay_rules: url("COSPLAY_RULES_URL", "https://t.me/lolofest2025/233")?,
            market_apply: url("MARKET_APPLY_URL", DEFAULT_CHANNEL)?,
            market_info: url("MARKET_INFO_URL", "https://t.me/lolofest2025/236")?,
            vk_group: url("VK_GROUP_URL", DEFAULT_CHANNEL)?,
            telegram_channel: url("TELEGRAM_CHANNEL_URL", DEFAULT_CHANNEL)?,
            organizer: url("ORGANIZER_URL", "https://t.me/cookie_snake")?,
            chat_rules: url("CHAT_RULES_URL", "https://t.me/lolofest2025/rules")?,
        };

        let updates = UpdateConfig {
            github_repo: optional("GITHUB_REPO").map(|r| r.trim().to_string()),
            github_api_url: var("GITHUB_API_URL", "https://api.github.com")
                .trim_end_matches('/')
                .to_string(),
            version_file: PathBuf::from(var("VERSION_FILE", "version.txt")),
            check_timeout: Duration::from_secs(secs("UPDATE_CHECK_TIMEOUT_SECS", 10)?),
            check_interval: Duration::from_secs(
                secs("UPDATE_CHECK_INTERVAL_HOURS", 24)?
                    .checked_mul(3600)
                    .context("UPDATE_CHECK_INTERVAL_HOURS is out of range")?,
            ),
            update_command: optional("UPDATE_COMMAND"),
        };

        Ok(Self {
            telegram_token,
            event,
            links,
            updates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.telegram_token, "123:abc");
        assert_eq!(config.links.visit_rules.as_str(), "https://t.me/lolofest2025/41");
        assert_eq!(config.links.organizer.as_str(), "https://t.me/cookie_snake");
        assert_eq!(config.updates.github_repo, None);
        assert_eq!(config.updates.github_api_url, "https://api.github.com");
        assert_eq!(config.updates.version_file, PathBuf::from("version.txt"));
        assert_eq!(config.updates.check_timeout, Duration::from_secs(10));
        assert_eq!(config.updates.check_interval, Duration::from_secs(24 * 3600));
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("TICKETS_URL", "https://tickets.example.com/buy"),
            ("GITHUB_REPO", "someone/fest-bot"),
            ("GITHUB_API_URL", "http://localhost:8080/"),
            ("UPDATE_CHECK_INTERVAL_HOURS", "0"),
            ("UPDATE_COMMAND", "git pull"),
        ]))
        .unwrap();
        assert_eq!(config.links.tickets.as_str(), "https://tickets.example.com/buy");
        assert_eq!(config.updates.github_repo.as_deref(), Some("someone/fest-bot"));
        assert_eq!(config.updates.github_api_url, "http://localhost:8080");
        assert!(config.updates.check_interval.is_zero());
        assert_eq!(config.updates.update_command.as_deref(), Some("git pull"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("VK_GROUP_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("VK_GROUP_URL"));
    }

    #[test]
    fn oversized_interval_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("UPDATE_CHECK_INTERVAL_HOURS", "18446744073709551615"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        assert!(Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("UPDATE_CHECK_TIMEOUT_SECS", "soon"),
        ]))
        .is_err());
    }
}
