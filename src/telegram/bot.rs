//! Bot initialization and command table
//!
//! This module contains:
//! - Command enum definition (the routing table for `/commands`)
//! - Bot instance creation
//! - Webhook and command-menu registration helpers used by the CLI

use std::borrow::Cow;

use reqwest::ClientBuilder;
use secrecy::{ExposeSecret, SecretString};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "KinethosBot understands:")]
pub enum Command {
    #[command(description = "say hello")]
    Start,
    #[command(description = "check that the bot is alive")]
    Ping,
    #[command(description = "set up your training profile")]
    Onboard,
    #[command(description = "stop the profile setup")]
    Cancel,
    #[command(description = "ask the AI coach, e.g. /coach how do I taper?")]
    Coach(String),
}

impl Command {
    /// Parses a message text against the command table.
    ///
    /// Unknown commands yield `None`, as does `/cmd@OtherBot` when
    /// `bot_username` is known. With an empty `bot_username` any `@suffix`
    /// is accepted.
    pub fn from_text(text: &str, bot_username: &str) -> Option<Self> {
        if bot_username.is_empty() {
            return Self::parse(&strip_mention(text), "").ok();
        }
        Self::parse(text, bot_username).ok()
    }
}

/// Drops the `@username` part of the leading command token.
fn strip_mention(text: &str) -> Cow<'_, str> {
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    match text[..end].find('@') {
        Some(at) => Cow::Owned(format!("{}{}", &text[..at], &text[end..])),
        None => Cow::Borrowed(text),
    }
}

/// Creates a Bot instance with custom or default API URL
///
/// # Arguments
/// * `token` - Bot token from @BotFather
/// * `api_url` - Alternative Bot API base URL (local server, test mock)
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(AppError)` - Failed to build the HTTP client
pub fn create_bot(token: &SecretString, api_url: Option<&url::Url>) -> AppResult<Bot> {
    let client = ClientBuilder::new()
        .timeout(config::telegram::timeout())
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build Telegram HTTP client: {}", e)))?;

    let bot = Bot::with_client(token.expose_secret(), client);
    let bot = match api_url {
        Some(url) => {
            log::info!("Using custom Bot API URL: {}", url);
            bot.set_api_url(url.clone())
        }
        None => bot,
    };

    Ok(bot)
}

/// Publishes the command menu shown by Telegram clients
///
/// # Returns
/// * `Ok(())` - Commands set successfully
/// * `Err(RequestError)` - Failed to set commands
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Points Telegram at the webhook URL, passing the shared secret when configured
///
/// Telegram then sends the secret back in `X-Telegram-Bot-Api-Secret-Token`
/// on every delivery.
pub async fn register_webhook(bot: &Bot, url: url::Url, secret: Option<&SecretString>) -> AppResult<()> {
    let request = bot.set_webhook(url.clone());
    let request = match secret {
        Some(secret) => request.secret_token(secret.expose_secret().to_string()),
        None => request,
    };
    request.await?;
    log::info!("Webhook registered at {}", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_descriptions() {
        let command_list = format!("{}", Command::descriptions());

        assert!(command_list.contains("KinethosBot understands"));
        assert!(command_list.contains("/ping"));
        assert!(command_list.contains("/onboard"));
        assert!(command_list.contains("/coach"));
    }

    #[test]
    fn test_parses_known_commands() {
        assert_eq!(Command::from_text("/ping", ""), Some(Command::Ping));
        assert_eq!(Command::from_text("/start", ""), Some(Command::Start));
        assert_eq!(Command::from_text("/cancel", ""), Some(Command::Cancel));
        assert_eq!(
            Command::from_text("/coach how do I taper?", ""),
            Some(Command::Coach("how do I taper?".to_string()))
        );
    }

    #[test]
    fn test_coach_without_arguments() {
        assert_eq!(Command::from_text("/coach", ""), Some(Command::Coach(String::new())));
    }

    #[test]
    fn test_bot_mention_suffix() {
        assert_eq!(Command::from_text("/ping@KinethosBot", "KinethosBot"), Some(Command::Ping));
        assert_eq!(Command::from_text("/ping@SomeoneElse", "KinethosBot"), None);
    }

    #[test]
    fn test_any_mention_accepted_without_username() {
        assert_eq!(Command::from_text("/ping@KinethosBot", ""), Some(Command::Ping));
        assert_eq!(
            Command::from_text("/coach@KinethosBot how do I taper?", ""),
            Some(Command::Coach("how do I taper?".to_string()))
        );
        assert_eq!(Command::from_text("/weather@KinethosBot", ""), None);
    }

    #[test]
    fn test_strip_mention_only_touches_command_token() {
        assert_eq!(strip_mention("/ping"), "/ping");
        assert_eq!(strip_mention("/coach@Bot mail me@example.com"), "/coach mail me@example.com");
    }

    #[test]
    fn test_plain_text_and_unknown_commands() {
        assert_eq!(Command::from_text("ping", ""), None);
        assert_eq!(Command::from_text("/weather", ""), None);
    }

    #[test]
    fn test_create_bot_with_custom_url() {
        let token = SecretString::from("123:abc");
        let url = url::Url::parse("http://127.0.0.1:9/").unwrap();
        let bot = create_bot(&token, Some(&url)).unwrap();
        assert_eq!(bot.api_url().as_str(), "http://127.0.0.1:9/");
    }
}
