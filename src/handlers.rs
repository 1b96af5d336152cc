use crate::menu::{Menu, Reply};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{Message, ParseMode};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
}

/// Parses `/cmd`, `/cmd@bot_name` and `/cmd payload`.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.split_whitespace().next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);

    match name {
        "start" => Some(Command::Start),
        _ => None,
    }
}

pub async fn handle_start(bot: Bot, msg: Message, menu: Arc<Menu>) -> ResponseResult<()> {
    info!("/start from chat {}", msg.chat.id);
    send_reply(&bot, msg.chat.id, menu.welcome()).await
}

pub async fn handle_message(bot: Bot, msg: Message, menu: Arc<Menu>) -> ResponseResult<()> {
    match menu.resolve(msg.text()) {
        Some(reply) => {
            info!("Menu button {:?} pressed in chat {}", msg.text().unwrap_or_default(), msg.chat.id);
            send_reply(&bot, msg.chat.id, reply).await
        }
        None => {
            debug!("Ignoring message {} in chat {}", msg.id.0, msg.chat.id);
            Ok(())
        }
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let mut message = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);

    if let Some(markup) = reply.markup {
        message = message.reply_markup(markup);
    }

    message.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_variants() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/start@lolofest_bot"), Some(Command::Start));
        assert_eq!(parse_command("/start promo42"), Some(Command::Start));
    }

    #[test]
    fn ignores_other_input() {
        assert_eq!(parse_command("/help"), None);
        assert_eq!(parse_command("/Start"), None);
        assert_eq!(parse_command("start"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("🎫 Купить билет"), None);
    }
}
