use crate::handlers::{self, Command};
use crate::menu::Menu;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;
use std::sync::Arc;

pub async fn start_bot(bot: Bot, menu: Arc<Menu>) {
    info!("Bot is starting...");

    let menu_for_commands = menu.clone();
    let menu_for_messages = menu;
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| {
                    msg.text()
                        .and_then(handlers::parse_command)
                        .is_some()
                })
                .endpoint(move |bot: Bot, msg: Message| {
                    let menu = menu_for_commands.clone();
                    async move { handle_commands(bot, msg, menu).await }
                }),
        )
        .branch(
            Update::filter_message()
                .endpoint(move |bot: Bot, msg: Message| {
                    let menu = menu_for_messages.clone();
                    async move { handlers::handle_message(bot, msg, menu).await }
                }),
        );

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_commands(bot: Bot, msg: Message, menu: Arc<Menu>) -> ResponseResult<()> {
    match msg.text().and_then(handlers::parse_command) {
        Some(Command::Start) => handlers::handle_start(bot, msg, menu).await,
        None => Ok(()),
    }
}
