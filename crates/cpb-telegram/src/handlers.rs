//! Inbound message handling.
//!
//! Extracts the command event, runs it through the core dispatcher, and
//! sends the reply (with the coin keyboard when the reply carries one).
//! Send failures are logged, never propagated into the polling loop.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
};

use cpb_core::{
    dispatcher::{parse_command, Reply},
    domain::{ChatId, Sender, UserId},
};

use crate::router::AppState;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(cmd) = parse_command(text) else {
        return Ok(()); // not a command we know; leave it alone
    };
    let Some(from) = msg.from() else {
        return Ok(());
    };

    let sender = Sender {
        user_id: UserId(from.id.0 as i64),
        chat_id: ChatId(msg.chat.id.0),
        username: from.username.clone(),
        first_name: from.first_name.clone(),
        last_name: from.last_name.clone(),
    };

    let reply = state.dispatcher.handle(cmd, &sender).await;
    send_reply(&bot, msg.chat.id, reply).await;

    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: teloxide::types::ChatId, reply: Reply) {
    let result = match reply.keyboard {
        Some(buttons) => {
            bot.send_message(chat_id, reply.text)
                .reply_markup(keyboard_markup(&buttons))
                .await
        }
        None => bot.send_message(chat_id, reply.text).await,
    };

    if let Err(e) = result {
        tracing::error!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }
}

/// Two buttons per row, resized, matching the original bot's layout.
fn keyboard_markup(buttons: &[String]) -> KeyboardMarkup {
    let rows: Vec<Vec<KeyboardButton>> = buttons
        .chunks(2)
        .map(|row| row.iter().map(|b| KeyboardButton::new(b.clone())).collect())
        .collect();
    KeyboardMarkup::new(rows).resize_keyboard(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_lays_out_two_per_row() {
        let buttons: Vec<String> = (0..5).map(|i| format!("/C{i}")).collect();
        let markup = keyboard_markup(&buttons);
        let widths: Vec<usize> = markup.keyboard.iter().map(|r| r.len()).collect();
        assert_eq!(widths, [2, 2, 1]);
    }
}
