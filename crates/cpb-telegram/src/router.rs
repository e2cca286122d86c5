use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use cpb_core::{config::Config, dispatcher::Dispatcher as CommandDispatcher};

use crate::handlers;

pub struct AppState {
    pub dispatcher: CommandDispatcher,
}

/// Long-polling loop. One dptree branch: plain messages, routed through the
/// command dispatcher. Anything the parser rejects is ignored silently.
pub async fn run_polling(
    bot: Bot,
    cfg: Arc<Config>,
    dispatcher: CommandDispatcher,
) -> anyhow::Result<()> {
    match bot.get_me().await {
        Ok(me) => tracing::info!(username = me.username(), "cpb started"),
        Err(e) => tracing::warn!(error = %e, "getMe failed at startup"),
    }
    tracing::info!(channel = %cfg.channel_id, "gating on channel membership");

    let state = Arc::new(AppState { dispatcher });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
