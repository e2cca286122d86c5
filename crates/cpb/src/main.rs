use std::sync::Arc;

use teloxide::Bot;

use cpb_binance::BinancePriceClient;
use cpb_core::{
    config::Config,
    dispatcher::Dispatcher,
    gate::MembershipGate,
    pricing::PriceService,
    users::UserStore,
};
use cpb_telegram::TelegramChannelGate;

#[tokio::main]
async fn main() -> Result<(), cpb_core::Error> {
    cpb_core::logging::init("cpb");

    let cfg = Arc::new(Config::load()?);

    let store = UserStore::new(cfg.users_file.clone());
    let directory = store.load()?;
    tracing::info!(users = directory.len(), "user directory loaded");

    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let gate = MembershipGate::new(
        Arc::new(TelegramChannelGate::new(bot.clone(), cfg.request_timeout)),
        cfg.channel_id.clone(),
    );
    let prices = PriceService::new(
        Arc::new(BinancePriceClient::new(
            cfg.price_api_base.clone(),
            cfg.request_timeout,
        )?),
        cfg.quote_asset.clone(),
        cfg.batch_pause,
    );

    let dispatcher = Dispatcher::new(gate, prices, store, directory);

    cpb_telegram::router::run_polling(bot, cfg, dispatcher)
        .await
        .map_err(|e| cpb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
