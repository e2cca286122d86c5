//! User-facing message strings.

use chrono::{DateTime, Utc};

use crate::{
    coins::CoinSpec,
    domain::ChannelRef,
    pricing::{format_amount, PriceQuote},
};

pub fn welcome(first_name: &str) -> String {
    format!(
        "Hello {first_name}! 👋\n\n\
         Welcome to CryptoPulse Bot 🚀\n\n\
         🔹 Get real-time crypto prices\n\
         🔹 Use buttons or type /<coin> for prices\n\
         🔹 /price for popular coins\n\
         🔹 /help for more information\n\n\
         Stay updated with market trends! 📈"
    )
}

pub fn join_suffix(channel: &ChannelRef) -> String {
    format!("\n\n⚠️ Please join our channel to use the bot: {channel}")
}

pub fn join_required(channel: &ChannelRef) -> String {
    format!("⚠️ Please join our channel to use the bot: {channel}")
}

/// Reply when the membership check itself failed (not "not a member").
pub fn gate_unavailable() -> String {
    "⚠️ Could not verify your membership right now. Please try again later.".to_string()
}

pub fn price_message(quote: &PriceQuote) -> String {
    format!(
        "💰 {} Price 💰\n\n💲 {} USDT\n\n🕒 {}",
        quote.symbol,
        format_amount(quote.price),
        timestamp(quote.observed_at)
    )
}

pub fn price_fetch_error(ticker: &str) -> String {
    format!("❌ Error fetching price for {ticker}. Please try again later.")
}

pub fn popular_summary(quotes: &[PriceQuote], quote_asset: &str) -> String {
    let mut out = String::from("📊 Popular Cryptocurrency Prices 📊\n\n");
    for q in quotes {
        let base = q.symbol.strip_suffix(quote_asset).unwrap_or(&q.symbol);
        out.push_str(&format!("{base}: ${} {quote_asset}\n", format_amount(q.price)));
    }
    out.push_str(&format!("\n🕒 {}", timestamp(Utc::now())));
    out
}

pub fn popular_summary_error() -> String {
    "❌ Error fetching prices. Please try again later.".to_string()
}

pub fn group_instructions(channel: &ChannelRef) -> String {
    format!(
        "📢 To use this bot in your group:\n\n\
         1️⃣ Join our channel: {channel}\n\
         2️⃣ Add the bot to your group and make it an admin\n\
         3️⃣ In your group, type /SetOGP"
    )
}

pub fn help() -> String {
    "🤖 CryptoPulse Bot Help 🤖\n\n\
     Available commands:\n\
     🔹 /start - Start the bot and see options\n\
     🔹 /price - Get prices for BTC, ETH, and BNB\n\
     🔹 /gpPrice - Instructions for group use\n\
     🔹 /<coin> - Get price for a specific coin\n\
     \u{0020}  (e.g., /BTC, /ETH, /BNB)"
        .to_string()
}

pub fn keyboard_button(coin: &CoinSpec) -> String {
    format!("/{} {} 💰", coin.ticker, coin.name)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
