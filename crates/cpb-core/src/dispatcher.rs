//! Command dispatch: one inbound command in, one reply out.
//!
//! Stateless across messages apart from the shared user directory. Every
//! data-producing branch checks the membership gate first; every failure
//! resolves to a user-visible reply plus a log entry, never a crash.

use tokio::sync::Mutex;

use crate::{
    coins::{self, CoinSpec},
    domain::Sender,
    gate::MembershipGate,
    pricing::PriceService,
    texts,
    users::{record_if_absent, UserDirectory, UserStore},
};

/// The fixed command set, resolved from the static coin catalogue plus four
/// named commands. Anything else is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Coin(&'static CoinSpec),
    Price,
    GroupInstructions,
    Help,
}

/// Parses an inbound message into a command.
///
/// Telegram may send `/cmd@botname`; the bot-name suffix is stripped. Coin
/// tickers match case-insensitively. Non-commands and unknown commands
/// yield `None`.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.trim().split_whitespace().next()?;
    let name = first.strip_prefix('/')?.split('@').next()?;
    if name.is_empty() {
        return None;
    }

    match name.to_lowercase().as_str() {
        "start" => Some(Command::Start),
        "price" => Some(Command::Price),
        "gpprice" => Some(Command::GroupInstructions),
        "help" => Some(Command::Help),
        _ => coins::find(name).map(Command::Coin),
    }
}

/// Outbound reply: text plus an optional one-button-per-entry keyboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Vec<String>>,
}

impl Reply {
    fn text_only(text: String) -> Self {
        Self {
            text,
            keyboard: None,
        }
    }
}

pub struct Dispatcher {
    gate: MembershipGate,
    prices: PriceService,
    store: UserStore,
    // Single lock serialises directory read-modify-write + persist across
    // concurrently delivered updates.
    directory: Mutex<UserDirectory>,
}

impl Dispatcher {
    pub fn new(
        gate: MembershipGate,
        prices: PriceService,
        store: UserStore,
        directory: UserDirectory,
    ) -> Self {
        Self {
            gate,
            prices,
            store,
            directory: Mutex::new(directory),
        }
    }

    pub async fn handle(&self, cmd: Command, sender: &Sender) -> Reply {
        match cmd {
            Command::Start => self.handle_start(sender).await,
            Command::Coin(spec) => self.handle_coin(spec, sender).await,
            Command::Price => self.handle_price(sender).await,
            Command::GroupInstructions => {
                Reply::text_only(texts::group_instructions(self.gate.channel()))
            }
            Command::Help => Reply::text_only(texts::help()),
        }
    }

    async fn handle_start(&self, sender: &Sender) -> Reply {
        self.record_first_contact(sender).await;

        let welcome = texts::welcome(&sender.first_name);
        match self.gate.is_authorized(sender.user_id).await {
            Ok(true) => Reply {
                text: welcome,
                keyboard: Some(coins::CATALOGUE.iter().map(texts::keyboard_button).collect()),
            },
            Ok(false) => {
                Reply::text_only(format!("{welcome}{}", texts::join_suffix(self.gate.channel())))
            }
            Err(e) => {
                tracing::error!(error = %e, "membership check failed during /start");
                Reply::text_only(texts::gate_unavailable())
            }
        }
    }

    /// Creates the first-contact record if this user is new, and persists.
    /// Persistence failures degrade: logged at error level, the reply is
    /// still sent.
    async fn record_first_contact(&self, sender: &Sender) {
        let mut dir = self.directory.lock().await;
        let (next, was_new) = record_if_absent(std::mem::take(&mut *dir), sender);
        *dir = next;

        if !was_new {
            return;
        }
        tracing::info!(user_id = sender.user_id.0, "new user added");
        if let Err(e) = self.store.persist(&dir) {
            tracing::error!(error = %e, "failed to persist user directory");
        }
    }

    async fn handle_coin(&self, spec: &'static CoinSpec, sender: &Sender) -> Reply {
        if let Some(refusal) = self.check_gate(sender).await {
            return refusal;
        }

        match self.prices.get_price(spec.ticker).await {
            Ok(quote) => Reply::text_only(texts::price_message(&quote)),
            Err(e) => {
                tracing::error!(ticker = spec.ticker, error = %e, "price fetch failed");
                Reply::text_only(texts::price_fetch_error(spec.ticker))
            }
        }
    }

    async fn handle_price(&self, sender: &Sender) -> Reply {
        if let Some(refusal) = self.check_gate(sender).await {
            return refusal;
        }

        match self.prices.get_prices(coins::POPULAR).await {
            Ok(quotes) => {
                Reply::text_only(texts::popular_summary(&quotes, self.prices.quote_asset()))
            }
            Err(e) => {
                // All-or-nothing: one failed symbol fails the whole summary.
                tracing::error!(error = %e, "popular price batch failed");
                Reply::text_only(texts::popular_summary_error())
            }
        }
    }

    /// Gate check shared by the data-producing branches. `None` means
    /// authorized (proceed); `Some` carries the refusal or retry reply.
    async fn check_gate(&self, sender: &Sender) -> Option<Reply> {
        match self.gate.is_authorized(sender.user_id).await {
            Ok(true) => None,
            Ok(false) => Some(Reply::text_only(texts::join_required(self.gate.channel()))),
            Err(e) => {
                tracing::error!(error = %e, "membership check failed");
                Some(Reply::text_only(texts::gate_unavailable()))
            }
        }
    }
}
