/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Reference to the gating channel: either an `@username` or a numeric id,
/// kept in string form as configured.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChannelRef(pub String);

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sender metadata carried on every inbound command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sender {
    pub user_id: UserId,
    pub chat_id: ChatId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}
