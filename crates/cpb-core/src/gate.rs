//! Channel-membership gate.
//!
//! Every data-producing command checks the gate first. The check is a single
//! member-status lookup against the messaging platform, behind a port so the
//! dispatcher can be tested with fakes.

use async_trait::async_trait;

use crate::{
    domain::{ChannelRef, UserId},
    errors::Error,
    Result,
};

/// Member states reported by the messaging platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

/// Failure modes of the member-status lookup.
///
/// `ChannelNotFound` is a configuration error (bad channel reference) and is
/// kept distinct from transport/rate-limit failures so the gate can apply
/// its fail-open policy to it alone.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel not found: {0}")]
    ChannelNotFound(String),
    #[error("member status lookup failed: {0}")]
    Other(String),
}

/// Port for the platform's "get member status" operation.
#[async_trait]
pub trait ChannelPort: Send + Sync {
    async fn member_status(
        &self,
        channel: &ChannelRef,
        user: UserId,
    ) -> std::result::Result<MembershipStatus, ChannelError>;
}

/// The gate itself: a channel reference plus the port to query it.
pub struct MembershipGate {
    port: std::sync::Arc<dyn ChannelPort>,
    channel: ChannelRef,
}

impl MembershipGate {
    pub fn new(port: std::sync::Arc<dyn ChannelPort>, channel: ChannelRef) -> Self {
        Self { port, channel }
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    /// Whether `user` may receive data-producing responses.
    ///
    /// Any reported status other than `Left` authorizes the user. A
    /// channel-not-found failure authorizes everyone (fail-open): a
    /// misconfigured channel reference must not lock out all users. Every
    /// other lookup failure is a `GateCheck` error, which callers must keep
    /// distinct from "not a member".
    pub async fn is_authorized(&self, user: UserId) -> Result<bool> {
        match self.port.member_status(&self.channel, user).await {
            Ok(status) => Ok(status != MembershipStatus::Left),
            Err(ChannelError::ChannelNotFound(detail)) => {
                tracing::warn!(channel = %self.channel, %detail, "channel not found; failing open");
                Ok(true)
            }
            Err(ChannelError::Other(detail)) => Err(Error::GateCheck(detail)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Copy)]
    enum Script {
        Status(MembershipStatus),
        NotFound,
        Broken,
    }

    struct FixedPort(Script);

    #[async_trait]
    impl ChannelPort for FixedPort {
        async fn member_status(
            &self,
            _channel: &ChannelRef,
            _user: UserId,
        ) -> std::result::Result<MembershipStatus, ChannelError> {
            match self.0 {
                Script::Status(s) => Ok(s),
                Script::NotFound => Err(ChannelError::ChannelNotFound("gone".to_string())),
                Script::Broken => Err(ChannelError::Other("429 too many requests".to_string())),
            }
        }
    }

    fn gate(script: Script) -> MembershipGate {
        MembershipGate::new(Arc::new(FixedPort(script)), ChannelRef("@chan".to_string()))
    }

    #[tokio::test]
    async fn left_is_unauthorized_everything_else_is_authorized() {
        assert!(!gate(Script::Status(MembershipStatus::Left))
            .is_authorized(UserId(1))
            .await
            .unwrap());

        for status in [
            MembershipStatus::Owner,
            MembershipStatus::Administrator,
            MembershipStatus::Member,
            MembershipStatus::Restricted,
            MembershipStatus::Banned,
        ] {
            assert!(
                gate(Script::Status(status))
                    .is_authorized(UserId(1))
                    .await
                    .unwrap(),
                "{status:?} should authorize"
            );
        }
    }

    #[tokio::test]
    async fn channel_not_found_fails_open() {
        assert!(gate(Script::NotFound)
            .is_authorized(UserId(42))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn other_failures_are_gate_errors() {
        match gate(Script::Broken).is_authorized(UserId(1)).await {
            Err(Error::GateCheck(_)) => {}
            other => panic!("expected GateCheck, got {other:?}"),
        }
    }
}
