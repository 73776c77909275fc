//! Command Envelope
//!
//! Every state-changing operation travels as a [`Command<T>`]: the payload
//! plus metadata used for auditing and log correlation. Metadata is fixed at
//! construction and cannot be mutated afterwards.

use chrono::{DateTime, Utc};

use crate::context::CorrelationContext;
use crate::id::{CommandId, UserId};

/// Command metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    correlation_id: String,
    causation_id: Option<String>,
    user_id: Option<UserId>,
    timestamp: DateTime<Utc>,
}

impl CommandMetadata {
    /// Id linking this command to the request that caused it
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Id of the command or event that directly caused this one
    pub fn causation_id(&self) -> Option<&str> {
        self.causation_id.as_deref()
    }

    /// Acting user, when the command was issued by an authenticated principal
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A payload wrapped with command metadata
#[derive(Debug, Clone)]
pub struct Command<T> {
    id: CommandId,
    metadata: CommandMetadata,
    payload: T,
}

impl<T> Command<T> {
    /// Command issued inside a request: the correlation id is the request's.
    ///
    /// The command's own `id` is fresh, never the request id; the two are
    /// linked only through `metadata().correlation_id()`.
    pub fn new(payload: T, ctx: &CorrelationContext) -> Self {
        Self::builder(payload).build(Some(ctx))
    }

    /// Command issued outside any request (startup jobs, CLI tasks).
    pub fn detached(payload: T) -> Self {
        Self::builder(payload).build(None)
    }

    pub fn builder(payload: T) -> CommandBuilder<T> {
        CommandBuilder {
            payload,
            id: None,
            correlation_id: None,
            causation_id: None,
            user_id: None,
            timestamp: None,
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn into_parts(self) -> (CommandId, CommandMetadata, T) {
        (self.id, self.metadata, self.payload)
    }
}

/// Explicit overrides for command metadata
///
/// Anything left unset is derived at `build` time: a fresh id, the ambient
/// correlation id (or a fresh one without a context) and the current time.
#[must_use]
pub struct CommandBuilder<T> {
    payload: T,
    id: Option<CommandId>,
    correlation_id: Option<String>,
    causation_id: Option<String>,
    user_id: Option<UserId>,
    timestamp: Option<DateTime<Utc>>,
}

impl<T> CommandBuilder<T> {
    pub fn id(mut self, id: CommandId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn causation_id(mut self, causation_id: impl Into<String>) -> Self {
        self.causation_id = Some(causation_id.into());
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn build(self, ctx: Option<&CorrelationContext>) -> Command<T> {
        let correlation_id = self
            .correlation_id
            .or_else(|| ctx.map(|c| c.request_id().to_string()))
            .unwrap_or_else(|| CorrelationContext::new().request_id().to_string());

        Command {
            id: self.id.unwrap_or_default(),
            metadata: CommandMetadata {
                correlation_id,
                causation_id: self.causation_id,
                user_id: self.user_id,
                timestamp: self.timestamp.unwrap_or_else(Utc::now),
            },
            payload: self.payload,
        }
    }
}
