//! Typed domain events decoded from gateway frames.

mod subscription;

use serde::{Deserialize, Serialize};

pub use subscription::{EventKind, Subscription, Subscriptions};

/// The logged-in account's own profile.
///
/// The email is not part of the base gateway payload contract; it is
/// populated by the user-account interceptor when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfProfile {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload of the ready event, the platform's signal that the session's
/// initial state has fully loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyData {
    #[serde(default)]
    pub session_id: Option<String>,
    pub user: SelfProfile,
}

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Reference to a single deleted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
    pub channel_id: String,
}

/// A bulk message deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDelete {
    pub channel_id: String,
    pub ids: Vec<String>,
}

/// A guild (server) the account belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A channel within a guild, or a private channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// A decoded domain event delivered to listeners.
#[derive(Debug, Clone)]
pub enum Event {
    /// The session's initial state has fully loaded.
    Ready(ReadyData),

    /// A message was posted.
    MessageCreate(Message),

    /// A message was edited.
    MessageUpdate(Message),

    /// A single message was deleted.
    MessageDelete(MessageRef),

    /// Several messages were deleted at once. Sessions configured with
    /// bulk-delete splitting never dispatch this variant; they dispatch one
    /// [`Event::MessageDelete`] per id instead.
    MessageBulkDelete(BulkDelete),

    /// The logged-in account's profile changed.
    UserUpdate(SelfProfile),

    /// A guild became available.
    GuildCreate(Guild),

    /// A guild became unavailable.
    GuildDelete(Guild),

    /// A channel was created.
    ChannelCreate(Channel),

    /// A channel was deleted.
    ChannelDelete(Channel),

    /// The gateway connection ended without a close being requested.
    Disconnect,

    /// An event type this library does not model.
    Unknown { kind: String },
}

impl Event {
    /// Returns the discriminant used for subscription matching.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Ready(_) => EventKind::Ready,
            Event::MessageCreate(_) => EventKind::MessageCreate,
            Event::MessageUpdate(_) => EventKind::MessageUpdate,
            Event::MessageDelete(_) => EventKind::MessageDelete,
            Event::MessageBulkDelete(_) => EventKind::MessageBulkDelete,
            Event::UserUpdate(_) => EventKind::UserUpdate,
            Event::GuildCreate(_) => EventKind::GuildCreate,
            Event::GuildDelete(_) => EventKind::GuildDelete,
            Event::ChannelCreate(_) => EventKind::ChannelCreate,
            Event::ChannelDelete(_) => EventKind::ChannelDelete,
            Event::Disconnect => EventKind::Disconnect,
            Event::Unknown { .. } => EventKind::Unknown,
        }
    }
}
