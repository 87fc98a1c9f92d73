//! Event kinds and subscription matching.
//!
//! Subscription-filtering dispatch inspects a listener's declared interests
//! once, at registration time, and matches them against each event's kind.
//! A subscription is either an exact kind or a category supertype (all
//! message events, all guild events, and so on).

/// Discriminant of a decoded [`Event`](super::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MessageBulkDelete,
    UserUpdate,
    GuildCreate,
    GuildDelete,
    ChannelCreate,
    ChannelDelete,
    Disconnect,
    Unknown,
}

/// A declared listener interest: an exact event kind or a category
/// supertype covering a family of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// Every event.
    All,
    /// Every message event (create, update, delete, bulk delete).
    Message,
    /// Every guild event.
    Guild,
    /// Every channel event.
    Channel,
    /// Exactly one kind.
    Only(EventKind),
}

impl Subscription {
    /// Whether an event of `kind` falls under this subscription.
    pub fn matches(&self, kind: EventKind) -> bool {
        match self {
            Subscription::All => true,
            Subscription::Message => matches!(
                kind,
                EventKind::MessageCreate
                    | EventKind::MessageUpdate
                    | EventKind::MessageDelete
                    | EventKind::MessageBulkDelete
            ),
            Subscription::Guild => {
                matches!(kind, EventKind::GuildCreate | EventKind::GuildDelete)
            }
            Subscription::Channel => {
                matches!(kind, EventKind::ChannelCreate | EventKind::ChannelDelete)
            }
            Subscription::Only(k) => *k == kind,
        }
    }
}

/// A listener's full set of declared interests.
#[derive(Debug, Clone)]
pub struct Subscriptions(Vec<Subscription>);

impl Subscriptions {
    /// Interested in every event. This is the default for listeners that do
    /// not declare anything.
    pub fn all() -> Self {
        Self(vec![Subscription::All])
    }

    /// Interested only in the given subscriptions.
    pub fn only(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        Self(subscriptions.into_iter().collect())
    }

    /// Whether any declared subscription covers an event of `kind`.
    pub fn matches(&self, kind: EventKind) -> bool {
        self.0.iter().any(|s| s.matches(kind))
    }

    /// Whether the set is empty (matches nothing).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_matches_everything() {
        let subs = Subscriptions::all();
        assert!(subs.matches(EventKind::Ready));
        assert!(subs.matches(EventKind::Unknown));
    }

    #[test]
    fn category_matches_members_only() {
        let subs = Subscriptions::only([Subscription::Message]);
        assert!(subs.matches(EventKind::MessageCreate));
        assert!(subs.matches(EventKind::MessageBulkDelete));
        assert!(!subs.matches(EventKind::Ready));
        assert!(!subs.matches(EventKind::GuildCreate));
    }

    #[test]
    fn exact_kind_matches_itself_only() {
        let subs = Subscriptions::only([Subscription::Only(EventKind::Ready)]);
        assert!(subs.matches(EventKind::Ready));
        assert!(!subs.matches(EventKind::MessageCreate));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let subs = Subscriptions::only([]);
        assert!(subs.is_empty());
        assert!(!subs.matches(EventKind::Ready));
    }
}
