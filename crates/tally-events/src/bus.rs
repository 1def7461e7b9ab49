use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use tally_types::{Identity, Timestamp};

use crate::event::{EventRecord, Notification, NotificationKind};

/// Filter for subscribing to a subset of notifications.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only notifications of these kinds are delivered.
    pub kinds: Option<Vec<NotificationKind>>,
    /// If set, only notifications about one of these identities are delivered.
    /// `ExpenseAdded` carries no identity and never matches.
    pub identities: Option<Vec<Identity>>,
}

impl EventFilter {
    pub fn kinds(kinds: impl Into<Vec<NotificationKind>>) -> Self {
        Self {
            kinds: Some(kinds.into()),
            ..Default::default()
        }
    }

    pub fn identity(identity: Identity) -> Self {
        Self {
            identities: Some(vec![identity]),
            ..Default::default()
        }
    }

    /// Returns `true` if the given record matches this filter.
    pub fn matches(&self, record: &EventRecord) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&record.kind()) {
                return false;
            }
        }
        if let Some(ref wanted) = self.identities {
            let involved = record.notification.identities();
            if !involved.iter().any(|id| wanted.contains(id)) {
                return false;
            }
        }
        true
    }
}

/// A broadcast channel receiver for notifications.
pub type EventStream = broadcast::Receiver<EventRecord>;

struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<EventRecord>,
}

/// Fan-out router that delivers records to matching subscribers.
struct EventRouter {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventRouter {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    fn subscribe(&self, filter: EventFilter, capacity: usize) -> EventStream {
        let (tx, rx) = broadcast::channel(capacity);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Route a record to all matching subscribers, pruning closed ones.
    fn route(&self, record: &EventRecord) -> usize {
        let mut delivered = 0;
        let mut subs = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subs.retain(|sub| {
            if sub.sender.receiver_count() == 0 {
                return false;
            }
            if sub.filter.matches(record) && sub.sender.send(record.clone()).is_ok() {
                delivered += 1;
            }
            true
        });
        delivered
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Configuration for the [`EventBus`].
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Capacity of per-subscriber broadcast channels.
    pub channel_capacity: usize,
    /// How many of the most recent records to retain. `0` keeps none.
    pub history_limit: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
            history_limit: 4096,
        }
    }
}

struct Journal {
    next_seq: u64,
    history: VecDeque<EventRecord>,
}

/// Ordered notification bus.
///
/// Records are numbered in the order `emit` is called. Callers that need
/// acceptance order to match mutation order must emit while still holding
/// whatever lock serializes their mutations.
pub struct EventBus {
    journal: Mutex<Journal>,
    router: EventRouter,
    config: BusConfig,
}

impl EventBus {
    pub fn new(config: BusConfig) -> Self {
        Self {
            journal: Mutex::new(Journal {
                next_seq: 1,
                history: VecDeque::new(),
            }),
            router: EventRouter::new(),
            config,
        }
    }

    /// Stamp, record, and fan out one notification.
    pub fn emit(&self, timestamp: Timestamp, notification: Notification) -> EventRecord {
        let mut journal = self.journal();
        let record = EventRecord::new(journal.next_seq, timestamp, notification);
        journal.next_seq += 1;

        if self.config.history_limit > 0 {
            if journal.history.len() == self.config.history_limit {
                journal.history.pop_front();
            }
            journal.history.push_back(record.clone());
        }

        // Routed under the journal lock so subscribers see seq order.
        let delivered = self.router.route(&record);
        debug!(seq = record.seq, kind = %record.kind(), delivered, "notification emitted");
        record
    }

    /// Subscribe to notifications matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        self.router.subscribe(filter, self.config.channel_capacity)
    }

    /// Retained records, oldest first.
    pub fn history(&self) -> Vec<EventRecord> {
        self.journal().history.iter().cloned().collect()
    }

    /// Retained records with `seq` strictly greater than `after`.
    pub fn history_since(&self, after: u64) -> Vec<EventRecord> {
        self.journal()
            .history
            .iter()
            .filter(|r| r.seq > after)
            .cloned()
            .collect()
    }

    /// Sequence number of the most recent record, or 0 if none.
    pub fn last_seq(&self) -> u64 {
        self.journal().next_seq - 1
    }

    /// Current number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.router.subscriber_count()
    }

    fn journal(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_types::identity::IDENTITY_LEN;

    fn id(seed: u8) -> Identity {
        Identity::from_raw([seed; IDENTITY_LEN])
    }

    fn added(id: u64) -> Notification {
        Notification::ExpenseAdded {
            id,
            label: format!("e{id}"),
        }
    }

    fn registered(seed: u8) -> Notification {
        Notification::PersonRegistered {
            identity: id(seed),
            name: format!("p{seed}"),
        }
    }

    #[test]
    fn seq_starts_at_one_and_increases() {
        let bus = EventBus::default();
        assert_eq!(bus.last_seq(), 0);
        let a = bus.emit(Timestamp::from_secs(1), added(0));
        let b = bus.emit(Timestamp::from_secs(1), added(1));
        assert_eq!((a.seq, b.seq), (1, 2));
        assert_eq!(bus.last_seq(), 2);
    }

    #[test]
    fn subscriber_receives_in_emit_order() {
        let bus = EventBus::default();
        let mut stream = bus.subscribe(EventFilter::default());

        bus.emit(Timestamp::from_secs(1), registered(1));
        bus.emit(Timestamp::from_secs(2), added(0));

        let first = stream.try_recv().unwrap();
        let second = stream.try_recv().unwrap();
        assert_eq!(first.kind(), NotificationKind::PersonRegistered);
        assert_eq!(second.notification, added(0));
        assert!(first.seq < second.seq);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn kind_filter_drops_other_kinds() {
        let bus = EventBus::default();
        let mut stream = bus.subscribe(EventFilter::kinds([NotificationKind::ExpenseAdded]));

        bus.emit(Timestamp::from_secs(1), registered(1));
        bus.emit(Timestamp::from_secs(1), added(7));

        assert_eq!(stream.try_recv().unwrap().notification, added(7));
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn identity_filter_matches_settlement_parties() {
        let bus = EventBus::default();
        let mut stream = bus.subscribe(EventFilter::identity(id(2)));

        bus.emit(Timestamp::from_secs(1), registered(1));
        bus.emit(Timestamp::from_secs(1), added(0));
        bus.emit(
            Timestamp::from_secs(1),
            Notification::DebtSettled {
                payer: id(1),
                payee: id(2),
                amount: 10,
            },
        );

        assert_eq!(stream.try_recv().unwrap().kind(), NotificationKind::DebtSettled);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = EventBus::default();
        let stream = bus.subscribe(EventFilter::default());
        let _kept = bus.subscribe(EventFilter::kinds([NotificationKind::NameUpdated]));
        assert_eq!(bus.subscriber_count(), 2);

        drop(stream);
        bus.emit(Timestamp::from_secs(1), added(0));
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn history_is_bounded() {
        let bus = EventBus::new(BusConfig {
            channel_capacity: 8,
            history_limit: 3,
        });
        for i in 0..5 {
            bus.emit(Timestamp::from_secs(i), added(i));
        }
        let seqs: Vec<u64> = bus.history().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![3, 4, 5]);
        assert_eq!(bus.history_since(4).len(), 1);
    }

    #[test]
    fn zero_history_limit_keeps_nothing() {
        let bus = EventBus::new(BusConfig {
            channel_capacity: 8,
            history_limit: 0,
        });
        bus.emit(Timestamp::from_secs(1), added(0));
        assert!(bus.history().is_empty());
        assert_eq!(bus.last_seq(), 1);
    }

    #[test]
    fn emitted_records_verify() {
        let bus = EventBus::default();
        let record = bus.emit(Timestamp::from_secs(5), registered(4));
        assert!(record.verify_integrity());
        assert!(bus.history()[0].verify_integrity());
    }

    #[tokio::test]
    async fn async_subscriber_receives() {
        let bus = EventBus::default();
        let mut stream = bus.subscribe(EventFilter::default());
        bus.emit(Timestamp::from_secs(1), added(0));
        let record = stream.recv().await.unwrap();
        assert_eq!(record.seq, 1);
    }
}
