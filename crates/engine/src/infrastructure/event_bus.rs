//! Synchronous in-process event bus.

use std::sync::{Arc, PoisonError, RwLock};

use moblevels_domain::LevelEvent;

use crate::infrastructure::ports::NotificationPort;

/// What a subscriber wants done with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Cancel,
}

type Subscriber = Arc<dyn Fn(&LevelEvent) -> Verdict + Send + Sync>;

/// Delivers each event to every subscriber in subscription order.
///
/// Every subscriber sees the event even after an earlier one cancelled it.
/// Cancelling a post-level event has no effect. Subscribers added while an
/// event is being delivered see the next event, not this one.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&LevelEvent) -> Verdict + Send + Sync + 'static) {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl NotificationPort for EventBus {
    fn publish(&self, event: &LevelEvent) -> bool {
        let subscribers: Vec<Subscriber> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let mut cancelled = false;
        for subscriber in subscribers.iter() {
            if subscriber(event) == Verdict::Cancel {
                cancelled = true;
            }
        }
        if cancelled {
            tracing::debug!(entity = %event.entity(), level = event.level(), "Event cancelled by subscriber");
        }
        cancelled && event.is_cancellable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use moblevels_domain::{EntityId, LevelCause};

    fn pre_level() -> LevelEvent {
        LevelEvent::PreLevel {
            entity: EntityId::new(),
            level: 4,
            info: BTreeSet::new(),
        }
    }

    #[test]
    fn no_subscribers_means_not_cancelled() {
        assert!(!EventBus::new().publish(&pre_level()));
    }

    #[test]
    fn one_cancel_cancels_but_everyone_is_notified() {
        let bus = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let first = seen.clone();
        bus.subscribe(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
            Verdict::Cancel
        });
        let second = seen.clone();
        bus.subscribe(move |_| {
            second.fetch_add(1, Ordering::SeqCst);
            Verdict::Continue
        });

        assert!(bus.publish(&pre_level()));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn post_level_cannot_be_cancelled() {
        let bus = EventBus::new();
        bus.subscribe(|_| Verdict::Cancel);
        let event = LevelEvent::PostLevel {
            entity: EntityId::new(),
            level: 4,
            cause: LevelCause::Normal,
            info: BTreeSet::new(),
        };
        assert!(!bus.publish(&event));
    }

    #[test]
    fn subscribers_may_subscribe_while_handling() {
        let bus = Arc::new(EventBus::new());
        let late_calls = Arc::new(AtomicUsize::new(0));
        let inner = bus.clone();
        let counter = late_calls.clone();
        bus.subscribe(move |_| {
            let counter = counter.clone();
            inner.subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Verdict::Continue
            });
            Verdict::Continue
        });

        assert!(!bus.publish(&pre_level()));
        assert_eq!(bus.subscriber_count(), 2);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        assert!(!bus.publish(&pre_level()));
        assert_eq!(bus.subscriber_count(), 3);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }
}
