use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
/// Event bus for host notifications
///
/// Subscribers receive their own copy of every published event, in order;
/// dropping the subscription unsubscribes.
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber<E> {
    id: SubscriberId,
    sender: Sender<E>,
}

type SubscriberList<E> = RwLock<Vec<Subscriber<E>>>;

/// Event bus for broadcasting one kind of event to subscribers
pub struct EventBus<E> {
    subscribers: Arc<SubscriberList<E>>,
    next_id: Arc<AtomicUsize>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Subscribe to events. The returned token unsubscribes when dropped.
    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = unbounded();
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));

        self.subscribers.write().push(Subscriber { id, sender: tx });

        Subscription {
            id,
            receiver: rx,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl<E: Clone> EventBus<E> {
    /// Publish an event to all subscribers
    pub fn publish(&self, event: E) {
        let subscribers = self.subscribers.read();

        for subscriber in subscribers.iter() {
            // Closed receiver means the subscriber is going away
            let _ = subscriber.sender.try_send(event.clone());
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Publishing handle for one kind of event on a shared bus
///
/// Several sources may feed the same bus. Subscribers then receive every
/// kind through one channel, in publication order.
pub struct EventSource<E, T> {
    bus: EventBus<T>,
    kind: PhantomData<fn(E)>,
}

impl<E, T> EventSource<E, T> {
    pub fn new(bus: &EventBus<T>) -> Self {
        Self {
            bus: bus.clone(),
            kind: PhantomData,
        }
    }
}

impl<E: Into<T>, T: Clone> EventSource<E, T> {
    pub fn publish(&self, event: E) {
        self.bus.publish(event.into());
    }
}

impl<E, T> Clone for EventSource<E, T> {
    fn clone(&self) -> Self {
        Self::new(&self.bus)
    }
}

/// Live subscription to an [`EventBus`]
pub struct Subscription<E> {
    id: SubscriberId,
    receiver: Receiver<E>,
    subscribers: Weak<SubscriberList<E>>,
}

impl<E> Subscription<E> {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn receiver(&self) -> &Receiver<E> {
        &self.receiver
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.write().retain(|s| s.id != self.id);
        }
    }
}
