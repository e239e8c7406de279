//! Bounded fan-out over crossbeam channels.
//!
//! Every subscriber gets its own queue and sees every published value.
//! A full queue drops its oldest value so slow readers always hold the
//! freshest ones. Queues whose receiver was dropped are pruned on publish.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

struct Subscriber<T> {
    sender: Sender<T>,

    /// Our end of the queue, for dropping the oldest value and draining
    backlog: Receiver<T>,
}

impl<T> Subscriber<T> {
    /// Whether anyone besides us still holds the receiving end
    fn is_connected(&self) -> bool {
        self.sender.receiver_count() > 1
    }
}

pub struct Broadcast<T> {
    subscribers: Vec<Subscriber<T>>,
    capacity: usize,
}

impl<T: Clone> Broadcast<T> {
    /// Fan-out whose per-subscriber queues hold at most `capacity` values
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// New receiver that sees every value published from now on
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (sender, receiver) = bounded(self.capacity);
        self.subscribers.push(Subscriber {
            sender,
            backlog: receiver.clone(),
        });
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|s| s.is_connected()).count()
    }

    /// Deliver `value` to every live subscriber
    pub fn publish(&mut self, value: T) {
        self.subscribers.retain(Subscriber::is_connected);

        for subscriber in &self.subscribers {
            if let Err(TrySendError::Full(value)) = subscriber.sender.try_send(value.clone()) {
                let _ = subscriber.backlog.try_recv();
                let _ = subscriber.sender.try_send(value);
            }
        }
    }

    /// Discard every value not yet received, on every queue
    pub fn clear(&self) {
        for subscriber in &self.subscribers {
            while subscriber.backlog.try_recv().is_ok() {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_sees_every_value() {
        let mut broadcast = Broadcast::new(8);
        let a = broadcast.subscribe();
        let b = broadcast.subscribe();

        for i in 0..4 {
            broadcast.publish(i);
        }

        assert_eq!(a.try_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(b.try_iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut broadcast = Broadcast::new(3);
        let rx = broadcast.subscribe();

        for i in 0..10 {
            broadcast.publish(i);
        }

        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![7, 8, 9]);
    }

    #[test]
    fn test_slow_subscriber_does_not_starve_fast_one() {
        let mut broadcast = Broadcast::new(2);
        let slow = broadcast.subscribe();
        let fast = broadcast.subscribe();

        let mut seen = Vec::new();
        for i in 0..6 {
            broadcast.publish(i);
            seen.extend(fast.try_iter());
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(slow.try_iter().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut broadcast = Broadcast::new(4);
        let kept = broadcast.subscribe();
        drop(broadcast.subscribe());
        assert_eq!(broadcast.subscriber_count(), 1);

        broadcast.publish(1);
        assert_eq!(broadcast.subscribers.len(), 1);
        assert_eq!(kept.try_recv(), Ok(1));
    }

    #[test]
    fn test_clear_empties_every_queue() {
        let mut broadcast = Broadcast::new(4);
        let a = broadcast.subscribe();
        let b = broadcast.subscribe();
        broadcast.publish(1);
        broadcast.publish(2);

        broadcast.clear();
        assert!(a.try_recv().is_err());
        assert!(b.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers_holds_nothing() {
        let mut broadcast = Broadcast::new(4);
        for i in 0..1000 {
            broadcast.publish(i);
        }
        assert_eq!(broadcast.subscriber_count(), 0);
        assert!(broadcast.subscribers.is_empty());
    }
}
