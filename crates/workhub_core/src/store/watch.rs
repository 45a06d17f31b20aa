//! Snapshot fan-out hub and cancellation guard.
//!
//! # Responsibility
//! - Deliver full collection snapshots to every live watcher in mutation
//!   order.
//! - Enforce exactly-once detach semantics through a consuming guard.
//!
//! # Invariants
//! - Watchers whose receiver has been dropped are pruned on the next publish.
//! - A guard detaches its watcher at most once, on `cancel` or on drop.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct WatcherTable<T> {
    next_id: u64,
    senders: Vec<(u64, Sender<Vec<T>>)>,
}

/// Fan-out hub broadcasting full snapshots to attached watchers.
pub struct SnapshotHub<T> {
    table: Arc<Mutex<WatcherTable<T>>>,
}

impl<T: Clone + Send + 'static> SnapshotHub<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(WatcherTable {
                next_id: 0,
                senders: Vec::new(),
            })),
        }
    }

    /// Registers a new watcher and delivers `initial` to it immediately.
    ///
    /// The returned receiver observes `initial` followed by every snapshot
    /// published after this call, in publish order.
    pub fn attach(&self, initial: Vec<T>) -> (Receiver<Vec<T>>, WatchGuard) {
        let (tx, rx) = channel();
        // A watcher that disconnects before its first snapshot is pruned by
        // the next publish, so a failed initial send is not an error.
        let _ = tx.send(initial);

        let id = {
            let mut table = lock_table(&self.table);
            let id = table.next_id;
            table.next_id += 1;
            table.senders.push((id, tx));
            id
        };

        let table = Arc::clone(&self.table);
        let guard = WatchGuard {
            detach: Some(Box::new(move || {
                lock_table(&table).senders.retain(|(entry, _)| *entry != id);
            })),
        };

        (rx, guard)
    }

    /// Broadcasts one snapshot to all live watchers, pruning dead ones.
    pub fn publish(&self, snapshot: &[T]) {
        let mut table = lock_table(&self.table);
        table
            .senders
            .retain(|(_, sender)| sender.send(snapshot.to_vec()).is_ok());
    }

    /// Number of currently attached watchers.
    pub fn watcher_count(&self) -> usize {
        lock_table(&self.table).senders.len()
    }
}

impl<T: Clone + Send + 'static> Default for SnapshotHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_table<T>(table: &Mutex<WatcherTable<T>>) -> MutexGuard<'_, WatcherTable<T>> {
    // The table holds plain sender handles; a watcher panicking mid-publish
    // cannot leave it in a torn state, so poison recovery is safe.
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Consuming cancellation token for one snapshot watcher.
///
/// Detaching happens exactly once: either through [`WatchGuard::cancel`] or
/// when the guard is dropped at teardown.
pub struct WatchGuard {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchGuard {
    /// Detaches the watcher. Consumes the guard, so a second cancel cannot
    /// be expressed.
    pub fn cancel(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.detach_now();
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotHub;

    #[test]
    fn attach_delivers_initial_snapshot() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let (rx, _guard) = hub.attach(vec![1, 2]);
        assert_eq!(rx.try_recv().unwrap(), vec![1, 2]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publish_reaches_every_watcher_in_order() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let (rx_a, _guard_a) = hub.attach(Vec::new());
        let (rx_b, _guard_b) = hub.attach(Vec::new());

        hub.publish(&[1]);
        hub.publish(&[1, 2]);

        for rx in [rx_a, rx_b] {
            assert_eq!(rx.try_recv().unwrap(), Vec::<u32>::new());
            assert_eq!(rx.try_recv().unwrap(), vec![1]);
            assert_eq!(rx.try_recv().unwrap(), vec![1, 2]);
        }
    }

    #[test]
    fn cancel_detaches_exactly_once() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let (rx, guard) = hub.attach(Vec::new());
        assert_eq!(hub.watcher_count(), 1);

        guard.cancel();
        assert_eq!(hub.watcher_count(), 0);

        hub.publish(&[7]);
        // Initial snapshot only; nothing published after cancel arrives.
        assert_eq!(rx.try_recv().unwrap(), Vec::<u32>::new());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropping_the_guard_detaches_too() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let (_rx, guard) = hub.attach(Vec::new());
        drop(guard);
        assert_eq!(hub.watcher_count(), 0);
    }

    #[test]
    fn dead_receivers_are_pruned_on_publish() {
        let hub: SnapshotHub<u32> = SnapshotHub::new();
        let (rx, guard) = hub.attach(Vec::new());
        drop(rx);
        // Guard still attached; the dead sender goes away on publish.
        hub.publish(&[1]);
        assert_eq!(hub.watcher_count(), 0);
        drop(guard);
    }
}
