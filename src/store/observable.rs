use std::sync::mpsc::{self, Receiver, Sender};

/// A value plus a broadcast to any number of watchers.
///
/// Each change bumps a version counter and sends it to every live watcher.
/// Watchers whose receiving end was dropped are pruned on the next change.
#[derive(Debug)]
pub struct Observable<T> {
    value: T,
    version: u64,
    watchers: Vec<Sender<u64>>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Observable {
            value,
            version: 0,
            watchers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of changes so far
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mutate in place and notify, whether or not the value changed
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.value);
        self.notify();
    }

    pub fn watch(&mut self) -> Watcher {
        let (tx, rx) = mpsc::channel();
        self.watchers.push(tx);
        Watcher { rx }
    }

    fn notify(&mut self) {
        self.version += 1;
        let version = self.version;
        self.watchers.retain(|tx| tx.send(version).is_ok());
    }
}

impl<T: PartialEq> Observable<T> {
    /// Replace the value. Watchers are only notified when it differs.
    /// Returns whether a change happened.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.notify();
        true
    }
}

/// Receiving end of an [`Observable`] subscription
#[derive(Debug)]
pub struct Watcher {
    rx: Receiver<u64>,
}

impl Watcher {
    /// Drain pending notifications. Returns the latest version seen, or
    /// `None` if nothing changed since the last poll.
    pub fn poll(&self) -> Option<u64> {
        self.rx.try_iter().last()
    }

    /// Whether the value changed since the last poll
    pub fn changed(&self) -> bool {
        self.poll().is_some()
    }
}
