use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// "Scroll to the newly inserted row" signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted {
    /// A list appeared at `index` of the list collection
    List { index: usize },
    /// An item appeared at projected `index` of list `list_id`
    Item { list_id: String, index: usize },
}

/// What the action button of a [`Notice`] does when pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeAction {
    UndoDeleteList,
    UndoDeleteItem { list_id: String },
}

/// A dismissible message with an optional action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub action_label: Option<String>,
    pub action: Option<NoticeAction>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Notice {
            message: message.into(),
            action_label: None,
            action: None,
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, action: NoticeAction) -> Self {
        self.action_label = Some(label.into());
        self.action = Some(action);
        self
    }
}

/// Insertion events kept for a subscriber that is not reading; older ones
/// are dropped first
pub const MAX_PENDING_INSERTS: usize = 16;

#[derive(Debug, Default)]
struct ChannelState {
    /// Token of the current subscriber
    current: Option<u64>,
    next_token: u64,
    inserted: VecDeque<Inserted>,
    notice: Option<Notice>,
}

/// Shared event channel between the stores and a single UI subscriber.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone, Default)]
pub struct EventChannel {
    state: Rc<RefCell<ChannelState>>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the subscriber, replacing any previous one. Insertion events
    /// queued for the previous subscriber are discarded; a pending notice is
    /// kept.
    pub fn subscribe(&self) -> EventReceiver {
        let mut state = self.state.borrow_mut();
        let token = state.next_token;
        state.next_token += 1;
        state.current = Some(token);
        state.inserted.clear();
        EventReceiver {
            state: Rc::clone(&self.state),
            token,
        }
    }

    pub fn has_subscriber(&self) -> bool {
        self.state.borrow().current.is_some()
    }

    /// Queue an insertion event. Dropped when nobody is subscribed; at most
    /// [`MAX_PENDING_INSERTS`] are kept.
    pub fn emit_inserted(&self, event: Inserted) {
        let mut state = self.state.borrow_mut();
        if state.current.is_none() {
            tracing::trace!(?event, "no subscriber, insertion event dropped");
            return;
        }
        if state.inserted.len() == MAX_PENDING_INSERTS {
            state.inserted.pop_front();
        }
        state.inserted.push_back(event);
    }

    /// Show a notice, superseding any notice not yet taken
    pub fn publish(&self, notice: Notice) {
        self.state.borrow_mut().notice = Some(notice);
    }
}

/// The subscriber's end of an [`EventChannel`].
///
/// A receiver that has been replaced by a newer subscription reads nothing.
#[derive(Debug)]
pub struct EventReceiver {
    state: Rc<RefCell<ChannelState>>,
    token: u64,
}

impl EventReceiver {
    pub fn is_current(&self) -> bool {
        self.state.borrow().current == Some(self.token)
    }

    pub fn next_inserted(&self) -> Option<Inserted> {
        if !self.is_current() {
            return None;
        }
        self.state.borrow_mut().inserted.pop_front()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        if !self.is_current() {
            return None;
        }
        self.state.borrow_mut().notice.take()
    }
}

impl Drop for EventReceiver {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.current == Some(self.token) {
            state.current = None;
            state.inserted.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_without_subscriber_are_dropped() {
        let channel = EventChannel::new();
        channel.emit_inserted(Inserted::List { index: 0 });
        let rx = channel.subscribe();
        assert_eq!(rx.next_inserted(), None);
    }

    #[test]
    fn test_events_arrive_in_order() {
        let channel = EventChannel::new();
        let rx = channel.subscribe();
        channel.emit_inserted(Inserted::List { index: 2 });
        channel.clone().emit_inserted(Inserted::List { index: 3 });
        assert_eq!(rx.next_inserted(), Some(Inserted::List { index: 2 }));
        assert_eq!(rx.next_inserted(), Some(Inserted::List { index: 3 }));
        assert_eq!(rx.next_inserted(), None);
    }

    #[test]
    fn test_new_subscriber_replaces_old() {
        let channel = EventChannel::new();
        let old = channel.subscribe();
        channel.emit_inserted(Inserted::List { index: 0 });
        let new = channel.subscribe();
        assert!(!old.is_current());
        assert!(new.is_current());
        assert_eq!(new.next_inserted(), None);

        channel.emit_inserted(Inserted::List { index: 1 });
        assert_eq!(old.next_inserted(), None);
        // Dropping the stale receiver leaves the new one subscribed
        drop(old);
        assert!(channel.has_subscriber());
        assert_eq!(new.next_inserted(), Some(Inserted::List { index: 1 }));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let channel = EventChannel::new();
        let rx = channel.subscribe();
        drop(rx);
        assert!(!channel.has_subscriber());
    }

    #[test]
    fn test_notice_slot_is_overwritten() {
        let channel = EventChannel::new();
        channel.publish(Notice::new("Deleted: A"));
        channel.publish(
            Notice::new("Deleted: B").with_action("Undo", NoticeAction::UndoDeleteList),
        );
        let rx = channel.subscribe();
        let notice = rx.take_notice().unwrap();
        assert_eq!(notice.message, "Deleted: B");
        assert_eq!(notice.action_label.as_deref(), Some("Undo"));
        assert_eq!(notice.action, Some(NoticeAction::UndoDeleteList));
        assert_eq!(rx.take_notice(), None);
    }

    #[test]
    fn test_pending_inserts_are_capped() {
        let channel = EventChannel::new();
        let rx = channel.subscribe();
        for index in 0..MAX_PENDING_INSERTS + 5 {
            channel.emit_inserted(Inserted::List { index });
        }
        // The oldest events went first
        assert_eq!(rx.next_inserted(), Some(Inserted::List { index: 5 }));
        let mut remaining = 1;
        let mut last = None;
        while let Some(event) = rx.next_inserted() {
            remaining += 1;
            last = Some(event);
        }
        assert_eq!(remaining, MAX_PENDING_INSERTS);
        assert_eq!(
            last,
            Some(Inserted::List {
                index: MAX_PENDING_INSERTS + 4
            })
        );
    }
}
