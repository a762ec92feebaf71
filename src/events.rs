//! Lifecycle notifications and the subscriber list behind them.

use std::any::Any;

/// Payload for the "view opened" notification.
#[derive(Clone, Copy)]
pub struct ViewOpened<'a, V> {
    pub view_id: V,
    pub view_name: &'a str,
    pub group_name: &'a str,
    /// Caller-supplied data forwarded from the open request.
    pub user_data: Option<&'a dyn Any>,
}

/// Payload for the "view closed" notification.
///
/// `user_data` is always `None`: close requests carry no user data. The
/// field exists so the payload shape mirrors [`ViewOpened`].
#[derive(Clone, Copy)]
pub struct ViewClosed<'a, V> {
    pub view_id: V,
    pub view_name: &'a str,
    pub group_name: &'a str,
    pub user_data: Option<&'a dyn Any>,
}

/// Handle returned from a subscription, used to unsubscribe.
///
/// Ids are scoped to the list that issued them; the opened and closed lists
/// hand out ids independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Boxed "view opened" subscriber.
pub type OpenedListener<V> = dyn for<'a> FnMut(ViewOpened<'a, V>);

/// Boxed "view closed" subscriber.
pub type ClosedListener<V> = dyn for<'a> FnMut(ViewClosed<'a, V>);

/// Ordered list of notification subscribers.
///
/// Dispatch walks subscribers in subscription order, synchronously, with no
/// isolation between them: a panicking subscriber unwinds through the
/// dispatch loop and the remaining subscribers are not called.
pub struct ListenerList<F: ?Sized> {
    entries: Vec<(ListenerId, Box<F>)>,
    next_id: u64,
}

impl<F: ?Sized> ListenerList<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, listener: Box<F>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Removes a subscriber. Returns `false` when the id is unknown, e.g.
    /// already removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<F>> {
        self.entries.iter_mut().map(|(_, listener)| listener)
    }
}

impl<F: ?Sized> Default for ListenerList<F> {
    fn default() -> Self {
        Self::new()
    }
}
