use std::any::Any;
use std::fmt;
use std::time::Duration;

/// A single managed panel instance.
///
/// The manager treats controllers as opaque polymorphic handles: it asks for
/// identity and status, and drives the lifecycle callbacks in a fixed order.
/// A controller moves through *init → show → open → (update while active) →
/// close → destroy*; a locked controller may be closed without destruction
/// and reopened later through the existing-instance path, in which case
/// `on_show`/`on_open` fire again but `on_init` does not.
///
/// Concrete controllers are produced exclusively by a
/// [`ViewFactory`](crate::factory::ViewFactory), so the core never names a
/// concrete panel type.
pub trait ViewController<V: Copy + Eq + Ord> {
    /// System-wide unique view id.
    fn view_id(&self) -> V;

    /// Display name. Uniqueness is advisory only; name lookups are
    /// first-match scans.
    fn view_name(&self) -> &str;

    /// Name of the group this controller routes to. Fixed for the
    /// controller's lifetime.
    fn group_name(&self) -> &str;

    /// Asset package backing this view, if any.
    fn package_name(&self) -> &str {
        ""
    }

    /// Locked controllers survive close requests: `on_close` still fires but
    /// the controller stays registered in its group.
    fn is_locked(&self) -> bool {
        false
    }

    /// Whether the backing package should be released once this view is
    /// torn down. Consulted by hosts wiring a
    /// [`ResourceManager`](crate::factory::ResourceManager), not by the core.
    fn auto_remove_package(&self) -> bool {
        false
    }

    /// Gates per-frame update dispatch; inactive controllers are skipped
    /// without side effects.
    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);

    /// Called exactly once, after construction and before the first
    /// `on_show`.
    fn on_init(&mut self) {}

    /// Called on every open request, before `on_open`, with the caller's
    /// user data.
    fn on_show(&mut self, _user_data: Option<&dyn Any>) {}

    /// Called on every open request, after `on_show`.
    fn on_open(&mut self, _animated: bool) {}

    fn on_hide(&mut self, _destroy: bool) {}

    /// Called on every close request, locked or not.
    fn on_close(&mut self, _animated: bool) {}

    fn on_destroy(&mut self) {}

    /// Per-frame update with logical and real elapsed time. Only reached
    /// while `is_active` returns true.
    fn on_update(&mut self, _dt: Duration, _real_dt: Duration) {}
}

impl<V: Copy + Eq + Ord> fmt::Debug for dyn ViewController<V> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("view_name", &self.view_name())
            .field("group_name", &self.group_name())
            .finish_non_exhaustive()
    }
}
