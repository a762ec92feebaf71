use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::controller::ViewController;
use crate::error::ViewError;

/// A named bucket of view controllers sharing a rendering depth.
///
/// Controllers live in a slot arena with a `BTreeMap` index from view id to
/// slot: removal vacates the slot for reuse instead of shifting the backing
/// vector, and ownership of a controller is exclusive to the group holding
/// it. Iteration (update dispatch, name scans) follows the index, sorted by
/// view id, which keeps the order stable within a run.
///
/// Groups are created through
/// [`ViewManager::add_group`](crate::manager::ViewManager::add_group).
pub struct ViewGroup<V: Copy + Eq + Ord> {
    name: String,
    depth: i32,
    slots: Vec<Option<Box<dyn ViewController<V>>>>,
    free: Vec<usize>,
    index: BTreeMap<V, usize>,
}

impl<V: Copy + Eq + Ord + fmt::Debug> ViewGroup<V> {
    pub(crate) fn new(name: impl Into<String>, depth: i32) -> Self {
        Self {
            name: name.into(),
            depth,
            slots: Vec::new(),
            free: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rendering depth of the group's visual layer.
    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: i32) {
        if self.depth == depth {
            return;
        }
        self.depth = depth;
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn has_view(&self, view_id: V) -> bool {
        self.index.contains_key(&view_id)
    }

    /// Name-based membership test. Linear scan, first match in id order.
    pub fn has_view_named(&self, view_name: &str) -> Result<bool, ViewError> {
        Ok(self.view_named(view_name)?.is_some())
    }

    pub fn view(&self, view_id: V) -> Option<&dyn ViewController<V>> {
        self.index
            .get(&view_id)
            .and_then(|&slot| self.slots[slot].as_deref())
    }

    pub fn view_mut(&mut self, view_id: V) -> Option<&mut (dyn ViewController<V> + 'static)> {
        let slot = *self.index.get(&view_id)?;
        self.slots[slot].as_deref_mut()
    }

    /// Name-based lookup. Linear scan over all members; when duplicate names
    /// exist the first match in id order wins.
    pub fn view_named(&self, view_name: &str) -> Result<Option<&dyn ViewController<V>>, ViewError> {
        if view_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        for &slot in self.index.values() {
            if let Some(controller) = self.slots[slot].as_deref() {
                if controller.view_name() == view_name {
                    return Ok(Some(controller));
                }
            }
        }
        Ok(None)
    }

    pub fn view_named_mut(
        &mut self,
        view_name: &str,
    ) -> Result<Option<&mut (dyn ViewController<V> + 'static)>, ViewError> {
        if view_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        let found = self.index.values().copied().find(|&slot| {
            self.slots[slot]
                .as_deref()
                .is_some_and(|controller| controller.view_name() == view_name)
        });
        Ok(found.and_then(|slot| self.slots[slot].as_deref_mut()))
    }

    /// Registers a controller under its own id, reusing a vacated slot when
    /// one exists. Duplicate ids are a structural misuse, not a recoverable
    /// condition.
    pub fn add_view(&mut self, controller: Box<dyn ViewController<V>>) -> Result<(), ViewError> {
        let view_id = controller.view_id();
        if self.index.contains_key(&view_id) {
            return Err(ViewError::DuplicateView(
                format!("{view_id:?}"),
                self.name.clone(),
            ));
        }
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(controller);
                slot
            }
            None => {
                self.slots.push(Some(controller));
                self.slots.len() - 1
            }
        };
        self.index.insert(view_id, slot);
        Ok(())
    }

    /// Removes and returns the controller registered under `view_id`.
    /// Existence is validated before anything mutates.
    pub fn remove_view(&mut self, view_id: V) -> Result<Box<dyn ViewController<V>>, ViewError> {
        let Some(&slot) = self.index.get(&view_id) else {
            return Err(ViewError::ViewNotFound(format!("{view_id:?}")));
        };
        let controller = self.slots[slot]
            .take()
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;
        self.index.remove(&view_id);
        self.free.push(slot);
        Ok(controller)
    }

    /// Name-based removal. First match in id order, like [`view_named`].
    ///
    /// [`view_named`]: ViewGroup::view_named
    pub fn remove_view_named(
        &mut self,
        view_name: &str,
    ) -> Result<Box<dyn ViewController<V>>, ViewError> {
        let view_id = self
            .view_named(view_name)?
            .map(|controller| controller.view_id())
            .ok_or_else(|| ViewError::ViewNotFound(view_name.to_owned()))?;
        self.remove_view(view_id)
    }

    /// Snapshot of the current membership keys. Callers that close or remove
    /// views while iterating must walk a snapshot, never the live index.
    pub fn view_ids(&self) -> Vec<V> {
        self.index.keys().copied().collect()
    }

    pub fn views(&self) -> impl Iterator<Item = &dyn ViewController<V>> {
        self.index
            .values()
            .filter_map(|&slot| self.slots[slot].as_deref())
    }

    /// Clears membership without invoking any teardown callback; closing
    /// views first is the caller's responsibility.
    pub fn remove_all(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
    }

    /// Per-frame update dispatch. Inactive controllers are skipped without
    /// side effects.
    pub fn update(&mut self, dt: Duration, real_dt: Duration) {
        for &slot in self.index.values() {
            if let Some(controller) = self.slots[slot].as_deref_mut() {
                if controller.is_active() {
                    controller.on_update(dt, real_dt);
                }
            }
        }
    }
}

impl<V: Copy + Eq + Ord + fmt::Debug> fmt::Debug for ViewGroup<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewGroup")
            .field("name", &self.name)
            .field("depth", &self.depth)
            .field("views", &self.view_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct TestView {
        id: u32,
        name: String,
        active: bool,
        updates: Rc<Cell<u32>>,
    }

    impl TestView {
        fn boxed(id: u32, name: &str) -> Box<dyn ViewController<u32>> {
            Box::new(Self {
                id,
                name: name.to_owned(),
                active: true,
                updates: Rc::new(Cell::new(0)),
            })
        }
    }

    impl ViewController<u32> for TestView {
        fn view_id(&self) -> u32 {
            self.id
        }

        fn view_name(&self) -> &str {
            &self.name
        }

        fn group_name(&self) -> &str {
            "test"
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn set_active(&mut self, active: bool) {
            self.active = active;
        }

        fn on_update(&mut self, _dt: Duration, _real_dt: Duration) {
            self.updates.set(self.updates.get() + 1);
        }
    }

    #[test]
    fn add_then_remove_round_trip() {
        let mut group = ViewGroup::new("test", 0);
        group.add_view(TestView::boxed(1, "one")).unwrap();
        assert!(group.has_view(1));
        assert_eq!(group.len(), 1);

        let removed = group.remove_view(1).unwrap();
        assert_eq!(removed.view_id(), 1);
        assert!(!group.has_view(1));
        assert!(group.is_empty());

        // second removal of the same id fails
        let err = group.remove_view(1).unwrap_err();
        assert_eq!(err, ViewError::ViewNotFound("1".into()));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut group = ViewGroup::new("test", 0);
        group.add_view(TestView::boxed(1, "one")).unwrap();
        let err = group.add_view(TestView::boxed(1, "other")).unwrap_err();
        assert_eq!(err, ViewError::DuplicateView("1".into(), "test".into()));
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn vacated_slots_are_reused() {
        let mut group = ViewGroup::new("test", 0);
        group.add_view(TestView::boxed(1, "one")).unwrap();
        group.add_view(TestView::boxed(2, "two")).unwrap();
        group.remove_view(1).unwrap();
        group.add_view(TestView::boxed(3, "three")).unwrap();
        // slot from id 1 was recycled; the arena did not grow
        assert_eq!(group.slots.len(), 2);
        assert_eq!(group.view_ids(), vec![2, 3]);
    }

    #[test]
    fn name_lookups_reject_empty_names() {
        let mut group: ViewGroup<u32> = ViewGroup::new("test", 0);
        assert_eq!(group.has_view_named(""), Err(ViewError::EmptyName));
        assert!(group.view_named("").is_err());
        assert!(group.view_named_mut("").is_err());
        assert!(group.remove_view_named("").is_err());
    }

    #[test]
    fn name_lookup_is_first_match_in_id_order() {
        let mut group = ViewGroup::new("test", 0);
        group.add_view(TestView::boxed(2, "dup")).unwrap();
        group.add_view(TestView::boxed(1, "dup")).unwrap();
        let found = group.view_named("dup").unwrap().unwrap();
        assert_eq!(found.view_id(), 1);
    }

    #[test]
    fn update_skips_inactive_views() {
        let mut group = ViewGroup::new("test", 0);
        let active_updates = Rc::new(Cell::new(0));
        let idle_updates = Rc::new(Cell::new(0));
        group
            .add_view(Box::new(TestView {
                id: 1,
                name: "active".into(),
                active: true,
                updates: active_updates.clone(),
            }))
            .unwrap();
        group
            .add_view(Box::new(TestView {
                id: 2,
                name: "idle".into(),
                active: false,
                updates: idle_updates.clone(),
            }))
            .unwrap();

        let dt = Duration::from_millis(16);
        group.update(dt, dt);
        group.update(dt, dt);

        assert_eq!(active_updates.get(), 2);
        assert_eq!(idle_updates.get(), 0);
    }

    #[test]
    fn remove_all_clears_without_callbacks() {
        let mut group = ViewGroup::new("test", 3);
        group.add_view(TestView::boxed(1, "one")).unwrap();
        group.add_view(TestView::boxed(2, "two")).unwrap();
        group.remove_all();
        assert!(group.is_empty());
        assert_eq!(group.depth(), 3);
    }
}
