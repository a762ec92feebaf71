use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::controller::ViewController;
use crate::error::ViewError;
use crate::events::{
    ClosedListener, ListenerId, ListenerList, OpenedListener, ViewClosed, ViewOpened,
};
use crate::factory::{GroupLayerFactory, ResourceManager, ViewFactory};
use crate::group::ViewGroup;

/// Owns all view groups and orchestrates the open/close lifecycle.
///
/// The manager is an explicitly constructed object bound to the host's frame
/// loop: the host calls [`update`] once per frame and [`shutdown`] when it
/// tears the UI down. All operations are synchronous and single-threaded;
/// there is no internal locking and none is needed.
///
/// An open or close request resolves the owning group through the
/// [`ViewFactory`], mutates that group's membership, runs the controller's
/// lifecycle callbacks, and finally fires the matching notification to all
/// subscribers in subscription order. Validation always precedes mutation:
/// a failed request leaves no partial state behind.
///
/// [`update`]: ViewManager::update
/// [`shutdown`]: ViewManager::shutdown
pub struct ViewManager<V: Copy + Eq + Ord> {
    groups: BTreeMap<String, ViewGroup<V>>,
    factory: Box<dyn ViewFactory<V>>,
    layers: Box<dyn GroupLayerFactory>,
    resources: Option<Box<dyn ResourceManager>>,
    opened: ListenerList<OpenedListener<V>>,
    closed: ListenerList<ClosedListener<V>>,
}

impl<V: Copy + Eq + Ord + fmt::Debug> ViewManager<V> {
    /// Creates a manager over the two mandatory collaborators. Groups start
    /// empty and are only ever created explicitly via [`add_group`].
    ///
    /// [`add_group`]: ViewManager::add_group
    pub fn new(factory: Box<dyn ViewFactory<V>>, layers: Box<dyn GroupLayerFactory>) -> Self {
        Self {
            groups: BTreeMap::new(),
            factory,
            layers,
            resources: None,
            opened: ListenerList::new(),
            closed: ListenerList::new(),
        }
    }

    /// Installs the optional asset-package collaborator. The core holds it
    /// for controllers and hosts to reach through [`resource_manager`]; the
    /// open/close control flow does not call it.
    ///
    /// [`resource_manager`]: ViewManager::resource_manager
    pub fn set_resource_manager(&mut self, resources: Box<dyn ResourceManager>) {
        self.resources = Some(resources);
    }

    pub fn resource_manager(&mut self) -> Option<&mut (dyn ResourceManager + 'static)> {
        self.resources.as_deref_mut()
    }

    /// Number of registered groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn has_group(&self, group_name: &str) -> Result<bool, ViewError> {
        if group_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        Ok(self.groups.contains_key(group_name))
    }

    pub fn group(&self, group_name: &str) -> Result<Option<&ViewGroup<V>>, ViewError> {
        if group_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        Ok(self.groups.get(group_name))
    }

    pub fn group_mut(&mut self, group_name: &str) -> Result<Option<&mut ViewGroup<V>>, ViewError> {
        if group_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        Ok(self.groups.get_mut(group_name))
    }

    /// All groups, in name order.
    pub fn groups(&self) -> impl Iterator<Item = &ViewGroup<V>> {
        self.groups.values()
    }

    /// Idempotent group creation. Returns `Ok(false)` without any side
    /// effect when a group of that name already exists (the existing depth
    /// is kept); otherwise registers the group, asks the layer factory for
    /// its visual layer exactly once, and returns `Ok(true)`.
    pub fn add_group(&mut self, group_name: &str, depth: i32) -> Result<bool, ViewError> {
        if group_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        if self.groups.contains_key(group_name) {
            return Ok(false);
        }
        self.groups
            .insert(group_name.to_owned(), ViewGroup::new(group_name, depth));
        self.layers.create_group_layer(group_name, depth);
        tracing::debug!(group = group_name, depth, "added view group");
        Ok(true)
    }

    /// Whether `view_id` is currently registered. An id whose group cannot
    /// be resolved, or whose group does not exist, is simply not registered.
    pub fn has_view(&self, view_id: V) -> bool {
        self.group_of(view_id)
            .is_some_and(|group| group.has_view(view_id))
    }

    /// Name-based membership test: first-match scan across all groups in
    /// name order. View names are not required to be unique, so with
    /// duplicates this answers for whichever match comes first.
    pub fn has_view_named(&self, view_name: &str) -> Result<bool, ViewError> {
        Ok(self.view_named(view_name)?.is_some())
    }

    pub fn view(&self, view_id: V) -> Option<&dyn ViewController<V>> {
        self.group_of(view_id).and_then(|group| group.view(view_id))
    }

    pub fn view_mut(&mut self, view_id: V) -> Option<&mut (dyn ViewController<V> + 'static)> {
        self.group_of_mut(view_id)
            .and_then(|group| group.view_mut(view_id))
    }

    /// Name-based lookup: linear scan across groups in name order, first
    /// match wins.
    pub fn view_named(&self, view_name: &str) -> Result<Option<&dyn ViewController<V>>, ViewError> {
        if view_name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        for group in self.groups.values() {
            if let Some(controller) = group.view_named(view_name)? {
                return Ok(Some(controller));
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
        let mut owner = None;
        for (group_name, group) in &self.groups {
            if group.has_view_named(view_name)? {
                owner = Some(group_name.clone());
                break;
            }
        }
        if let Some(group_name) = owner {
            if let Some(group) = self.groups.get_mut(&group_name) {
                return group.view_named_mut(view_name);
            }
        }
        Ok(None)
    }

    /// Toggles per-frame update dispatch for a registered view.
    pub fn set_view_active(&mut self, view_id: V, active: bool) -> Result<(), ViewError> {
        let controller = self
            .view_mut(view_id)
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;
        controller.set_active(active);
        Ok(())
    }

    /// Opens a view and returns its controller.
    ///
    /// When the view is already registered in its group, the existing
    /// instance is shown and opened again without reconstruction or
    /// re-registration. On a first open the factory builds the controller,
    /// which then runs `on_init`, `on_show`, `on_open` and joins its group.
    /// Either way the opened notification fires once, after the state
    /// settles.
    ///
    /// Fails with [`ViewError::GroupNotFound`] when no group is registered
    /// for the id, before any controller is constructed or notification
    /// fired. Groups are never auto-created here.
    pub fn open_view(
        &mut self,
        view_id: V,
        user_data: Option<&dyn Any>,
        animated: bool,
    ) -> Result<&mut (dyn ViewController<V> + 'static), ViewError> {
        let group_name = self
            .factory
            .group_name_of(view_id)
            .ok_or_else(|| ViewError::GroupNotFound(format!("{view_id:?}")))?;
        let group = self
            .groups
            .get_mut(&group_name)
            .ok_or_else(|| ViewError::GroupNotFound(format!("{view_id:?}")))?;

        if let Some(existing) = group.view_mut(view_id) {
            existing.on_show(user_data);
            existing.on_open(animated);
        } else {
            let mut controller = self.factory.create_controller(view_id, user_data);
            controller.on_init();
            controller.on_show(user_data);
            controller.on_open(animated);
            group.add_view(controller)?;
        }

        let (view_name, owner) = {
            let controller = group
                .view(view_id)
                .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;
            (
                controller.view_name().to_owned(),
                controller.group_name().to_owned(),
            )
        };
        tracing::debug!(view_id = ?view_id, view = %view_name, group = %owner, "opened view");

        let event = ViewOpened {
            view_id,
            view_name: &view_name,
            group_name: &owner,
            user_data,
        };
        for listener in self.opened.iter_mut() {
            listener(event);
        }

        group
            .view_mut(view_id)
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))
    }

    /// Closes a view.
    ///
    /// Locked views take the soft path: `on_close` fires but the controller
    /// stays registered in its group, ready to be reopened. Unlocked views
    /// are removed from their group first and then closed; the controller is
    /// dropped afterwards, and any further teardown is its own concern.
    /// The closed notification fires in both cases, always with no user
    /// data.
    pub fn close_view(&mut self, view_id: V, animated: bool) -> Result<(), ViewError> {
        let group_name = self
            .factory
            .group_name_of(view_id)
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;
        let group = self
            .groups
            .get_mut(&group_name)
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;

        let locked = group
            .view(view_id)
            .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?
            .is_locked();
        tracing::debug!(view_id = ?view_id, locked, "closing view");

        let (view_name, owner) = if locked {
            let controller = group
                .view_mut(view_id)
                .ok_or_else(|| ViewError::ViewNotFound(format!("{view_id:?}")))?;
            controller.on_close(animated);
            (
                controller.view_name().to_owned(),
                controller.group_name().to_owned(),
            )
        } else {
            let mut controller = group.remove_view(view_id)?;
            controller.on_close(animated);
            (
                controller.view_name().to_owned(),
                controller.group_name().to_owned(),
            )
        };

        let event = ViewClosed {
            view_id,
            view_name: &view_name,
            group_name: &owner,
            user_data: None,
        };
        for listener in self.closed.iter_mut() {
            listener(event);
        }
        Ok(())
    }

    /// Closes every registered view, non-animated. Works over snapshots of
    /// the group list and each group's membership, since closing mutates
    /// membership mid-iteration. Locked views receive their close callback
    /// and remain registered.
    pub fn close_all_views(&mut self) -> Result<(), ViewError> {
        let group_names: Vec<String> = self.groups.keys().cloned().collect();
        for group_name in group_names {
            let view_ids = match self.groups.get(&group_name) {
                Some(group) => group.view_ids(),
                None => continue,
            };
            for view_id in view_ids {
                self.close_view(view_id, false)?;
            }
        }
        Ok(())
    }

    /// Per-frame update: forwards logical and real elapsed time to every
    /// group in name order.
    pub fn update(&mut self, dt: Duration, real_dt: Duration) {
        for group in self.groups.values_mut() {
            group.update(dt, real_dt);
        }
    }

    /// Drops all group membership and the groups themselves. No teardown
    /// callbacks run here; hosts that care about close side effects must
    /// call [`close_all_views`] first.
    ///
    /// [`close_all_views`]: ViewManager::close_all_views
    pub fn shutdown(&mut self) {
        tracing::debug!(groups = self.groups.len(), "shutting down view manager");
        for group in self.groups.values_mut() {
            group.remove_all();
        }
        self.groups.clear();
    }

    /// Subscribes to the "view opened" notification. Subscribers run
    /// synchronously inside [`open_view`], in subscription order, without
    /// isolation: a panicking subscriber aborts delivery to the rest.
    ///
    /// [`open_view`]: ViewManager::open_view
    pub fn on_view_opened<F>(&mut self, listener: F) -> ListenerId
    where
        F: for<'a> FnMut(ViewOpened<'a, V>) + 'static,
    {
        self.opened.subscribe(Box::new(listener))
    }

    /// Subscribes to the "view closed" notification. Same delivery contract
    /// as [`on_view_opened`].
    ///
    /// [`on_view_opened`]: ViewManager::on_view_opened
    pub fn on_view_closed<F>(&mut self, listener: F) -> ListenerId
    where
        F: for<'a> FnMut(ViewClosed<'a, V>) + 'static,
    {
        self.closed.subscribe(Box::new(listener))
    }

    pub fn unsubscribe_opened(&mut self, id: ListenerId) -> bool {
        self.opened.unsubscribe(id)
    }

    pub fn unsubscribe_closed(&mut self, id: ListenerId) -> bool {
        self.closed.unsubscribe(id)
    }

    fn group_of(&self, view_id: V) -> Option<&ViewGroup<V>> {
        let group_name = self.factory.group_name_of(view_id)?;
        self.groups.get(&group_name)
    }

    fn group_of_mut(&mut self, view_id: V) -> Option<&mut ViewGroup<V>> {
        let group_name = self.factory.group_name_of(view_id)?;
        self.groups.get_mut(&group_name)
    }
}
