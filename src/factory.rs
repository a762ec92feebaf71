//! Collaborator traits implemented by the host application.
//
//! The core never constructs widgets, layers, or asset packages itself; it
//! delegates through these three seams and only tracks the bookkeeping.

use std::any::Any;

use crate::controller::ViewController;

/// Constructs view controllers and resolves view-id metadata.
pub trait ViewFactory<V: Copy + Eq + Ord> {
    /// Build the controller backing `view_id`. Called once per first open;
    /// reopened views reuse the existing instance.
    fn create_controller(
        &mut self,
        view_id: V,
        user_data: Option<&dyn Any>,
    ) -> Box<dyn ViewController<V>>;

    /// Display name for a view id, if known.
    fn view_name_of(&self, view_id: V) -> Option<String>;

    /// Name of the group `view_id` routes to, if known. The manager resolves
    /// every id-based request through this before touching any group.
    fn group_name_of(&self, view_id: V) -> Option<String>;
}

/// Materializes the visual layer behind a group.
pub trait GroupLayerFactory {
    /// Create the z-ordered layer for a newly added group. Invoked exactly
    /// once per group, when [`ViewManager::add_group`] actually creates one.
    ///
    /// [`ViewManager::add_group`]: crate::manager::ViewManager::add_group
    fn create_group_layer(&mut self, name: &str, depth: i32);
}

/// Asset package lifecycle collaborator.
///
/// Held by the manager on behalf of controllers that manage package-backed
/// content; the open/close control flow itself never calls it.
pub trait ResourceManager {
    fn load_package(&mut self, package: &str);

    fn unload_package(&mut self, package: &str);
}
