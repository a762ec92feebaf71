//! View lifecycle and grouping for panel-based UIs.
//!
//! A [`ViewManager`] owns named [`ViewGroup`]s, each a z-order bucket of
//! [`ViewController`]s, and drives their open/show/close transitions plus
//! per-frame updates from the host's frame loop. Widget construction, layer
//! creation, and asset packages stay on the host's side of the
//! [`factory`] traits; the core tracks only the bookkeeping and fires
//! synchronous opened/closed notifications.
//!
//! The model is single-threaded and frame-driven: one driver calls
//! [`ViewManager::update`] once per frame, and every mutation happens on
//! that same thread. Malformed requests (unknown groups, duplicate ids,
//! empty names) are contract violations surfaced as [`ViewError`] and never
//! silently recovered.

pub mod controller;
pub mod error;
pub mod events;
pub mod factory;
pub mod group;
pub mod manager;
pub mod tracing_sub;

pub use controller::ViewController;
pub use error::ViewError;
pub use events::{ListenerId, ViewClosed, ViewOpened};
pub use factory::{GroupLayerFactory, ResourceManager, ViewFactory};
pub use group::ViewGroup;
pub use manager::ViewManager;
