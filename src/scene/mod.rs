//! Scene module orchestrator.
//!
//! The scene is the minimal visual hierarchy the layers manipulate: screens
//! are parented under layer containers, popups under the overlay, and the
//! darken background is toggled and raised. Rendering is not modelled.

mod core;

pub use core::{NodeId, SceneNode, SceneTree, SharedScene, read_scene, shared_scene, write_scene};
