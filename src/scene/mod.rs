//! Host scene access
//!
//! Nodes are `bevy_ecs` entities carrying a [`Transform`]; the rig's camera
//! additionally carries an [`OrthographicCamera`].

mod camera;
mod graph;
mod transform;

pub use camera::*;
pub use graph::*;
pub use transform::*;
