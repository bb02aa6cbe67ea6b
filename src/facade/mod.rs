//! Facade bay model
//!
//! Computes the minimum width each face of a footprint needs, from the bays,
//! bay links, bay groups and windows configured on it, and provides the
//! editing commands that keep that model consistent.

pub mod edits;
pub mod groups;
pub mod links;
pub mod locks;
pub mod resolver;
pub mod window;

pub use edits::FacadeKey;
pub use groups::{create_group, remove_group, revalidate_groups, set_group_repeat};
pub use links::{ensure_editable, resolve_link_root, set_link};
pub use locks::{resolve_master_face, set_face_lock};
pub use resolver::{resolve_face_minimum_width, FaceMinimums, FacadeResolver};
pub use window::{enforce_bay_size, on_definition_width_changed, required_bay_width};
