//! Frame consumers of the registry
//!
//! Each system opens views once per frame and reads or writes component data
//! through the registry. None of them keep references across frames.

pub mod hierarchy;
pub mod render_collector;
pub mod picking;

pub use hierarchy::{
    attach, detach, destroy_recursive, outline, propagate_transforms, set_world_position, OutlineRow,
};
pub use render_collector::{CollectorStats, DrawCommand, DrawList, PickInstance, RenderCollector};
pub use picking::{EntityPicker, GizmoAxis, PickResult, Selection};
