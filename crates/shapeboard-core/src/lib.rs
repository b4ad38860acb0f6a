//! Shapeboard Core Library
//!
//! Shape state and interaction engine for the Shapeboard canvas editor:
//! the authoritative shape store with bounded snapshot undo, screen/world
//! coordinate transforms, the gizmo handle system, and the pointer/keyboard
//! interaction state machine. Rendering, toolbar UI, and raw event
//! plumbing live in the host.

pub mod camera;
pub mod controller;
pub mod gizmo;
pub mod math;
pub mod render;
pub mod shapes;
pub mod store;
pub mod tools;

pub use camera::{Camera, ZOOM_FACTOR};
pub use controller::{Editor, Effects, InputEvent, Modifiers, MouseButton};
pub use gizmo::{GIZMO_KNOB_SIZE, GizmoError, clear_gizmos, set_gizmo, update_control_shape};
pub use math::{padded_bounds, snap_to_grid};
pub use render::RenderSink;
pub use shapes::{
    BoundingBox, CircleDrawData, GizmoControlPoint, GizmoRef, InteractionType, LineDrawData,
    Padding, SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle,
};
pub use store::ShapeStore;
pub use tools::ToolKind;
