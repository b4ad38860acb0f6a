//! Gizmo control shapes for manipulating the selected shape.
//!
//! A selection materializes six auxiliary shapes: four corner knobs, one
//! rotate knob, and a non-interactive bounding outline. The knobs carry a
//! [`GizmoRef`] back to the controlled shape; dragging one translates into
//! a mutation of that shape. The set is a singleton: identities are fixed,
//! so building a set for a new selection overwrites the previous one in
//! place.

use crate::shapes::{
    GizmoControlPoint, GizmoRef, InteractionType, Padding, SerializableColor, Shape, ShapeId,
    ShapeStyle,
};
use crate::store::ShapeStore;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use thiserror::Error;
use uuid::Uuid;

/// Fixed identities for the singleton gizmo set.
pub const GIZMO_TOP_LEFT: ShapeId = Uuid::from_u128(1);
pub const GIZMO_TOP_RIGHT: ShapeId = Uuid::from_u128(2);
pub const GIZMO_BOTTOM_LEFT: ShapeId = Uuid::from_u128(3);
pub const GIZMO_BOTTOM_RIGHT: ShapeId = Uuid::from_u128(4);
pub const GIZMO_ROTATE: ShapeId = Uuid::from_u128(5);
pub const GIZMO_BOUNDING_BOX: ShapeId = Uuid::from_u128(6);

const GIZMO_IDS: [ShapeId; 6] = [
    GIZMO_TOP_LEFT,
    GIZMO_TOP_RIGHT,
    GIZMO_BOTTOM_LEFT,
    GIZMO_BOTTOM_RIGHT,
    GIZMO_ROTATE,
    GIZMO_BOUNDING_BOX,
];

/// Knob side length in world units.
pub const GIZMO_KNOB_SIZE: f64 = 16.0;

/// Vertical gap between the shape and the rotate knob.
const GIZMO_ROTATE_OFFSET: f64 = 20.0;

fn gizmo_style() -> ShapeStyle {
    ShapeStyle {
        fill_color: Some(SerializableColor::new(0, 200, 255, 26)),
        stroke_color: Some(SerializableColor::new(0, 200, 255, 255)),
        stroke_width: Some(2.0),
        border_radius: Some([2.0; 4]),
        padding: None,
    }
}

/// Failures of the gizmo-to-shape mutation path. All of them are
/// recoverable: callers log the error and leave prior state intact.
#[derive(Debug, Error)]
pub enum GizmoError {
    #[error("gizmo shape {0} not found in store")]
    GizmoMissing(ShapeId),
    #[error("shape {0} is not a gizmo handle")]
    NotAGizmo(ShapeId),
    #[error("control shape {0} not found in store")]
    ControlShapeMissing(ShapeId),
}

fn knob(
    store: &mut ShapeStore,
    id: ShapeId,
    x: f64,
    y: f64,
    control_point: GizmoControlPoint,
    control_shape_id: ShapeId,
) -> Shape {
    let mut shape = store.add_shape(
        ToolKind::ShapeBox,
        x,
        y,
        GIZMO_KNOB_SIZE,
        GIZMO_KNOB_SIZE,
        1.0,
        Vec2::ZERO,
        true,
    );
    shape.id = id;
    shape.gizmo = Some(GizmoRef {
        control_point,
        control_shape_id,
    });
    shape.style = Some(gizmo_style());
    shape
}

/// Build (or rebuild) the gizmo set around the shape with `shape_id`.
///
/// The shape is re-fetched from the store; a stale id is logged and the
/// operation is a no-op. The `zoom` parameter is accepted for signature
/// parity with the rest of the gizmo surface and is not used: knobs have a
/// fixed world-space size.
pub fn set_gizmo(store: &mut ShapeStore, shape_id: ShapeId, _zoom: f64) {
    let Some(shape) = store.shape(shape_id) else {
        log::error!("set_gizmo: shape {shape_id} not in store");
        return;
    };
    let bbox = shape.bounding_box;

    let top_left = knob(
        store,
        GIZMO_TOP_LEFT,
        bbox.x - GIZMO_KNOB_SIZE,
        bbox.y - GIZMO_KNOB_SIZE,
        GizmoControlPoint::TopLeft,
        shape_id,
    );
    let top_right = knob(
        store,
        GIZMO_TOP_RIGHT,
        bbox.x + bbox.width,
        bbox.y - GIZMO_KNOB_SIZE,
        GizmoControlPoint::TopRight,
        shape_id,
    );
    let bottom_left = knob(
        store,
        GIZMO_BOTTOM_LEFT,
        bbox.x - GIZMO_KNOB_SIZE,
        bbox.y + bbox.height,
        GizmoControlPoint::BottomLeft,
        shape_id,
    );
    let bottom_right = knob(
        store,
        GIZMO_BOTTOM_RIGHT,
        bbox.x + bbox.width,
        bbox.y + bbox.height,
        GizmoControlPoint::BottomRight,
        shape_id,
    );
    let rotate = knob(
        store,
        GIZMO_ROTATE,
        bbox.x + bbox.width / 2.0 - GIZMO_KNOB_SIZE / 2.0,
        bbox.y - GIZMO_ROTATE_OFFSET - GIZMO_KNOB_SIZE,
        GizmoControlPoint::Rotate,
        shape_id,
    );

    let mut bounding_outline = store.add_shape(
        ToolKind::ShapeBox,
        bbox.x,
        bbox.y,
        bbox.width,
        bbox.height,
        1.0,
        Vec2::ZERO,
        true,
    );
    bounding_outline.id = GIZMO_BOUNDING_BOX;
    bounding_outline.interaction = InteractionType::Static;
    bounding_outline.style = Some(ShapeStyle {
        padding: Some(Padding::All(2.0)),
        ..gizmo_style()
    });

    store.set_shape(GIZMO_TOP_LEFT, top_left);
    store.set_shape(GIZMO_TOP_RIGHT, top_right);
    store.set_shape(GIZMO_BOTTOM_LEFT, bottom_left);
    store.set_shape(GIZMO_BOTTOM_RIGHT, bottom_right);
    store.set_shape(GIZMO_ROTATE, rotate);
    store.set_shape(GIZMO_BOUNDING_BOX, bounding_outline);
}

/// Remove the whole gizmo set. Safe no-op for ids that are absent.
pub fn clear_gizmos(store: &mut ShapeStore) {
    for id in GIZMO_IDS {
        store.remove_shape(id);
    }
}

/// Translate a dragged knob's new position into a mutation of the shape it
/// controls, then rebuild the gizmo set from the new geometry so handles
/// keep tracking the shape during the drag.
///
/// The per-handle policies below reproduce the editor's historical resize
/// behavior exactly, asymmetries included: the right-side and bottom-side
/// handles recompute their extent from the knob offset alone instead of
/// accumulating it, and leave the anchored axis untouched.
pub fn update_control_shape(
    store: &mut ShapeStore,
    gizmo_id: ShapeId,
    zoom: f64,
) -> Result<(), GizmoError> {
    let Some(gizmo_shape) = store.shape(gizmo_id) else {
        return Err(GizmoError::GizmoMissing(gizmo_id));
    };
    let Some(gizmo_ref) = gizmo_shape.gizmo else {
        return Err(GizmoError::NotAGizmo(gizmo_id));
    };
    let gizmo_box = gizmo_shape.bounding_box;

    let control_id = gizmo_ref.control_shape_id;
    let Some(control_shape) = store.shape(control_id) else {
        return Err(GizmoError::ControlShapeMissing(control_id));
    };
    let mut updated = control_shape.clone();
    let bb = control_shape.bounding_box;

    // Knob center, and its signed offset from the controlled shape's
    // top-left corner; every handle policy reads this one offset.
    let gizmo_pos = Point::new(
        gizmo_box.x + GIZMO_KNOB_SIZE / 2.0,
        gizmo_box.y + GIZMO_KNOB_SIZE / 2.0,
    );
    let diff = Vec2::new(bb.x - gizmo_pos.x, bb.y - gizmo_pos.y);

    match gizmo_ref.control_point {
        GizmoControlPoint::TopLeft => {
            updated.bounding_box.x = gizmo_pos.x;
            updated.bounding_box.y = gizmo_pos.y;
            updated.bounding_box.width = bb.width + diff.x;
            updated.bounding_box.height = bb.height + diff.y;
        }
        GizmoControlPoint::TopRight => {
            updated.bounding_box.y = gizmo_pos.y;
            updated.bounding_box.width = bb.width - (bb.width + diff.x);
            updated.bounding_box.height = bb.height + diff.y;
        }
        GizmoControlPoint::BottomLeft => {
            updated.bounding_box.x = gizmo_pos.x;
            updated.bounding_box.width = bb.width + diff.x;
            updated.bounding_box.height = bb.height - (bb.height + diff.y);
        }
        GizmoControlPoint::BottomRight => {
            updated.bounding_box.width = bb.width - (bb.width + diff.x);
            updated.bounding_box.height = bb.height - (bb.height + diff.y);
        }
        GizmoControlPoint::Rotate => {
            let angle = diff.y.atan2(diff.x);
            log::debug!("rotate handle angle: {angle}");
            updated.rotation_rad = angle;
        }
    }

    store.set_shape(control_id, updated);
    set_gizmo(store, control_id, zoom);

    Ok(())
}
