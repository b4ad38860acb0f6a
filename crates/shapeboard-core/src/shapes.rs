//! Shape definitions for the canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Next value of the process-wide mutation tick.
///
/// The tick only conveys freshness (last write wins); it carries no meaning
/// beyond being strictly increasing within the process.
pub(crate) fn next_tick() -> u64 {
    static TICK: AtomicU64 = AtomicU64::new(1);
    TICK.fetch_add(1, Ordering::Relaxed)
}

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// Axis-aligned bounding box in world-space units.
///
/// `width` and `height` may legitimately go negative while a resize drag
/// crosses over itself; a negative extent means the box is mirrored, not
/// that it is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Signed area (`width * height`).
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Inclusive point containment. A mirrored box (negative extent)
    /// contains nothing.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Padding applied around a bounding box when drawing.
///
/// Purely cosmetic; hit-testing always uses the unpadded box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Padding {
    /// Same padding on every side.
    All(f64),
    /// Symmetric horizontal/vertical padding.
    Axes { horizontal: f64, vertical: f64 },
    /// Individual padding per side.
    Sides {
        top: f64,
        right: f64,
        bottom: f64,
        left: f64,
    },
}

/// Style properties for shapes. Every field is optional; renderers supply
/// their own defaults for missing values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (None = renderer default).
    pub fill_color: Option<SerializableColor>,
    /// Stroke color.
    pub stroke_color: Option<SerializableColor>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Corner radii, clockwise from top-left.
    pub border_radius: Option<[f64; 4]>,
    /// Draw-time padding around the bounding box.
    pub padding: Option<Padding>,
}

/// How a shape participates in hit-testing and dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionType {
    /// Hit-testable and draggable.
    #[default]
    Selectable,
    /// Visible but ignored by hit-testing (e.g. the gizmo outline).
    Static,
    /// Present but not interactable.
    Locked,
}

/// Draw data for circle shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleDrawData {
    pub r: f64,
}

/// Draw data for line shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineDrawData {
    pub x2: f64,
    pub y2: f64,
}

/// Shape kind with its per-kind draw data.
///
/// Only `Box` is fully implemented; `Circle` and `Line` carry their payloads
/// but are not yet drawable or hit-testable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Circle(CircleDrawData),
    Line(LineDrawData),
}

/// Which control point of the gizmo set a handle represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GizmoControlPoint {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Rotate,
}

/// Link from a gizmo handle back to the shape it manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GizmoRef {
    pub control_point: GizmoControlPoint,
    pub control_shape_id: ShapeId,
}

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier, stable for the shape's lifetime.
    pub id: ShapeId,
    /// Kind tag plus per-kind draw data.
    pub kind: ShapeKind,
    /// Geometry in world-space units.
    pub bounding_box: BoundingBox,
    /// Rotation around the shape in radians.
    #[serde(default)]
    pub rotation_rad: f64,
    /// Hit-testing/dragging class.
    pub interaction: InteractionType,
    /// Optional cosmetic style.
    #[serde(default)]
    pub style: Option<ShapeStyle>,
    /// Present only on synthetic gizmo handles.
    #[serde(default)]
    pub gizmo: Option<GizmoRef>,
    /// Monotonic mutation tick, refreshed on every mutation.
    pub updated_at: u64,
}

impl Shape {
    /// Create a selectable shape with a fresh id and no style.
    pub fn new(kind: ShapeKind, bounding_box: BoundingBox) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            bounding_box,
            rotation_rad: 0.0,
            interaction: InteractionType::Selectable,
            style: None,
            gizmo: None,
            updated_at: next_tick(),
        }
    }

    /// Whether this shape is a synthetic gizmo handle.
    pub fn is_gizmo(&self) -> bool {
        self.gizmo.is_some()
    }

    /// Signed area of the bounding box.
    pub fn area(&self) -> f64 {
        self.bounding_box.area()
    }

    /// Check whether a point (in world coordinates) hits this shape.
    /// Unimplemented kinds log and never match.
    pub fn hit_test(&self, point: Point) -> bool {
        match self.kind {
            ShapeKind::Box => self.bounding_box.contains(point),
            ShapeKind::Circle(_) => {
                log::error!("circle hit-testing not implemented");
                false
            }
            ShapeKind::Line(_) => {
                log::error!("line hit-testing not implemented");
                false
            }
        }
    }

    /// Refresh the mutation tick.
    pub(crate) fn touch(&mut self) {
        self.updated_at = next_tick();
    }
}
