//! Authoritative shape store with bounded snapshot undo.

use crate::shapes::{BoundingBox, InteractionType, Shape, ShapeId, ShapeKind};
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use std::collections::HashMap;

/// Maximum number of undo snapshots to keep.
const MAX_HISTORY_LENGTH: usize = 15;

/// Owns the canonical id-to-shape mapping, in insertion order, plus the
/// bounded undo history.
///
/// Every mutation replaces the stored value rather than editing it in
/// place; consumers must re-fetch by id after any store-level change.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    /// All shapes, keyed by id.
    shapes: HashMap<ShapeId, Shape>,
    /// Insertion order of shape ids.
    order: Vec<ShapeId>,
    /// Undo history: full snapshots, oldest first.
    history: Vec<Vec<Shape>>,
    /// Whether a mutation happened since the last history save.
    history_dirty: bool,
}

impl ShapeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cloned snapshot of all shapes in insertion order. This is what
    /// hit-testing iterates and what render sinks consume.
    pub fn shapes(&self) -> Vec<Shape> {
        self.order
            .iter()
            .filter_map(|id| self.shapes.get(id))
            .cloned()
            .collect()
    }

    /// Get a shape by id.
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Number of shapes in the store.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Upsert a shape under `id`. An existing id keeps its order slot; a
    /// new id is appended. Refreshes the mutation tick and marks history
    /// dirty.
    pub fn set_shape(&mut self, id: ShapeId, mut shape: Shape) {
        shape.touch();
        if !self.shapes.contains_key(&id) {
            self.order.push(id);
        }
        self.shapes.insert(id, shape);
        self.history_dirty = true;
    }

    /// Construct a new shape from screen-space drag extents.
    ///
    /// All four extents are divided by `zoom` to obtain world-space units.
    /// `offset` is a translation, not a scale, so it plays no part in the
    /// conversion. When `temporary` is true the shape is returned without
    /// being inserted and history stays clean; drag previews use this.
    #[allow(clippy::too_many_arguments)]
    pub fn add_shape(
        &mut self,
        tool: ToolKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        zoom: f64,
        _offset: Vec2,
        temporary: bool,
    ) -> Shape {
        let shape = Shape::new(
            tool.draw_kind(),
            BoundingBox::new(x / zoom, y / zoom, width / zoom, height / zoom),
        );

        if !temporary {
            self.order.push(shape.id);
            self.shapes.insert(shape.id, shape.clone());
            self.history_dirty = true;
        }

        shape
    }

    /// Move a shape's top-left corner to `start_pos + offset`.
    ///
    /// The delta is applied in the units it arrives in; unlike `add_shape`
    /// there is no zoom division here.
    pub fn update_shape_position(&mut self, id: ShapeId, start_pos: Point, offset: Vec2) {
        let Some(shape) = self.shapes.get(&id) else {
            log::warn!("update_shape_position: shape {id} not in store");
            return;
        };

        let mut updated = shape.clone();
        updated.bounding_box.x = start_pos.x + offset.x;
        updated.bounding_box.y = start_pos.y + offset.y;
        updated.touch();

        self.shapes.insert(id, updated);
        self.history_dirty = true;
    }

    /// Remove a shape. Safe no-op for absent ids (history still goes
    /// dirty, matching the rest of the mutation surface).
    pub fn remove_shape(&mut self, id: ShapeId) {
        self.history_dirty = true;
        if self.shapes.remove(&id).is_some() {
            self.order.retain(|&shape_id| shape_id != id);
        }
    }

    /// Hit test at a canvas position (camera offset already subtracted by
    /// the caller; this divides by `zoom` to reach world space).
    ///
    /// Among all selectable shapes containing the point, the smallest area
    /// wins, so overlapping shapes favor the visually "on top" smaller one
    /// regardless of insertion order. First-inserted wins exact ties.
    pub fn shape_from_selection(&self, position: Point, zoom: f64) -> Option<&Shape> {
        let world = Point::new(position.x / zoom, position.y / zoom);
        let mut smallest: Option<&Shape> = None;

        for id in &self.order {
            let Some(shape) = self.shapes.get(id) else {
                continue;
            };
            if shape.interaction != InteractionType::Selectable {
                continue;
            }
            if !shape.hit_test(world) {
                continue;
            }

            let replace = match smallest {
                None => true,
                Some(current) => {
                    !matches!(current.kind, ShapeKind::Box) || current.area() > shape.area()
                }
            };
            if replace {
                smallest = Some(shape);
            }
        }

        smallest
    }

    /// Pop the most recent history snapshot and restore it wholesale.
    ///
    /// With no history left, a lone remaining shape is interpreted as the
    /// first-ever action and the store is cleared; anything else is a
    /// no-op.
    pub fn undo(&mut self) {
        if self.history.is_empty() {
            if self.shapes.len() == 1 {
                self.shapes.clear();
                self.order.clear();
            }
            return;
        }

        let Some(last_state) = self.history.pop() else {
            return;
        };
        if last_state.is_empty() {
            return;
        }

        self.shapes.clear();
        self.order.clear();
        for prev_shape in last_state {
            self.order.push(prev_shape.id);
            self.shapes.insert(prev_shape.id, prev_shape);
        }
    }

    /// Push a full snapshot of the current shapes onto the bounded history
    /// stack. Only fires when a mutation happened since the last save, and
    /// never pushes an empty snapshot. The oldest snapshot is evicted past
    /// capacity.
    pub fn save_history_state(&mut self) {
        if !self.history_dirty {
            return;
        }

        let current_state = self.shapes();
        if current_state.is_empty() {
            return;
        }

        if self.history.len() >= MAX_HISTORY_LENGTH {
            self.history.remove(0);
        }
        self.history.push(current_state);
        self.history_dirty = false;
    }

    /// Serialize the shape list to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.shapes())
    }

    /// Rebuild a store from a serialized shape list. The loaded document
    /// starts with clean history.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let shapes: Vec<Shape> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for shape in shapes {
            if !store.shapes.contains_key(&shape.id) {
                store.order.push(shape.id);
            }
            store.shapes.insert(shape.id, shape);
        }
        Ok(store)
    }
}
