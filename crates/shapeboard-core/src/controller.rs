//! Pointer/keyboard interaction state machine.
//!
//! Raw input plumbing constructs [`InputEvent`] values; [`Editor`] turns
//! them into store, gizmo, and camera operations. Every handler returns
//! [`Effects`] describing what the host should repaint, which keeps the
//! transition function deterministic and unit-testable without a live
//! event loop.

use crate::camera::Camera;
use crate::gizmo;
use crate::render::RenderSink;
use crate::shapes::Shape;
use crate::store::ShapeStore;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    NotPressed,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Normalized input event, in client coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown {
        position: Point,
        button: MouseButton,
    },
    PointerMove {
        position: Point,
        button: MouseButton,
    },
    PointerUp {
        position: Point,
        button: MouseButton,
    },
    PointerOut,
    Wheel {
        position: Point,
        delta_y: f64,
    },
    KeyDown {
        key: String,
        modifiers: Modifiers,
    },
}

/// What the host should do after a handled event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    /// Whether a repaint is requested.
    pub redraw: bool,
    /// Ephemeral preview shapes appended to the committed set for exactly
    /// one frame.
    pub previews: Vec<Shape>,
}

impl Effects {
    fn none() -> Self {
        Self::default()
    }

    fn request_redraw() -> Self {
        Self {
            redraw: true,
            previews: Vec::new(),
        }
    }

    fn request_redraw_with(previews: Vec<Shape>) -> Self {
        Self {
            redraw: true,
            previews,
        }
    }
}

/// The editor: shape store, camera, tool and selection state, and the
/// event transition function tying them together.
#[derive(Debug)]
pub struct Editor {
    /// The authoritative shape store.
    pub store: ShapeStore,
    /// View transform.
    pub camera: Camera,
    /// Currently selected tool; the toolbar writes this.
    pub tool: ToolKind,
    /// Selection snapshot taken at pointer-down. Deliberately not a live
    /// view: its bounding box is the drag anchor, while gizmo operations
    /// re-fetch the current shape by id.
    selected: Option<Shape>,
    /// Set while a pointer button gesture (pan, draw, or drag) is active.
    panning: bool,
    /// Press origin with the camera offset already subtracted.
    press_origin: Point,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Create an editor with an empty store and default camera.
    pub fn new() -> Self {
        Self {
            store: ShapeStore::new(),
            camera: Camera::new(),
            tool: ToolKind::default(),
            selected: None,
            panning: false,
            press_origin: Point::ZERO,
        }
    }

    /// The current selection snapshot, if any.
    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selected.as_ref()
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Advance the editor by one input event.
    pub fn handle_event(&mut self, event: InputEvent) -> Effects {
        match event {
            InputEvent::PointerDown { position, .. } => self.on_pointer_down(position),
            InputEvent::PointerMove { position, button } => self.on_pointer_move(position, button),
            InputEvent::PointerUp { position, button } => self.on_pointer_up(position, button),
            InputEvent::PointerOut => {
                self.panning = false;
                Effects::none()
            }
            InputEvent::Wheel { position, delta_y } => {
                self.camera.apply_wheel(position, delta_y);
                Effects::request_redraw()
            }
            InputEvent::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
        }
    }

    /// Handle an event and forward the resulting frame to a render sink.
    pub fn dispatch(&mut self, event: InputEvent, sink: &mut dyn RenderSink) {
        let effects = self.handle_event(event);
        if effects.redraw {
            sink.render(&self.store.shapes(), &effects.previews, &self.camera);
        }
    }

    fn on_pointer_down(&mut self, position: Point) -> Effects {
        self.panning = true;
        self.press_origin = self.camera.to_canvas(position);

        if self.tool != ToolKind::Select {
            // Drawing tools only record the press origin here.
            return Effects::none();
        }

        let hit = self
            .store
            .shape_from_selection(self.press_origin, self.camera.zoom)
            .cloned();

        let Some(shape) = hit else {
            self.selected = None;
            gizmo::clear_gizmos(&mut self.store);
            return Effects::none();
        };

        let id = shape.id;
        let is_gizmo = shape.is_gizmo();
        self.selected = Some(shape);

        if !is_gizmo {
            gizmo::set_gizmo(&mut self.store, id, self.camera.zoom);
        }

        Effects::request_redraw()
    }

    fn on_pointer_move(&mut self, position: Point, button: MouseButton) -> Effects {
        if !self.panning {
            return Effects::none();
        }

        let canvas_pos = self.camera.to_canvas(position);
        let drag = Vec2::new(
            canvas_pos.x - self.press_origin.x,
            canvas_pos.y - self.press_origin.y,
        );

        // Live preview while drawing with the left button.
        if button == MouseButton::Left && self.tool != ToolKind::Select {
            let preview = self.store.add_shape(
                self.tool,
                self.press_origin.x,
                self.press_origin.y,
                drag.x,
                drag.y,
                self.camera.zoom,
                self.camera.offset,
                true,
            );
            return Effects::request_redraw_with(vec![preview]);
        }

        // Drag the selection with the left button.
        if button == MouseButton::Left {
            let Some(selected) = self.selected.clone() else {
                return Effects::none();
            };

            self.store
                .update_shape_position(selected.id, selected.bounding_box.origin(), drag);

            if selected.is_gizmo() {
                if let Err(err) = gizmo::update_control_shape(&mut self.store, selected.id, self.camera.zoom)
                {
                    log::error!("gizmo update failed: {err}");
                }
            } else {
                // A plain shape moved; the gizmo set follows it.
                gizmo::set_gizmo(&mut self.store, selected.id, self.camera.zoom);
            }

            return Effects::request_redraw();
        }

        // Pan the canvas with the right button.
        if button == MouseButton::Right {
            self.camera.offset = Vec2::new(
                position.x - self.press_origin.x,
                position.y - self.press_origin.y,
            );
            return Effects::request_redraw();
        }

        Effects::none()
    }

    fn on_pointer_up(&mut self, position: Point, button: MouseButton) -> Effects {
        self.panning = false;

        if self.tool == ToolKind::Select {
            // End of a select/move/resize gesture.
            self.store.save_history_state();
            return Effects::none();
        }

        if button == MouseButton::Left {
            let canvas_pos = self.camera.to_canvas(position);
            let drag = Vec2::new(
                canvas_pos.x - self.press_origin.x,
                canvas_pos.y - self.press_origin.y,
            );

            self.store.add_shape(
                self.tool,
                self.press_origin.x,
                self.press_origin.y,
                drag.x,
                drag.y,
                self.camera.zoom,
                self.camera.offset,
                false,
            );

            self.tool = ToolKind::Select;
            self.store.save_history_state();
            return Effects::request_redraw();
        }

        Effects::none()
    }

    fn on_key_down(&mut self, key: &str, modifiers: Modifiers) -> Effects {
        if key.eq_ignore_ascii_case("z") && (modifiers.ctrl || modifiers.meta) {
            self.store.undo();
            return Effects::request_redraw();
        }

        if key == "Backspace" || key == "Delete" {
            if let Some(selected) = self.selected.take() {
                self.store.remove_shape(selected.id);
                gizmo::clear_gizmos(&mut self.store);
                return Effects::request_redraw();
            }
        }

        Effects::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmo::{GIZMO_BOTTOM_RIGHT, GIZMO_TOP_LEFT};
    use crate::shapes::BoundingBox;

    fn down(position: Point) -> InputEvent {
        InputEvent::PointerDown {
            position,
            button: MouseButton::Left,
        }
    }

    fn moved(position: Point, button: MouseButton) -> InputEvent {
        InputEvent::PointerMove { position, button }
    }

    fn up(position: Point) -> InputEvent {
        InputEvent::PointerUp {
            position,
            button: MouseButton::Left,
        }
    }

    fn key(key: &str, modifiers: Modifiers) -> InputEvent {
        InputEvent::KeyDown {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Editor with one committed 200x100 box at (100, 100), select tool.
    fn editor_with_shape() -> Editor {
        let mut editor = Editor::new();
        editor.handle_event(down(Point::new(100.0, 100.0)));
        editor.handle_event(moved(Point::new(300.0, 200.0), MouseButton::Left));
        editor.handle_event(up(Point::new(300.0, 200.0)));
        editor
    }

    #[test]
    fn test_draw_gesture_previews_then_commits() {
        let mut editor = Editor::new();
        assert_eq!(editor.tool, ToolKind::ShapeBox);

        editor.handle_event(down(Point::new(10.0, 10.0)));
        let effects = editor.handle_event(moved(Point::new(60.0, 70.0), MouseButton::Left));

        // The preview is returned but never enters the store.
        assert!(effects.redraw);
        assert_eq!(effects.previews.len(), 1);
        assert_eq!(
            effects.previews[0].bounding_box,
            BoundingBox::new(10.0, 10.0, 50.0, 60.0)
        );
        assert!(editor.store.is_empty());

        let effects = editor.handle_event(up(Point::new(60.0, 70.0)));
        assert!(effects.redraw);
        assert_eq!(editor.store.len(), 1);
        assert_eq!(
            editor.store.shapes()[0].bounding_box,
            BoundingBox::new(10.0, 10.0, 50.0, 60.0)
        );
        // The tool snaps back to select after committing.
        assert_eq!(editor.tool, ToolKind::Select);
    }

    #[test]
    fn test_select_hit_builds_gizmos() {
        let mut editor = editor_with_shape();

        let effects = editor.handle_event(down(Point::new(150.0, 150.0)));

        assert!(effects.redraw);
        assert!(editor.selected_shape().is_some());
        assert_eq!(editor.store.len(), 7);
    }

    #[test]
    fn test_select_miss_clears_selection_without_redraw() {
        let mut editor = editor_with_shape();
        editor.handle_event(down(Point::new(150.0, 150.0)));
        editor.handle_event(up(Point::new(150.0, 150.0)));

        let effects = editor.handle_event(down(Point::new(1000.0, 1000.0)));

        assert!(!effects.redraw);
        assert!(editor.selected_shape().is_none());
        assert_eq!(editor.store.len(), 1); // gizmos gone
    }

    #[test]
    fn test_drag_moves_selection_and_gizmos_follow() {
        let mut editor = editor_with_shape();
        let id = editor.store.shapes()[0].id;

        editor.handle_event(down(Point::new(150.0, 150.0)));
        editor.handle_event(moved(Point::new(155.0, 158.0), MouseButton::Left));

        let bbox = editor.store.shape(id).unwrap().bounding_box;
        assert_eq!(bbox, BoundingBox::new(105.0, 108.0, 200.0, 100.0));

        // The gizmo set was rebuilt around the moved shape.
        let top_left = editor.store.shape(GIZMO_TOP_LEFT).unwrap().bounding_box;
        assert!((top_left.x - (105.0 - 16.0)).abs() < f64::EPSILON);
        assert!((top_left.y - (108.0 - 16.0)).abs() < f64::EPSILON);

        // Deltas accumulate against the selection-time anchor.
        editor.handle_event(moved(Point::new(170.0, 170.0), MouseButton::Left));
        let bbox = editor.store.shape(id).unwrap().bounding_box;
        assert_eq!(bbox, BoundingBox::new(120.0, 120.0, 200.0, 100.0));
    }

    #[test]
    fn test_handle_drag_resizes_control_shape() {
        let mut editor = editor_with_shape();
        let id = editor.store.shapes()[0].id;

        // Select the shape, finish the gesture, then grab the
        // bottom-right knob (center at (308, 208)).
        editor.handle_event(down(Point::new(150.0, 150.0)));
        editor.handle_event(up(Point::new(150.0, 150.0)));
        editor.handle_event(down(Point::new(308.0, 208.0)));

        let selected = editor.selected_shape().unwrap();
        assert_eq!(selected.id, GIZMO_BOTTOM_RIGHT);

        editor.handle_event(moved(Point::new(358.0, 238.0), MouseButton::Left));

        let bbox = editor.store.shape(id).unwrap().bounding_box;
        assert_eq!(bbox, BoundingBox::new(100.0, 100.0, 258.0, 138.0));
    }

    #[test]
    fn test_right_drag_pans_camera() {
        let mut editor = editor_with_shape();

        editor.handle_event(down(Point::new(100.0, 100.0)));
        let effects = editor.handle_event(moved(Point::new(120.0, 130.0), MouseButton::Right));

        assert!(effects.redraw);
        assert_eq!(editor.camera.offset, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut editor = editor_with_shape();

        let effects = editor.handle_event(moved(Point::new(150.0, 150.0), MouseButton::Left));

        assert_eq!(effects, Effects::default());
        assert_eq!(editor.store.len(), 1);
    }

    #[test]
    fn test_pointer_out_cancels_gesture() {
        let mut editor = editor_with_shape();

        editor.handle_event(down(Point::new(150.0, 150.0)));
        assert!(editor.is_panning());
        editor.handle_event(InputEvent::PointerOut);
        assert!(!editor.is_panning());

        let effects = editor.handle_event(moved(Point::new(400.0, 400.0), MouseButton::Left));
        assert!(!effects.redraw);
    }

    #[test]
    fn test_wheel_zooms_about_cursor() {
        let mut editor = Editor::new();

        let effects = editor.handle_event(InputEvent::Wheel {
            position: Point::new(200.0, 150.0),
            delta_y: -1.0,
        });

        assert!(effects.redraw);
        assert!((editor.camera.zoom - crate::camera::ZOOM_FACTOR).abs() < f64::EPSILON);

        editor.handle_event(InputEvent::Wheel {
            position: Point::new(200.0, 150.0),
            delta_y: 1.0,
        });
        assert!((editor.camera.zoom - 1.0).abs() < 1e-9);
        assert!(editor.camera.offset.x.abs() < 1e-9);
    }

    #[test]
    fn test_undo_shortcut() {
        let mut editor = editor_with_shape();
        assert_eq!(editor.store.len(), 1);

        // First undo restores the snapshot saved on pointer-up (identical
        // to the current state); with history then exhausted and a single
        // shape left, the second undo clears the store.
        let ctrl_z = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.handle_event(key("z", ctrl_z));
        assert_eq!(editor.store.len(), 1);
        editor.handle_event(key("z", ctrl_z));
        assert!(editor.store.is_empty());
    }

    #[test]
    fn test_meta_z_also_undoes() {
        let mut editor = editor_with_shape();
        let cmd_z = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        editor.handle_event(key("Z", cmd_z));
        editor.handle_event(key("Z", cmd_z));
        assert!(editor.store.is_empty());
    }

    #[test]
    fn test_plain_z_does_nothing() {
        let mut editor = editor_with_shape();
        let effects = editor.handle_event(key("z", Modifiers::default()));
        assert!(!effects.redraw);
        assert_eq!(editor.store.len(), 1);
    }

    #[test]
    fn test_delete_removes_selection_and_gizmos() {
        let mut editor = editor_with_shape();
        editor.handle_event(down(Point::new(150.0, 150.0)));
        assert_eq!(editor.store.len(), 7);

        let effects = editor.handle_event(key("Backspace", Modifiers::default()));

        assert!(effects.redraw);
        assert!(editor.store.is_empty());
        assert!(editor.selected_shape().is_none());
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut editor = editor_with_shape();
        let effects = editor.handle_event(key("Delete", Modifiers::default()));
        assert!(!effects.redraw);
        assert_eq!(editor.store.len(), 1);
    }

    #[test]
    fn test_select_gesture_saves_history() {
        let mut editor = editor_with_shape();
        let id = editor.store.shapes()[0].id;

        // Move the shape and finish the gesture.
        editor.handle_event(down(Point::new(150.0, 150.0)));
        editor.handle_event(moved(Point::new(250.0, 150.0), MouseButton::Left));
        editor.handle_event(up(Point::new(250.0, 150.0)));

        let moved_x = editor.store.shape(id).unwrap().bounding_box.x;
        assert!((moved_x - 200.0).abs() < f64::EPSILON);

        // The pointer-up snapshot restores the moved position.
        let ctrl_z = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        editor.handle_event(key("z", ctrl_z));
        let restored = editor.store.shape(id).unwrap().bounding_box.x;
        assert!((restored - 200.0).abs() < f64::EPSILON);
    }

    struct RecordingSink {
        frames: Vec<(usize, usize)>,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, shapes: &[Shape], previews: &[Shape], _camera: &Camera) {
            self.frames.push((shapes.len(), previews.len()));
        }
    }

    #[test]
    fn test_dispatch_forwards_previews_to_sink() {
        let mut editor = Editor::new();
        let mut sink = RecordingSink { frames: Vec::new() };

        editor.dispatch(down(Point::new(10.0, 10.0)), &mut sink);
        editor.dispatch(moved(Point::new(60.0, 70.0), MouseButton::Left), &mut sink);
        editor.dispatch(up(Point::new(60.0, 70.0)), &mut sink);

        // Pointer-down requests no frame; the move renders the preview on
        // top of an empty store; the commit renders one persistent shape.
        assert_eq!(sink.frames, vec![(0, 1), (1, 0)]);
    }
}
