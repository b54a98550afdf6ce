//! Selection, lock, and pointer-gesture state machine.
//!
//! Consumes the input-event stream the rendering surface produces and
//! mutates only the canvas's selection/lock sets and dragged positions.
//! Gestures resolve on pointer-up: a press that never travels past the
//! click tolerance is a click (select), anything further is a drag (move a
//! node, sweep a selection box, or pan the view). No network or
//! persistence side effects happen here.

use super::state::CanvasState;
use super::types::Position;

/// World-space radius within which a pointer hits a node.
pub const HIT_RADIUS: f64 = 24.0;
/// Screen-space travel below which a press-release counts as a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// Modifier keys held during a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	/// Ctrl/cmd: toggle-add selection on nodes, pan on empty canvas.
	pub toggle: bool,
}

/// Global keyboard shortcuts, scoped to when the canvas has input focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
	/// Select every node.
	SelectAll,
	/// Escape: clear the selection.
	ClearSelection,
	/// Ctrl/cmd+L: toggle the lock of every selected node.
	ToggleLockSelected,
}

/// One event from the rendering surface. Pointer coordinates are screen
/// pixels; the view transform maps them into world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceEvent {
	/// Primary button pressed.
	PointerDown {
		/// Screen x.
		x: f64,
		/// Screen y.
		y: f64,
		/// Modifier keys held.
		modifiers: Modifiers,
	},
	/// Pointer moved with the button down or up.
	PointerMove {
		/// Screen x.
		x: f64,
		/// Screen y.
		y: f64,
	},
	/// Primary button released.
	PointerUp {
		/// Screen x.
		x: f64,
		/// Screen y.
		y: f64,
	},
	/// Wheel rotated over the canvas.
	Wheel {
		/// Screen x of the pointer.
		x: f64,
		/// Screen y of the pointer.
		y: f64,
		/// Positive delta zooms out.
		delta: f64,
	},
	/// Keyboard shortcut.
	Key(KeyCommand),
	/// The physics capability reports movement has settled.
	Stabilized,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Map a screen point into world coordinates.
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> Position {
		Position::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom about a screen point: the world point under the pointer stays
	/// put.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, delta: f64) {
		let factor = if delta > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// What a handled event did, for the engine to mirror into the physics
/// adapter or surface.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEffect {
	/// Nothing the engine needs to react to.
	None,
	/// A node is being dragged; its canvas position was just updated.
	DragMoved {
		/// Dragged node id.
		id: String,
		/// New world position.
		position: Position,
	},
	/// A node drag finished at this position.
	DragEnded {
		/// Dragged node id.
		id: String,
		/// Final world position.
		position: Position,
	},
	/// The selection set changed.
	SelectionChanged,
	/// These nodes had their lock flag flipped.
	LocksToggled(Vec<String>),
}

/// In-progress pointer gesture.
#[derive(Clone, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	DragNode {
		id: String,
		start_sx: f64,
		start_sy: f64,
		node_start: Position,
		toggle: bool,
		moved: bool,
	},
	BoxSelect {
		start_sx: f64,
		start_sy: f64,
		anchor: Position,
		current: Position,
	},
	Pan {
		start_sx: f64,
		start_sy: f64,
		transform_start_x: f64,
		transform_start_y: f64,
	},
}

/// Pointer/keyboard interaction state: view transform plus the current
/// gesture.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	/// Current pan/zoom.
	pub transform: ViewTransform,
	gesture: Gesture,
}

/// Find the node whose center is nearest a world point within
/// [`HIT_RADIUS`]. Ties break toward the smaller id.
pub fn node_at(state: &CanvasState, point: Position) -> Option<String> {
	let mut best: Option<(f64, &str)> = None;
	for node in state.nodes() {
		let (dx, dy) = (node.position.x - point.x, node.position.y - point.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist >= HIT_RADIUS {
			continue;
		}
		let closer = match best {
			None => true,
			Some((d, id)) => dist < d || (dist == d && node.id.as_str() < id),
		};
		if closer {
			best = Some((dist, node.id.as_str()));
		}
	}
	best.map(|(_, id)| id.to_string())
}

impl InteractionState {
	/// Drive the state machine with one surface event.
	///
	/// When the canvas is locked every drag/pan/zoom/selection interaction
	/// is disabled and events fall through with no effect.
	pub fn handle(&mut self, event: SurfaceEvent, state: &mut CanvasState) -> InteractionEffect {
		if state.canvas_locked() {
			return InteractionEffect::None;
		}
		match event {
			SurfaceEvent::PointerDown { x, y, modifiers } => {
				self.pointer_down(x, y, modifiers, state)
			}
			SurfaceEvent::PointerMove { x, y } => self.pointer_move(x, y, state),
			SurfaceEvent::PointerUp { x, y } => self.pointer_up(x, y, state),
			SurfaceEvent::Wheel { x, y, delta } => {
				self.transform.zoom_about(x, y, delta);
				InteractionEffect::None
			}
			SurfaceEvent::Key(command) => Self::key(command, state),
			SurfaceEvent::Stabilized => InteractionEffect::None,
		}
	}

	fn pointer_down(
		&mut self,
		sx: f64,
		sy: f64,
		modifiers: Modifiers,
		state: &CanvasState,
	) -> InteractionEffect {
		let point = self.transform.screen_to_world(sx, sy);
		self.gesture = match node_at(state, point) {
			Some(id) => {
				let node_start = state.node(&id).map(|n| n.position).unwrap_or_default();
				Gesture::DragNode {
					id,
					start_sx: sx,
					start_sy: sy,
					node_start,
					toggle: modifiers.toggle,
					moved: false,
				}
			}
			None if modifiers.toggle => Gesture::Pan {
				start_sx: sx,
				start_sy: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			},
			None => Gesture::BoxSelect {
				start_sx: sx,
				start_sy: sy,
				anchor: point,
				current: point,
			},
		};
		InteractionEffect::None
	}

	fn pointer_move(&mut self, sx: f64, sy: f64, state: &mut CanvasState) -> InteractionEffect {
		match &mut self.gesture {
			Gesture::DragNode {
				id,
				start_sx,
				start_sy,
				node_start,
				moved,
				..
			} => {
				let (dx, dy) = (sx - *start_sx, sy - *start_sy);
				if !*moved && (dx * dx + dy * dy).sqrt() <= CLICK_TOLERANCE {
					return InteractionEffect::None;
				}
				*moved = true;
				let position = Position::new(
					node_start.x + dx / self.transform.k,
					node_start.y + dy / self.transform.k,
				);
				let id = id.clone();
				state.apply_drag(&id, position);
				InteractionEffect::DragMoved { id, position }
			}
			Gesture::BoxSelect { current, .. } => {
				*current = self.transform.screen_to_world(sx, sy);
				InteractionEffect::None
			}
			Gesture::Pan {
				start_sx,
				start_sy,
				transform_start_x,
				transform_start_y,
			} => {
				self.transform.x = *transform_start_x + (sx - *start_sx);
				self.transform.y = *transform_start_y + (sy - *start_sy);
				InteractionEffect::None
			}
			Gesture::Idle => InteractionEffect::None,
		}
	}

	fn pointer_up(&mut self, sx: f64, sy: f64, state: &mut CanvasState) -> InteractionEffect {
		match std::mem::take(&mut self.gesture) {
			Gesture::DragNode {
				id, toggle, moved, ..
			} => {
				if moved {
					let position = state.node(&id).map(|n| n.position).unwrap_or_default();
					InteractionEffect::DragEnded { id, position }
				} else {
					if toggle {
						state.toggle_selected(&id);
					} else {
						state.select_only(&id);
					}
					InteractionEffect::SelectionChanged
				}
			}
			Gesture::BoxSelect {
				start_sx,
				start_sy,
				anchor,
				current,
			} => {
				let (dx, dy) = (sx - start_sx, sy - start_sy);
				if (dx * dx + dy * dy).sqrt() <= CLICK_TOLERANCE {
					// A click on empty canvas clears the selection.
					state.clear_selection();
				} else {
					state.select_in_rect(anchor, current);
				}
				InteractionEffect::SelectionChanged
			}
			Gesture::Pan { .. } | Gesture::Idle => InteractionEffect::None,
		}
	}

	fn key(command: KeyCommand, state: &mut CanvasState) -> InteractionEffect {
		match command {
			KeyCommand::SelectAll => {
				state.select_all();
				InteractionEffect::SelectionChanged
			}
			KeyCommand::ClearSelection => {
				state.clear_selection();
				InteractionEffect::SelectionChanged
			}
			KeyCommand::ToggleLockSelected => {
				let mut ids: Vec<String> = state.selection().iter().cloned().collect();
				ids.sort();
				for id in &ids {
					state.toggle_lock(id);
				}
				InteractionEffect::LocksToggled(ids)
			}
		}
	}
}
