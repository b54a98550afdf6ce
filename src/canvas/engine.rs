//! The topology canvas engine.
//!
//! [`TopologyCanvas`] wires the pieces together the way the host drives
//! them: snapshots arrive from the inventory collaborator and reconcile
//! into the state, surface events feed the interaction machine, the host's
//! frame loop calls [`TopologyCanvas::tick`], and a [`Scene`] goes back out
//! to the rendering surface. Everything runs to completion on the caller's
//! thread; the only timers are engine-owned countdowns advanced by `tick`.

use super::layout::{self, LayoutStrategy};
use super::physics::PhysicsAdapter;
use super::reconcile::reconcile;
use super::selection::{InteractionEffect, InteractionState, SurfaceEvent};
use super::state::{CanvasState, ExpandRequest};
use super::theme::{Color, Theme};
use super::types::{EdgeKind, GraphSnapshot, Position, RelationDirection};

/// Idle window before buffered depth-change requests flush.
pub const DEPTH_DEBOUNCE_SECONDS: f32 = 0.3;

/// A node ready for drawing: position plus style annotations.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
	/// Stable device id.
	pub id: String,
	/// Display name.
	pub label: String,
	/// World position.
	pub position: Position,
	/// Status fill color.
	pub fill: Color,
	/// Interaction outline, when selected or locked.
	pub outline: Option<Color>,
	/// Whether the node is selected.
	pub selected: bool,
	/// Whether the node is locked.
	pub locked: bool,
}

/// An edge ready for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEdge {
	/// Derived edge id.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship category.
	pub kind: EdgeKind,
	/// Stroke color.
	pub stroke: Color,
}

/// The node/edge list the engine writes to the rendering surface.
#[derive(Clone, Debug, Default)]
pub struct Scene {
	/// Nodes in ascending id order.
	pub nodes: Vec<SceneNode>,
	/// Edges in ascending id order.
	pub edges: Vec<SceneEdge>,
}

/// The external graph-rendering capability. The engine writes scenes to it
/// and receives [`SurfaceEvent`]s back; it never depends on the surface's
/// internals.
pub trait RenderSurface {
	/// Draw the scene.
	fn render(&mut self, scene: &Scene);
}

/// Engine facade owning the canvas state, the physics adapter, the
/// interaction machine, and the outbound request buffers.
pub struct TopologyCanvas {
	state: CanvasState,
	physics: PhysicsAdapter,
	input: InteractionState,
	strategy: LayoutStrategy,
	theme: Theme,
	/// Depth requests held until the debounce window closes.
	held: Vec<ExpandRequest>,
	debounce: Option<f32>,
	outbox: Vec<ExpandRequest>,
}

impl Default for TopologyCanvas {
	fn default() -> Self {
		Self::new()
	}
}

impl TopologyCanvas {
	/// Create an engine with an empty canvas.
	pub fn new() -> Self {
		Self {
			state: CanvasState::new(),
			physics: PhysicsAdapter::default(),
			input: InteractionState::default(),
			strategy: LayoutStrategy::default(),
			theme: Theme::default(),
			held: Vec::new(),
			debounce: None,
			outbox: Vec::new(),
		}
	}

	/// Read-only view of the canvas state.
	pub fn state(&self) -> &CanvasState {
		&self.state
	}

	/// Current interaction state (view transform included).
	pub fn input(&self) -> &InteractionState {
		&self.input
	}

	/// The active layout strategy.
	pub fn strategy(&self) -> LayoutStrategy {
		self.strategy
	}

	// ── Inbound: snapshots ────────────────────────────────────────────────

	/// Fold a freshly fetched snapshot into the canvas. Live simulation
	/// positions are synced first so surviving nodes do not snap back to a
	/// stale coordinate; a running simulation is reseeded afterwards so
	/// new nodes join it.
	pub fn apply_snapshot(&mut self, snapshot: &GraphSnapshot) {
		let resume = self.physics.is_running();
		self.physics.sync_into(&mut self.state);
		reconcile(&mut self.state, snapshot);
		if resume {
			self.physics.start(&self.state);
		}
	}

	// ── Layout ────────────────────────────────────────────────────────────

	/// Switch layout strategy and reposition accordingly.
	pub fn set_layout(&mut self, strategy: LayoutStrategy) {
		self.strategy = strategy;
		match strategy {
			LayoutStrategy::Physics => self.physics.start(&self.state),
			LayoutStrategy::Hierarchical | LayoutStrategy::Grid => {
				self.physics.freeze();
				layout::apply(strategy, &mut self.state);
			}
		}
	}

	// ── Interaction ───────────────────────────────────────────────────────

	/// Route one surface event through the interaction machine, mirroring
	/// its effects onto the running simulation.
	pub fn handle_event(&mut self, event: SurfaceEvent) {
		if event == SurfaceEvent::Stabilized {
			self.physics.freeze();
			return;
		}
		match self.input.handle(event, &mut self.state) {
			InteractionEffect::DragMoved { id, position } => {
				self.physics.drag_to(&id, position);
			}
			InteractionEffect::DragEnded { id, .. } => {
				let locked = self.state.node(&id).is_some_and(|n| n.locked);
				self.physics.release_drag(&id, locked);
			}
			InteractionEffect::LocksToggled(ids) => {
				for id in ids {
					self.mirror_lock(&id);
				}
			}
			InteractionEffect::SelectionChanged | InteractionEffect::None => {}
		}
	}

	/// Toggle one node's lock from the host UI (outside the keyboard
	/// path).
	pub fn toggle_node_lock(&mut self, id: &str) {
		if self.state.toggle_lock(id).is_some() {
			self.mirror_lock(id);
		}
	}

	/// Lock or unlock the whole canvas.
	pub fn set_canvas_locked(&mut self, locked: bool) {
		self.state.set_canvas_locked(locked);
	}

	fn mirror_lock(&mut self, id: &str) {
		if let Some(node) = self.state.node(id) {
			self.physics.set_anchor(id, node.position, node.locked);
		}
	}

	// ── Outbound: depth & direction ───────────────────────────────────────

	/// Change the canvas-wide default depth; the request flushes after the
	/// debounce window.
	pub fn set_global_depth(&mut self, depth: u32) {
		self.state.request_global_depth(depth);
		self.hold_depth_requests();
	}

	/// Override one node's exploration depth; debounced like all depth
	/// changes.
	pub fn set_node_depth(&mut self, id: &str, depth: u32) {
		self.state.request_node_depth(id, depth);
		self.hold_depth_requests();
	}

	/// Batch one depth across the selected, unlocked nodes.
	pub fn apply_depth_to_selection(&mut self, depth: u32) {
		self.state.request_depth_for_selection(depth);
		self.hold_depth_requests();
	}

	/// Change a node's expansion direction; flushes immediately.
	pub fn set_direction(&mut self, id: &str, direction: RelationDirection) {
		self.state.request_direction(id, direction);
		self.outbox.append(&mut self.state.take_requests());
	}

	fn hold_depth_requests(&mut self) {
		self.held.append(&mut self.state.take_requests());
		if !self.held.is_empty() {
			self.debounce = Some(DEPTH_DEBOUNCE_SECONDS);
		}
	}

	/// Drain requests that are ready for the inventory collaborator.
	pub fn drain_requests(&mut self) -> Vec<ExpandRequest> {
		std::mem::take(&mut self.outbox)
	}

	// ── Frame loop ────────────────────────────────────────────────────────

	/// Advance engine timers and the simulation by `dt` seconds.
	pub fn tick(&mut self, dt: f32) {
		self.physics.tick(&mut self.state, dt);

		if let Some(remaining) = &mut self.debounce {
			*remaining -= dt;
			if *remaining <= 0.0 {
				self.debounce = None;
				self.outbox.append(&mut self.held);
			}
		}
	}

	// ── Scene ─────────────────────────────────────────────────────────────

	/// Build the annotated node/edge list for the rendering surface.
	pub fn scene(&self) -> Scene {
		let mut nodes: Vec<SceneNode> = self
			.state
			.nodes()
			.map(|node| SceneNode {
				id: node.id.clone(),
				label: node.label.clone(),
				position: node.position,
				fill: self.theme.status_fill(node.status),
				outline: self
					.theme
					.outline(self.state.is_selected(&node.id), node.locked),
				selected: self.state.is_selected(&node.id),
				locked: node.locked,
			})
			.collect();
		nodes.sort_by(|a, b| a.id.cmp(&b.id));

		let mut edges: Vec<SceneEdge> = self
			.state
			.edges()
			.map(|edge| SceneEdge {
				id: edge.id.clone(),
				source: edge.source.clone(),
				target: edge.target.clone(),
				kind: edge.kind,
				stroke: self.theme.edge_stroke(edge.kind),
			})
			.collect();
		edges.sort_by(|a, b| a.id.cmp(&b.id));

		Scene { nodes, edges }
	}

	/// Render the current scene to a surface.
	pub fn render_to(&self, surface: &mut dyn RenderSurface) {
		surface.render(&self.scene());
	}
}
