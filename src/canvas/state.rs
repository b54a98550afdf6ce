//! The mutable canvas aggregate.
//!
//! [`CanvasState`] owns every piece of session state the engine mutates:
//! the node and edge maps, the placement cursor for brand-new nodes, the
//! selection and lock sets, the global exploration depth, and the queue of
//! expansion requests bound for the inventory collaborator. Created empty
//! when the canvas mounts, mutated run-to-completion by every event, and
//! discarded on unmount; nothing here is persisted.

use std::collections::{HashMap, HashSet};

use super::types::{CanvasEdge, CanvasNode, Position, RelationDirection};

/// First slot handed out by the cursor.
pub const CURSOR_START: Position = Position { x: 100.0, y: 100.0 };
/// Horizontal advance per placement.
pub const CURSOR_STEP_X: f64 = 280.0;
/// Vertical advance when a row wraps.
pub const CURSOR_STEP_Y: f64 = 220.0;
/// Row wraps once x exceeds this bound.
pub const CURSOR_WRAP_X: f64 = 1000.0;

/// Monotonic placement cursor for nodes never seen before.
///
/// Walks a fixed grid so that a batch of new nodes never overlaps and
/// identical input order always yields identical placement.
#[derive(Clone, Copy, Debug)]
pub struct PlacementCursor {
	next: Position,
}

impl Default for PlacementCursor {
	fn default() -> Self {
		Self { next: CURSOR_START }
	}
}

impl PlacementCursor {
	/// Hand out the next slot and advance.
	pub fn next(&mut self) -> Position {
		let slot = self.next;
		self.next.x += CURSOR_STEP_X;
		if self.next.x > CURSOR_WRAP_X {
			self.next.x = CURSOR_START.x;
			self.next.y += CURSOR_STEP_Y;
		}
		slot
	}
}

/// An outbound re-expansion request for the inventory collaborator.
///
/// The engine only records what was asked; the collaborator answers with a
/// fresh [`super::types::GraphSnapshot`] that reconciliation folds back in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandRequest {
	/// Change exploration depth for one node, or the global default when
	/// `node` is `None`.
	Depth {
		/// Target node id, or `None` for the canvas-wide default.
		node: Option<String>,
		/// Requested hop count.
		depth: u32,
	},
	/// Change which relationship edges a node expands.
	Direction {
		/// Target node id.
		node: String,
		/// Requested direction.
		direction: RelationDirection,
	},
}

/// The canvas-side aggregate of nodes, edges, and interactive state.
#[derive(Debug, Default)]
pub struct CanvasState {
	nodes: HashMap<String, CanvasNode>,
	edges: HashMap<String, CanvasEdge>,
	cursor: PlacementCursor,
	selection: HashSet<String>,
	canvas_locked: bool,
	global_depth: u32,
	requests: Vec<ExpandRequest>,
}

impl CanvasState {
	/// Create an empty canvas state with the default exploration depth.
	pub fn new() -> Self {
		Self {
			global_depth: 1,
			..Self::default()
		}
	}

	/// Number of nodes currently on the canvas.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges currently on the canvas.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Look up a node by id.
	pub fn node(&self, id: &str) -> Option<&CanvasNode> {
		self.nodes.get(id)
	}

	/// Look up a node mutably by id.
	pub fn node_mut(&mut self, id: &str) -> Option<&mut CanvasNode> {
		self.nodes.get_mut(id)
	}

	/// Iterate all nodes in unspecified order.
	pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> {
		self.nodes.values()
	}

	/// Iterate all nodes mutably in unspecified order.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut CanvasNode> {
		self.nodes.values_mut()
	}

	/// Node ids in ascending order. Deterministic iteration for layout and
	/// placement passes.
	pub fn sorted_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.nodes.keys().cloned().collect();
		ids.sort();
		ids
	}

	/// Iterate all edges in unspecified order.
	pub fn edges(&self) -> impl Iterator<Item = &CanvasEdge> {
		self.edges.values()
	}

	/// Look up an edge by derived id.
	pub fn edge(&self, id: &str) -> Option<&CanvasEdge> {
		self.edges.get(id)
	}

	/// Insert a node, taking ownership of its id as the map key.
	pub(crate) fn insert_node(&mut self, node: CanvasNode) {
		self.nodes.insert(node.id.clone(), node);
	}

	/// Remove a node and, atomically, its selection membership. The caller
	/// is responsible for pruning edges in the same reconciliation pass.
	pub(crate) fn remove_node(&mut self, id: &str) -> Option<CanvasNode> {
		self.selection.remove(id);
		self.nodes.remove(id)
	}

	/// Replace the edge set wholesale.
	pub(crate) fn replace_edges(&mut self, edges: HashMap<String, CanvasEdge>) {
		self.edges = edges;
	}

	/// Next placement slot for a brand-new node.
	pub(crate) fn next_slot(&mut self) -> Position {
		self.cursor.next()
	}

	// ── Selection ─────────────────────────────────────────────────────────

	/// Ids currently selected, in unspecified order.
	pub fn selection(&self) -> &HashSet<String> {
		&self.selection
	}

	/// Whether a node is selected.
	pub fn is_selected(&self, id: &str) -> bool {
		self.selection.contains(id)
	}

	/// Replace the selection with a single node. Unknown ids clear instead.
	pub fn select_only(&mut self, id: &str) {
		self.selection.clear();
		if self.nodes.contains_key(id) {
			self.selection.insert(id.to_string());
		}
	}

	/// Toggle a node in or out of the selection (ctrl/cmd click).
	pub fn toggle_selected(&mut self, id: &str) {
		if !self.selection.remove(id) && self.nodes.contains_key(id) {
			self.selection.insert(id.to_string());
		}
	}

	/// Add every node inside the rectangle to the selection (union, not
	/// replace). Bounds are world coordinates; either corner order works.
	pub fn select_in_rect(&mut self, a: Position, b: Position) {
		let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
		let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
		for node in self.nodes.values() {
			let p = node.position;
			if p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y {
				self.selection.insert(node.id.clone());
			}
		}
	}

	/// Select every node on the canvas.
	pub fn select_all(&mut self) {
		self.selection = self.nodes.keys().cloned().collect();
	}

	/// Clear the selection.
	pub fn clear_selection(&mut self) {
		self.selection.clear();
	}

	// ── Lock state ────────────────────────────────────────────────────────

	/// Whether the whole canvas is locked against interaction.
	pub fn canvas_locked(&self) -> bool {
		self.canvas_locked
	}

	/// Lock or unlock the whole canvas.
	pub fn set_canvas_locked(&mut self, locked: bool) {
		self.canvas_locked = locked;
	}

	/// Toggle a node's lock. Locking snapshots the current position as a
	/// fixed point; unlocking releases it for automatic movement again.
	/// Returns the new lock state, or `None` for unknown ids.
	pub fn toggle_lock(&mut self, id: &str) -> Option<bool> {
		let node = self.nodes.get_mut(id)?;
		node.locked = !node.locked;
		Some(node.locked)
	}

	/// Toggle the lock of every selected node.
	pub fn toggle_lock_selected(&mut self) {
		let ids: Vec<String> = self.selection.iter().cloned().collect();
		for id in ids {
			self.toggle_lock(&id);
		}
	}

	// ── Position authority ────────────────────────────────────────────────

	/// Apply a user drag. Drags are authoritative and may move even locked
	/// nodes; only automatic movement honors the lock.
	pub fn apply_drag(&mut self, id: &str, position: Position) {
		if let Some(node) = self.nodes.get_mut(id) {
			node.position = position;
		}
	}

	// ── Depth & direction ─────────────────────────────────────────────────

	/// Default exploration depth applied when a node has no override.
	pub fn global_depth(&self) -> u32 {
		self.global_depth
	}

	/// The depth in effect for a node: its override, or the global default.
	pub fn effective_depth(&self, id: &str) -> u32 {
		self.nodes
			.get(id)
			.and_then(|n| n.depth)
			.unwrap_or(self.global_depth)
	}

	/// Change the canvas-wide default depth and queue a re-expansion.
	pub fn request_global_depth(&mut self, depth: u32) {
		self.global_depth = depth;
		self.requests.push(ExpandRequest::Depth { node: None, depth });
	}

	/// Override one node's depth and queue a re-expansion for it.
	pub fn request_node_depth(&mut self, id: &str, depth: u32) {
		let Some(node) = self.nodes.get_mut(id) else {
			return;
		};
		node.depth = Some(depth);
		self.requests.push(ExpandRequest::Depth {
			node: Some(id.to_string()),
			depth,
		});
	}

	/// Batch one depth value across every selected, unlocked node, each
	/// queuing an independent re-expansion request.
	pub fn request_depth_for_selection(&mut self, depth: u32) {
		let mut ids: Vec<String> = self
			.selection
			.iter()
			.filter(|id| self.nodes.get(*id).is_some_and(|n| !n.locked))
			.cloned()
			.collect();
		ids.sort();
		for id in ids {
			self.request_node_depth(&id, depth);
		}
	}

	/// Change which relationship edges a node expands and queue a
	/// re-expansion for it.
	pub fn request_direction(&mut self, id: &str, direction: RelationDirection) {
		let Some(node) = self.nodes.get_mut(id) else {
			return;
		};
		node.direction = direction;
		self.requests.push(ExpandRequest::Direction {
			node: id.to_string(),
			direction,
		});
	}

	/// Drain queued expansion requests for delivery to the collaborator.
	pub fn take_requests(&mut self) -> Vec<ExpandRequest> {
		std::mem::take(&mut self.requests)
	}

	#[cfg(test)]
	pub(crate) fn pending_request_count(&self) -> usize {
		self.requests.len()
	}
}
