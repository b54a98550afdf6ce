//! Layout strategies.
//!
//! Three disciplines reposition the canvas: the layered hierarchy
//! ([`super::hierarchy`]), the deterministic grid implemented here, and the
//! delegated force simulation ([`super::physics`]). All of them honor the
//! same rule: locked nodes are never moved automatically.

use super::hierarchy;
use super::state::CanvasState;
use super::types::Position;

/// Horizontal grid cell pitch.
const GRID_STEP_X: f64 = 280.0;
/// Vertical grid cell pitch.
const GRID_STEP_Y: f64 = 220.0;
/// Top-left grid origin.
const GRID_ORIGIN: Position = Position { x: 100.0, y: 100.0 };

/// Which layout discipline positions the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutStrategy {
	/// Layered top-to-bottom arrangement by dependency direction.
	#[default]
	Hierarchical,
	/// Row-major square-ish grid.
	Grid,
	/// Delegated force simulation, frozen after a settling window.
	Physics,
}

/// Run a non-physics strategy against the canvas. Physics is driven by the
/// engine's tick instead, since it settles over time.
pub fn apply(strategy: LayoutStrategy, state: &mut CanvasState) {
	match strategy {
		LayoutStrategy::Hierarchical => hierarchy::apply(state),
		LayoutStrategy::Grid => grid(state),
		LayoutStrategy::Physics => {}
	}
}

/// Arrange all unlocked nodes row-major in a grid of side ceil(sqrt(n)),
/// in ascending id order. O(n), deterministic, no-op for zero eligible
/// nodes.
pub fn grid(state: &mut CanvasState) {
	let mut ids: Vec<String> = state
		.nodes()
		.filter(|n| !n.locked)
		.map(|n| n.id.clone())
		.collect();
	if ids.is_empty() {
		return;
	}
	ids.sort();

	let side = (ids.len() as f64).sqrt().ceil() as usize;
	for (i, id) in ids.iter().enumerate() {
		let (col, row) = (i % side, i / side);
		if let Some(node) = state.node_mut(id) {
			node.position = Position::new(
				GRID_ORIGIN.x + col as f64 * GRID_STEP_X,
				GRID_ORIGIN.y + row as f64 * GRID_STEP_Y,
			);
		}
	}
	log::info!("topo-canvas: grid layout placed {} nodes", ids.len());
}
