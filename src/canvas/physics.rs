//! Force-simulation layout adapter.
//!
//! Wraps the external `force_graph` capability: the engine seeds the
//! simulation from current canvas positions, mirrors node locks onto sim
//! anchors, advances it frame by frame, and copies positions back for
//! unlocked nodes. The simulation is frozen once a bounded settling window
//! elapses or the surface reports stabilization, after which drags are
//! authoritative again. The spring/charge math itself stays inside the
//! capability.

use std::collections::HashMap;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::state::CanvasState;
use super::types::Position;

/// How long the simulation may keep moving nodes before it is frozen.
pub const SETTLE_SECONDS: f32 = 3.0;

struct Sim {
	graph: ForceGraph<String, ()>,
	index_of: HashMap<String, DefaultNodeIdx>,
}

/// Adapter owning the force simulation while the physics strategy is
/// active.
#[derive(Default)]
pub struct PhysicsAdapter {
	sim: Option<Sim>,
	settle_remaining: f32,
}

impl PhysicsAdapter {
	/// Whether a simulation is currently driving positions.
	pub fn is_running(&self) -> bool {
		self.sim.is_some()
	}

	/// Seconds left in the settling window while running.
	pub fn settle_remaining(&self) -> f32 {
		self.settle_remaining
	}

	/// Start (or restart) the simulation from the canvas's current
	/// positions. Locked nodes enter as anchors and never move.
	pub fn start(&mut self, state: &CanvasState) {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut index_of = HashMap::with_capacity(state.node_count());

		for id in state.sorted_ids() {
			let Some(node) = state.node(&id) else {
				continue;
			};
			let idx = graph.add_node(NodeData {
				x: node.position.x as f32,
				y: node.position.y as f32,
				mass: 10.0,
				is_anchor: node.locked,
				user_data: id.clone(),
			});
			index_of.insert(id, idx);
		}
		for edge in state.edges() {
			if let (Some(&src), Some(&tgt)) =
				(index_of.get(&edge.source), index_of.get(&edge.target))
			{
				graph.add_edge(src, tgt, EdgeData::default());
			}
		}

		self.sim = Some(Sim { graph, index_of });
		self.settle_remaining = SETTLE_SECONDS;
		log::info!(
			"topo-canvas: physics enabled for {} nodes, settling for {SETTLE_SECONDS}s",
			state.node_count()
		);
	}

	/// Advance the simulation and stream positions back into the canvas.
	/// Freezes itself once the settling window runs out.
	pub fn tick(&mut self, state: &mut CanvasState, dt: f32) {
		let Some(sim) = self.sim.as_mut() else {
			return;
		};
		sim.graph.update(dt);
		Self::copy_positions(sim, state);

		self.settle_remaining -= dt;
		if self.settle_remaining <= 0.0 {
			self.freeze();
		}
	}

	/// Copy the simulation's live positions into the canvas for unlocked
	/// nodes. Called before reconciliation so the preserve rule sees what
	/// is actually on screen.
	pub fn sync_into(&self, state: &mut CanvasState) {
		if let Some(sim) = &self.sim {
			Self::copy_positions(sim, state);
		}
	}

	fn copy_positions(sim: &Sim, state: &mut CanvasState) {
		sim.graph.visit_nodes(|sim_node| {
			if let Some(node) = state.node_mut(&sim_node.data.user_data)
				&& !node.locked
			{
				node.position = Position::new(sim_node.x() as f64, sim_node.y() as f64);
			}
		});
	}

	/// Mirror a lock toggle onto the running simulation, snapshotting the
	/// node's canvas position as the fixed point.
	pub fn set_anchor(&mut self, id: &str, position: Position, anchored: bool) {
		let Some(sim) = self.sim.as_mut() else {
			return;
		};
		let Some(&idx) = sim.index_of.get(id) else {
			return;
		};
		sim.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = position.x as f32;
				node.data.y = position.y as f32;
				node.data.is_anchor = anchored;
			}
		});
	}

	/// Pin a dragged node at its pointer position so the simulation pulls
	/// neighbors along instead of fighting the drag.
	pub fn drag_to(&mut self, id: &str, position: Position) {
		self.set_anchor(id, position, true);
	}

	/// Release a drag pin for a node that is not otherwise locked.
	pub fn release_drag(&mut self, id: &str, locked: bool) {
		let Some(sim) = self.sim.as_mut() else {
			return;
		};
		let Some(&idx) = sim.index_of.get(id) else {
			return;
		};
		sim.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.is_anchor = locked;
			}
		});
	}

	/// Stop the simulation; automatic movement ends until the next start.
	/// Also the handler for the surface's stabilization-complete signal.
	pub fn freeze(&mut self) {
		if self.sim.take().is_some() {
			self.settle_remaining = 0.0;
			log::info!("topo-canvas: physics frozen");
		}
	}
}
