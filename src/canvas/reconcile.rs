//! Snapshot reconciliation.
//!
//! Diffs an incoming [`GraphSnapshot`] against the live [`CanvasState`]:
//! stale nodes and their edges go away, surviving nodes keep their live
//! positions and interactive state, brand-new nodes take deterministic slots
//! from the placement cursor, and the edge set is replaced wholesale under
//! stable derived ids. Reconciling the same snapshot twice is a no-op on
//! the second pass.

use std::collections::{HashMap, HashSet};

use super::state::CanvasState;
use super::types::{CanvasEdge, CanvasNode, GraphSnapshot, edge_id};

/// Reconcile the canvas against a freshly fetched snapshot.
///
/// Callers that keep a physics simulation running must sync its live
/// positions into `state` first, so the preserve rule copies what is on
/// screen rather than a stale value.
pub fn reconcile(state: &mut CanvasState, snapshot: &GraphSnapshot) {
	let incoming = dedup_nodes(snapshot);
	let incoming_ids: HashSet<&str> = incoming.iter().map(|n| n.id.as_str()).collect();

	// Remove nodes absent from the snapshot; selection entries go with them.
	let stale: Vec<String> = state
		.nodes()
		.filter(|n| !incoming_ids.contains(n.id.as_str()))
		.map(|n| n.id.clone())
		.collect();
	for id in &stale {
		state.remove_node(id);
	}
	if !stale.is_empty() {
		log::debug!("topo-canvas: reconcile removed {} stale nodes", stale.len());
	}

	// Preserve survivors, place newcomers from the cursor in encounter order.
	let mut added = 0usize;
	for record in incoming {
		if let Some(node) = state.node_mut(&record.id) {
			node.refresh(record);
		} else {
			let slot = state.next_slot();
			state.insert_node(CanvasNode::placed(record, slot));
			added += 1;
		}
	}

	state.replace_edges(build_edges(state, snapshot));
	log::debug!(
		"topo-canvas: reconcile done, {} nodes ({added} new), {} edges",
		state.node_count(),
		state.edge_count()
	);
}

/// Keep the first occurrence of each node id; duplicates violate the
/// snapshot contract and are dropped with a warning.
fn dedup_nodes(snapshot: &GraphSnapshot) -> Vec<&super::types::SnapshotNode> {
	let mut seen = HashSet::new();
	let mut nodes = Vec::with_capacity(snapshot.nodes.len());
	for record in &snapshot.nodes {
		if seen.insert(record.id.as_str()) {
			nodes.push(record);
		} else {
			log::warn!(
				"topo-canvas: snapshot repeats node id {:?}, keeping the first",
				record.id
			);
		}
	}
	nodes
}

/// Rebuild the edge map from the snapshot. Edges referencing nodes missing
/// from the canvas are pruned in the same pass; parallel edges between the
/// same pair get ascending ordinals so derived ids stay stable across
/// snapshots with unchanged source/target order.
fn build_edges(state: &CanvasState, snapshot: &GraphSnapshot) -> HashMap<String, CanvasEdge> {
	let mut ordinals: HashMap<(&str, &str), usize> = HashMap::new();
	let mut edges = HashMap::with_capacity(snapshot.edges.len());
	for record in &snapshot.edges {
		let ordinal = ordinals
			.entry((record.source.as_str(), record.target.as_str()))
			.or_insert(0);
		let id = edge_id(&record.source, &record.target, *ordinal);
		*ordinal += 1;

		if state.node(&record.source).is_none() || state.node(&record.target).is_none() {
			log::debug!("topo-canvas: pruning dangling edge {id}");
			continue;
		}
		edges.insert(
			id.clone(),
			CanvasEdge {
				id,
				source: record.source.clone(),
				target: record.target.clone(),
				kind: record.kind,
			},
		);
	}
	edges
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::canvas::types::{NodeStatus, Position, SnapshotEdge, SnapshotNode};

	fn node(id: &str) -> SnapshotNode {
		SnapshotNode {
			id: id.into(),
			label: id.to_uppercase(),
			device_type: "router".into(),
			status: NodeStatus::Online,
			ip: None,
		}
	}

	fn edge(source: &str, target: &str) -> SnapshotEdge {
		SnapshotEdge {
			source: source.into(),
			target: target.into(),
			kind: Default::default(),
		}
	}

	fn snapshot(nodes: &[&str], edges: &[(&str, &str)]) -> GraphSnapshot {
		GraphSnapshot {
			nodes: nodes.iter().map(|id| node(id)).collect(),
			edges: edges.iter().map(|(s, t)| edge(s, t)).collect(),
		}
	}

	#[test]
	fn new_nodes_follow_the_cursor_sequence() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a", "b", "c", "d", "e"], &[]));
		let positions: Vec<Position> = ["a", "b", "c", "d", "e"]
			.iter()
			.map(|id| state.node(id).unwrap().position)
			.collect();
		assert_eq!(
			positions,
			vec![
				Position::new(100.0, 100.0),
				Position::new(380.0, 100.0),
				Position::new(660.0, 100.0),
				Position::new(940.0, 100.0),
				Position::new(100.0, 320.0),
			]
		);
	}

	#[test]
	fn survivors_keep_positions_newcomers_take_next_slot() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a", "b"], &[("a", "b")]));
		let a_before = state.node("a").unwrap().position;
		let b_before = state.node("b").unwrap().position;

		reconcile(&mut state, &snapshot(&["a", "b", "c"], &[("a", "b"), ("a", "c")]));
		assert_eq!(state.node("a").unwrap().position, a_before);
		assert_eq!(state.node("b").unwrap().position, b_before);
		// a and b consumed the first two slots, so c lands on the third.
		assert_eq!(state.node("c").unwrap().position, Position::new(660.0, 100.0));
	}

	#[test]
	fn reconcile_is_idempotent() {
		let mut state = CanvasState::new();
		let snap = snapshot(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		reconcile(&mut state, &snap);
		state.select_only("b");
		state.toggle_lock("c");
		let before: Vec<(String, Position)> = state
			.sorted_ids()
			.into_iter()
			.map(|id| {
				let p = state.node(&id).unwrap().position;
				(id, p)
			})
			.collect();

		reconcile(&mut state, &snap);
		let after: Vec<(String, Position)> = state
			.sorted_ids()
			.into_iter()
			.map(|id| {
				let p = state.node(&id).unwrap().position;
				(id, p)
			})
			.collect();
		assert_eq!(before, after);
		assert!(state.is_selected("b"));
		assert!(state.node("c").unwrap().locked);
	}

	#[test]
	fn position_survives_label_and_status_change() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a"], &[]));
		state.apply_drag("a", Position::new(42.0, 7.0));

		let mut changed = snapshot(&["a"], &[]);
		changed.nodes[0].label = "renamed".into();
		changed.nodes[0].status = NodeStatus::Warning;
		reconcile(&mut state, &changed);

		let a = state.node("a").unwrap();
		assert_eq!(a.position, Position::new(42.0, 7.0));
		assert_eq!(a.label, "renamed");
		assert_eq!(a.status, NodeStatus::Warning);
	}

	#[test]
	fn stale_nodes_and_their_edges_are_pruned() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a", "b", "c"], &[("a", "b"), ("b", "c")]));
		state.select_all();

		reconcile(&mut state, &snapshot(&["a", "b"], &[("a", "b")]));
		assert!(state.node("c").is_none());
		assert!(!state.is_selected("c"));
		assert!(state.edges().all(|e| e.source != "c" && e.target != "c"));
		assert_eq!(state.edge_count(), 1);
	}

	#[test]
	fn zero_node_snapshot_clears_the_canvas() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a", "b"], &[("a", "b")]));
		reconcile(&mut state, &GraphSnapshot::default());
		assert_eq!(state.node_count(), 0);
		assert_eq!(state.edge_count(), 0);
	}

	#[test]
	fn duplicate_node_ids_keep_first_occurrence() {
		let mut state = CanvasState::new();
		let mut snap = snapshot(&["a", "a"], &[]);
		snap.nodes[0].label = "first".into();
		snap.nodes[1].label = "second".into();
		reconcile(&mut state, &snap);
		assert_eq!(state.node_count(), 1);
		assert_eq!(state.node("a").unwrap().label, "first");
		// The duplicate must not consume a placement slot either.
		reconcile(&mut state, &snapshot(&["a", "b"], &[]));
		assert_eq!(state.node("b").unwrap().position, Position::new(380.0, 100.0));
	}

	#[test]
	fn dangling_edges_are_pruned_silently() {
		let mut state = CanvasState::new();
		reconcile(&mut state, &snapshot(&["a"], &[("a", "ghost"), ("ghost", "a")]));
		assert_eq!(state.edge_count(), 0);
		assert_eq!(state.node_count(), 1);
	}

	#[test]
	fn parallel_edges_get_stable_ordinal_ids() {
		let mut state = CanvasState::new();
		let snap = GraphSnapshot {
			nodes: vec![node("a"), node("b")],
			edges: vec![edge("a", "b"), edge("a", "b")],
		};
		reconcile(&mut state, &snap);
		assert_eq!(state.edge_count(), 2);
		assert!(state.edge("a|b|0").is_some());
		assert!(state.edge("a|b|1").is_some());

		// Same snapshot again: same derived ids.
		reconcile(&mut state, &snap);
		assert!(state.edge("a|b|0").is_some());
		assert!(state.edge("a|b|1").is_some());
	}
}
