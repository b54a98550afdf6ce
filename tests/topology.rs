//! End-to-end tests through the public engine API: snapshot JSON in,
//! reconciliation, layout, interaction, and expansion requests out.

use topo_canvas::{
	ExpandRequest, GraphSnapshot, KeyCommand, LayoutStrategy, Modifiers, Position,
	RelationDirection, SurfaceEvent, TopologyCanvas,
};

fn parse(json: &str) -> GraphSnapshot {
	GraphSnapshot::from_json(json).expect("snapshot json should parse")
}

fn diamond() -> GraphSnapshot {
	parse(
		r#"{
			"nodes": [
				{"id": "a", "label": "Core", "type": "router", "status": "online"},
				{"id": "b", "label": "Dist 1", "type": "switch", "status": "online"},
				{"id": "c", "label": "Dist 2", "type": "switch", "status": "warning"},
				{"id": "d", "label": "Access", "type": "switch", "status": "offline"}
			],
			"edges": [
				{"source": "a", "target": "b"},
				{"source": "a", "target": "c"},
				{"source": "b", "target": "d"},
				{"source": "c", "target": "d"}
			]
		}"#,
	)
}

#[test]
fn snapshot_json_round_trips_into_the_canvas() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());

	let state = canvas.state();
	assert_eq!(state.node_count(), 4);
	assert_eq!(state.edge_count(), 4);
	let c = state.node("c").expect("c placed");
	assert_eq!(c.label, "Dist 2");
	assert_eq!(c.device_type, "switch");
}

#[test]
fn refetch_preserves_arranged_positions_and_places_only_newcomers() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&parse(
		r#"{
			"nodes": [
				{"id": "a", "label": "A", "type": "router", "status": "online"},
				{"id": "b", "label": "B", "type": "switch", "status": "online"}
			],
			"edges": [{"source": "a", "target": "b"}]
		}"#,
	));

	// The user drags b somewhere deliberate.
	canvas.handle_event(SurfaceEvent::PointerDown {
		x: 380.0,
		y: 100.0,
		modifiers: Modifiers::default(),
	});
	canvas.handle_event(SurfaceEvent::PointerMove { x: 700.0, y: 450.0 });
	canvas.handle_event(SurfaceEvent::PointerUp { x: 700.0, y: 450.0 });
	assert_eq!(
		canvas.state().node("b").unwrap().position,
		Position::new(700.0, 450.0)
	);

	// A refetch adds c and relabels b; b must stay where the user put it.
	canvas.apply_snapshot(&parse(
		r#"{
			"nodes": [
				{"id": "a", "label": "A", "type": "router", "status": "online"},
				{"id": "b", "label": "B renamed", "type": "switch", "status": "offline"},
				{"id": "c", "label": "C", "type": "switch", "status": "online"}
			],
			"edges": [
				{"source": "a", "target": "b"},
				{"source": "a", "target": "c"}
			]
		}"#,
	));

	let b = canvas.state().node("b").unwrap();
	assert_eq!(b.position, Position::new(700.0, 450.0));
	assert_eq!(b.label, "B renamed");
	// c takes the third cursor slot; a and b consumed the first two.
	assert_eq!(
		canvas.state().node("c").unwrap().position,
		Position::new(660.0, 100.0)
	);
}

#[test]
fn stale_nodes_and_their_edges_disappear_on_refetch() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());
	canvas.handle_event(SurfaceEvent::Key(KeyCommand::SelectAll));

	canvas.apply_snapshot(&parse(
		r#"{
			"nodes": [
				{"id": "a", "label": "Core", "type": "router", "status": "online"},
				{"id": "b", "label": "Dist 1", "type": "switch", "status": "online"}
			],
			"edges": [{"source": "a", "target": "b"}]
		}"#,
	));

	let state = canvas.state();
	assert_eq!(state.node_count(), 2);
	assert_eq!(state.edge_count(), 1);
	assert!(state.node("d").is_none());
	assert!(!state.is_selected("d"));
	assert!(state.is_selected("a"));
}

#[test]
fn hierarchical_layout_layers_the_diamond() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());
	canvas.set_layout(LayoutStrategy::Hierarchical);

	let pos = |id: &str| canvas.state().node(id).unwrap().position;
	// One root tier, one middle tier, one leaf tier, top to bottom.
	assert_eq!(pos("a").y, 100.0);
	assert_eq!(pos("b").y, 320.0);
	assert_eq!(pos("c").y, 320.0);
	assert_eq!(pos("d").y, 540.0);
	// The leaf centers under its two parents, the root above both.
	assert_eq!(pos("d").x, (pos("b").x + pos("c").x) / 2.0);
	assert_eq!(pos("a").x, pos("d").x);
	// Siblings keep their minimum spacing.
	assert!((pos("b").x - pos("c").x).abs() >= 220.0);
}

#[test]
fn grid_layout_respects_a_locked_node() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());

	canvas.handle_event(SurfaceEvent::PointerDown {
		x: 100.0,
		y: 100.0,
		modifiers: Modifiers::default(),
	});
	canvas.handle_event(SurfaceEvent::PointerMove { x: 900.0, y: 900.0 });
	canvas.handle_event(SurfaceEvent::PointerUp { x: 900.0, y: 900.0 });
	canvas.toggle_node_lock("a");

	canvas.set_layout(LayoutStrategy::Grid);
	assert_eq!(
		canvas.state().node("a").unwrap().position,
		Position::new(900.0, 900.0)
	);
	// The other three fill the grid from the origin without a gap.
	assert_eq!(
		canvas.state().node("b").unwrap().position,
		Position::new(100.0, 100.0)
	);
}

#[test]
fn physics_settles_and_freezes_within_the_window() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());
	canvas.set_layout(LayoutStrategy::Physics);

	let before = canvas.state().node("d").unwrap().position;
	let mut elapsed = 0.0f32;
	while elapsed < 3.2 {
		canvas.tick(0.05);
		elapsed += 0.05;
	}
	let settled = canvas.state().node("d").unwrap().position;
	assert_ne!(settled, before);

	// Past the settling window further ticks change nothing.
	canvas.tick(0.05);
	assert_eq!(canvas.state().node("d").unwrap().position, settled);
}

#[test]
fn depth_changes_batch_behind_the_debounce_and_direction_does_not() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());

	canvas.set_global_depth(2);
	canvas.set_node_depth("b", 4);
	assert!(canvas.drain_requests().is_empty());

	canvas.set_direction("c", RelationDirection::Both);
	let immediate = canvas.drain_requests();
	assert_eq!(
		immediate,
		vec![ExpandRequest::Direction {
			node: "c".into(),
			direction: RelationDirection::Both,
		}]
	);

	canvas.tick(0.35);
	let flushed = canvas.drain_requests();
	assert_eq!(flushed.len(), 2);
	assert!(flushed.contains(&ExpandRequest::Depth {
		node: None,
		depth: 2
	}));
	assert!(flushed.contains(&ExpandRequest::Depth {
		node: Some("b".into()),
		depth: 4
	}));
	assert_eq!(canvas.state().effective_depth("b"), 4);
	assert_eq!(canvas.state().effective_depth("a"), 2);
}

#[test]
fn locked_canvas_blocks_interaction_but_not_snapshots() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());
	canvas.set_canvas_locked(true);

	canvas.handle_event(SurfaceEvent::Key(KeyCommand::SelectAll));
	assert!(canvas.state().selection().is_empty());

	canvas.apply_snapshot(&parse(
		r#"{
			"nodes": [{"id": "a", "label": "Core", "type": "router", "status": "online"}],
			"edges": []
		}"#,
	));
	assert_eq!(canvas.state().node_count(), 1);
}

#[test]
fn scene_reflects_status_selection_and_lock() {
	let mut canvas = TopologyCanvas::new();
	canvas.apply_snapshot(&diamond());
	canvas.handle_event(SurfaceEvent::PointerDown {
		x: 100.0,
		y: 100.0,
		modifiers: Modifiers::default(),
	});
	canvas.handle_event(SurfaceEvent::PointerUp { x: 100.0, y: 100.0 });
	canvas.toggle_node_lock("d");

	let scene = canvas.scene();
	assert_eq!(scene.nodes.len(), 4);
	assert_eq!(scene.edges.len(), 4);
	let node = |id: &str| scene.nodes.iter().find(|n| n.id == id).unwrap();
	assert!(node("a").selected);
	assert!(node("a").outline.is_some());
	assert!(node("d").locked);
	assert_ne!(node("c").fill, node("b").fill);
	assert_ne!(node("d").fill, node("b").fill);
}
