//! Wire and canvas data types for the topology engine.
//!
//! The inventory collaborator supplies positionless [`GraphSnapshot`]s; the
//! engine turns them into [`CanvasNode`]/[`CanvasEdge`] entries that carry
//! the per-node interactive state (position, lock, depth, direction).

use serde::Deserialize;

/// Operational status reported by the device inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
	/// Device is reachable and healthy.
	#[default]
	Online,
	/// Device is unreachable.
	Offline,
	/// Device is reachable but degraded.
	Warning,
}

/// Which relationship edges a node asks the inventory to expand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationDirection {
	/// Only edges toward the node's parents.
	Parents,
	/// Only edges toward the node's children.
	Children,
	/// Both parent and child edges.
	#[default]
	Both,
}

/// Relationship category of an edge.
///
/// Wire edges that carry no relationship metadata default to `Child`
/// (edge direction is parent → child).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Edge toward a parent device.
	Parent,
	/// Edge toward a child device.
	#[default]
	Child,
	/// Non-hierarchical peer relationship.
	Peer,
}

/// A device record as supplied by the inventory collaborator. Carries no
/// position information.
#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotNode {
	/// Stable device identifier, unique within a snapshot.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Device category tag (router, switch, ...).
	#[serde(rename = "type")]
	pub device_type: String,
	/// Operational status.
	#[serde(default)]
	pub status: NodeStatus,
	/// Management IP, when the inventory reports one.
	#[serde(default)]
	pub ip: Option<String>,
}

/// A directed relationship between two devices.
#[derive(Clone, Debug, Deserialize)]
pub struct SnapshotEdge {
	/// Source device id (the parent for `Child` edges).
	pub source: String,
	/// Target device id.
	pub target: String,
	/// Relationship category.
	#[serde(default)]
	pub kind: EdgeKind,
}

/// One externally supplied, positionless graph describing what should
/// currently be visible on the canvas.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphSnapshot {
	/// Devices to show.
	pub nodes: Vec<SnapshotNode>,
	/// Relationships to show.
	pub edges: Vec<SnapshotEdge>,
}

impl GraphSnapshot {
	/// Parse a snapshot from the inventory's JSON shape:
	/// `{ "nodes": [{ "id", "label", "type", "status" }], "edges": [{ "source", "target" }] }`.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		let snapshot: Self = serde_json::from_str(json)?;
		log::debug!(
			"topo-canvas: parsed snapshot with {} nodes, {} edges",
			snapshot.nodes.len(),
			snapshot.edges.len()
		);
		Ok(snapshot)
	}
}

/// A 2-D canvas position in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Position {
	/// Create a position.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// A device node as held by the canvas, including interactive state.
#[derive(Clone, Debug)]
pub struct CanvasNode {
	/// Stable device identifier.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Device category tag.
	pub device_type: String,
	/// Operational status.
	pub status: NodeStatus,
	/// Management IP, if known.
	pub ip: Option<String>,
	/// Which relationship edges this node requests be expanded.
	pub direction: RelationDirection,
	/// Per-node exploration depth override; the canvas global depth applies
	/// when unset.
	pub depth: Option<u32>,
	/// Excluded from automatic repositioning while set.
	pub locked: bool,
	/// Current canvas position. Assigned at reconciliation and only
	/// overwritten by a later reconcile (preserve), a layout pass, or a
	/// user drag.
	pub position: Position,
}

impl CanvasNode {
	/// Build a canvas node from a snapshot record at the given position.
	pub fn placed(record: &SnapshotNode, position: Position) -> Self {
		Self {
			id: record.id.clone(),
			label: record.label.clone(),
			device_type: record.device_type.clone(),
			status: record.status,
			ip: record.ip.clone(),
			direction: RelationDirection::default(),
			depth: None,
			locked: false,
			position,
		}
	}

	/// Refresh inventory-owned fields from a newer snapshot record, leaving
	/// position and interactive state untouched.
	pub fn refresh(&mut self, record: &SnapshotNode) {
		self.label = record.label.clone();
		self.device_type = record.device_type.clone();
		self.status = record.status;
		self.ip = record.ip.clone();
	}
}

/// A relationship edge as held by the canvas.
#[derive(Clone, Debug)]
pub struct CanvasEdge {
	/// Derived identifier, stable while source/target/ordinal are unchanged.
	pub id: String,
	/// Source node id.
	pub source: String,
	/// Target node id.
	pub target: String,
	/// Relationship category.
	pub kind: EdgeKind,
}

/// Derive an edge id from its endpoints and the ordinal disambiguating
/// parallel edges between the same pair.
pub fn edge_id(source: &str, target: &str, ordinal: usize) -> String {
	format!("{source}|{target}|{ordinal}")
}
