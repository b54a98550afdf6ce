//! Topology canvas state engine.
//!
//! Maintains an interactive network-device graph between inventory
//! snapshots:
//! - Snapshot reconciliation that preserves user-adjusted positions
//! - Layered, grid, and force-simulation layout strategies
//! - Selection, lock, depth, and expansion-direction interactive state
//! - Scene production with style annotations for a rendering surface
//!
//! # Example
//!
//! ```
//! use topo_canvas::{GraphSnapshot, LayoutStrategy, TopologyCanvas};
//!
//! let snapshot = GraphSnapshot::from_json(
//!     r#"{
//!         "nodes": [
//!             {"id": "core-1", "label": "Core 1", "type": "router", "status": "online"},
//!             {"id": "sw-1", "label": "Switch 1", "type": "switch", "status": "online"}
//!         ],
//!         "edges": [{"source": "core-1", "target": "sw-1"}]
//!     }"#,
//! )
//! .unwrap();
//!
//! let mut canvas = TopologyCanvas::new();
//! canvas.apply_snapshot(&snapshot);
//! canvas.set_layout(LayoutStrategy::Hierarchical);
//! let scene = canvas.scene();
//! assert_eq!(scene.nodes.len(), 2);
//! ```

mod engine;
pub mod hierarchy;
pub mod layout;
mod physics;
mod reconcile;
mod selection;
mod state;
pub mod theme;
mod types;

pub use engine::{
	DEPTH_DEBOUNCE_SECONDS, RenderSurface, Scene, SceneEdge, SceneNode, TopologyCanvas,
};
pub use layout::LayoutStrategy;
pub use physics::SETTLE_SECONDS;
pub use selection::{
	CLICK_TOLERANCE, HIT_RADIUS, InteractionEffect, InteractionState, KeyCommand, Modifiers,
	SurfaceEvent, ViewTransform, node_at,
};
pub use state::{CanvasState, ExpandRequest, PlacementCursor};
pub use theme::{Color, Theme};
pub use types::{
	CanvasEdge, CanvasNode, EdgeKind, GraphSnapshot, NodeStatus, Position, RelationDirection,
	SnapshotEdge, SnapshotNode, edge_id,
};
