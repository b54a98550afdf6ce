//! topo-canvas: interactive topology canvas state engine for network
//! device graphs.
//!
//! The crate keeps a graph of managed devices alive across repeated
//! inventory fetches: snapshots reconcile into the canvas without
//! discarding positions the user has arranged, three layout strategies
//! reposition unlocked nodes, and a pointer/keyboard state machine drives
//! selection, locking, and exploration depth. The host owns rendering and
//! data fetching; the engine hands it annotated scenes and outbound
//! expansion requests.

pub mod canvas;

pub use canvas::{
	CanvasEdge, CanvasNode, CanvasState, Color, EdgeKind, ExpandRequest, GraphSnapshot,
	InteractionEffect, InteractionState, KeyCommand, LayoutStrategy, Modifiers, NodeStatus,
	Position, RelationDirection, RenderSurface, Scene, SceneEdge, SceneNode, SnapshotEdge,
	SnapshotNode, SurfaceEvent, Theme, TopologyCanvas, ViewTransform,
};
