//! Visual style annotations for the rendering surface.
//!
//! The engine does not draw; it annotates scene nodes and edges with colors
//! and outline styles the surface can apply. Styling is keyed off device
//! status plus the selection/lock flags.

use super::types::{EdgeKind, NodeStatus};

/// RGBA color annotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha, 0.0..=1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color from RGB channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Copy of this color with a different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS representation: `#rrggbb`, or `rgba(...)` when translucent.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Color assignments for node status and interaction outlines.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Fill for healthy devices.
	pub online: Color,
	/// Fill for unreachable devices.
	pub offline: Color,
	/// Fill for degraded devices.
	pub warning: Color,
	/// Outline drawn around selected nodes.
	pub selected_outline: Color,
	/// Outline drawn around locked nodes.
	pub locked_outline: Color,
	/// Stroke for parent/child relationship edges.
	pub edge: Color,
	/// Stroke for peer relationship edges.
	pub peer_edge: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			online: Color::rgb(46, 125, 50),
			offline: Color::rgb(198, 40, 40),
			warning: Color::rgb(230, 81, 0),
			selected_outline: Color::rgb(25, 118, 210),
			locked_outline: Color::rgb(117, 117, 117),
			edge: Color::rgb(144, 164, 174),
			peer_edge: Color::rgb(144, 164, 174).with_alpha(0.6),
		}
	}
}

impl Theme {
	/// Fill color for a device status.
	pub fn status_fill(&self, status: NodeStatus) -> Color {
		match status {
			NodeStatus::Online => self.online,
			NodeStatus::Offline => self.offline,
			NodeStatus::Warning => self.warning,
		}
	}

	/// Outline for a node's interaction state. Selection wins over lock
	/// when both apply.
	pub fn outline(&self, selected: bool, locked: bool) -> Option<Color> {
		if selected {
			Some(self.selected_outline)
		} else if locked {
			Some(self.locked_outline)
		} else {
			None
		}
	}

	/// Stroke color for an edge kind.
	pub fn edge_stroke(&self, kind: EdgeKind) -> Color {
		match kind {
			EdgeKind::Peer => self.peer_edge,
			EdgeKind::Parent | EdgeKind::Child => self.edge,
		}
	}
}
