//! Layered (hierarchical) layout.
//!
//! Simplified Sugiyama-style arrangement, tolerant of cycles: level
//! assignment by work-queue relaxation, per-level placement under a minimum
//! spacing, a bottom-up re-centering pass for symmetry, and a final
//! translation onto the canvas anchor. Edge direction is parent → child and
//! a node always sits strictly below every ancestor (max-level rule), so a
//! layered rendering never draws an edge pointing upward.

use std::collections::{HashMap, HashSet, VecDeque};

use super::state::CanvasState;
use super::types::Position;

/// Horizontal spacing between root centers.
const ROOT_SPACING: f64 = 400.0;
/// Minimum horizontal spacing between any two nodes on one level.
const MIN_SPACING: f64 = 220.0;
/// Vertical spacing between levels.
const LEVEL_SPACING: f64 = 220.0;
/// Vertical offset of level 0.
const LEVEL_OFFSET: f64 = 100.0;
/// The layout's horizontal bounding-box center lands here.
const ANCHOR_X: f64 = 500.0;

/// Run the layered layout and write positions for every unlocked node.
///
/// Locked nodes participate in leveling (they shape the hierarchy) but are
/// never moved. Empty canvas is a no-op.
pub fn apply(state: &mut CanvasState) {
	let positions = compute(state);
	if positions.is_empty() {
		return;
	}
	let mut moved = 0usize;
	for (id, position) in positions {
		if let Some(node) = state.node_mut(&id)
			&& !node.locked
		{
			node.position = position;
			moved += 1;
		}
	}
	log::info!("topo-canvas: hierarchical layout placed {moved} nodes");
}

/// Compute layered positions for the whole canvas without writing them.
pub fn compute(state: &CanvasState) -> Vec<(String, Position)> {
	let ids = state.sorted_ids();
	if ids.is_empty() {
		return Vec::new();
	}

	let (children_of, parents_of) = adjacency(state, &ids);
	let levels = assign_levels(state, &ids, &children_of, &parents_of);
	let mut tiers = group_by_level(&ids, &levels);
	let mut xs = place_levels(&tiers, &parents_of);
	recenter_parents(&mut tiers, &mut xs, &children_of);
	finalize(&tiers, &xs)
}

/// Build parent → children and child → parents adjacency over live nodes.
/// Edge direction is parent → child regardless of annotated kind; peer
/// edges level the same way.
fn adjacency<'a>(
	state: &'a CanvasState,
	ids: &[String],
) -> (
	HashMap<&'a str, Vec<&'a str>>,
	HashMap<&'a str, Vec<&'a str>>,
) {
	let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
	let mut parents_of: HashMap<&str, Vec<&str>> = HashMap::new();
	for edge in state.edges() {
		children_of
			.entry(edge.source.as_str())
			.or_default()
			.push(edge.target.as_str());
		parents_of
			.entry(edge.target.as_str())
			.or_default()
			.push(edge.source.as_str());
	}
	// Deterministic neighbor order.
	for list in children_of.values_mut().chain(parents_of.values_mut()) {
		list.sort();
	}
	debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
	(children_of, parents_of)
}

/// Assign a level to every node by breadth-first relaxation.
///
/// A node reached via multiple parents takes the maximum level over all of
/// them, re-entering the queue whenever a deeper level is discovered, so
/// the queue drains only once levels stabilize. Two guards keep cyclic
/// input bounded: seed roots are pinned at level 0 (a back-edge can never
/// raise a root), and no level may exceed the node count (no simple path is
/// longer), so cycles that bypass a seed stop relaxing at the cap.
fn assign_levels(
	state: &CanvasState,
	ids: &[String],
	children_of: &HashMap<&str, Vec<&str>>,
	parents_of: &HashMap<&str, Vec<&str>>,
) -> HashMap<String, usize> {
	let mut roots: Vec<&str> = ids
		.iter()
		.map(String::as_str)
		.filter(|id| !parents_of.contains_key(id))
		.collect();
	if roots.is_empty() {
		// Fully cyclic graph: fall back to the selection, or the smallest id.
		roots = ids
			.iter()
			.map(String::as_str)
			.filter(|id| state.is_selected(id))
			.collect();
		if roots.is_empty() {
			roots.push(ids[0].as_str());
		}
		log::debug!(
			"topo-canvas: no zero-parent roots, falling back to {} seed(s)",
			roots.len()
		);
	}

	let cap = ids.len();
	let mut pinned: HashSet<&str> = HashSet::new();
	let mut level: HashMap<String, usize> = HashMap::with_capacity(cap);
	let mut queue: VecDeque<&str> = VecDeque::new();
	for &root in &roots {
		pinned.insert(root);
		level.insert(root.to_string(), 0);
		queue.push_back(root);
	}

	loop {
		while let Some(id) = queue.pop_front() {
			let next = level[id] + 1;
			if next > cap {
				continue;
			}
			for &child in children_of.get(id).into_iter().flatten() {
				if pinned.contains(child) {
					continue;
				}
				if level.get(child).is_none_or(|&l| next > l) {
					level.insert(child.to_string(), next);
					queue.push_back(child);
				}
			}
		}
		// A cyclic component with no root stays unreached; seed its
		// smallest id at level 0 and keep relaxing until all are covered.
		match ids.iter().find(|id| !level.contains_key(*id)) {
			Some(id) => {
				pinned.insert(id.as_str());
				level.insert(id.clone(), 0);
				queue.push_back(id.as_str());
			}
			None => break,
		}
	}
	level
}

/// Group node ids by their final level, ascending, each tier id-sorted.
fn group_by_level(ids: &[String], levels: &HashMap<String, usize>) -> Vec<Vec<String>> {
	let deepest = levels.values().copied().max().unwrap_or(0);
	let mut tiers: Vec<Vec<String>> = vec![Vec::new(); deepest + 1];
	for id in ids {
		tiers[levels[id]].push(id.clone());
	}
	tiers.retain(|tier| !tier.is_empty());
	tiers
}

/// Assign x coordinates level by level, top down.
///
/// Roots spread evenly about x = 0. Every later node wants the mean x of
/// its already-placed parents; orphans at a level append after the
/// rightmost placed node. A left-to-right scan clamps each node at least
/// [`MIN_SPACING`] right of its predecessor, so no two nodes on a level
/// ever overlap. Tiers are reordered to the final left-to-right order.
fn place_levels(
	tiers: &[Vec<String>],
	parents_of: &HashMap<&str, Vec<&str>>,
) -> HashMap<String, f64> {
	let mut xs: HashMap<String, f64> = HashMap::new();
	for (depth, tier) in tiers.iter().enumerate() {
		let mut desired: Vec<(String, f64)> = Vec::with_capacity(tier.len());
		if depth == 0 {
			let half = (tier.len() as f64 - 1.0) / 2.0;
			for (i, id) in tier.iter().enumerate() {
				desired.push((id.clone(), (i as f64 - half) * ROOT_SPACING));
			}
		} else {
			let mut rightmost = f64::NEG_INFINITY;
			let mut orphans: Vec<String> = Vec::new();
			for id in tier {
				let placed: Vec<f64> = parents_of
					.get(id.as_str())
					.into_iter()
					.flatten()
					.filter_map(|p| xs.get(*p).copied())
					.collect();
				if placed.is_empty() {
					orphans.push(id.clone());
				} else {
					let mean = placed.iter().sum::<f64>() / placed.len() as f64;
					rightmost = rightmost.max(mean);
					desired.push((id.clone(), mean));
				}
			}
			let mut next = if rightmost.is_finite() {
				rightmost + MIN_SPACING
			} else {
				0.0
			};
			for id in orphans {
				desired.push((id, next));
				next += MIN_SPACING;
			}
		}

		desired.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
		let mut prev = f64::NEG_INFINITY;
		for (id, want) in desired {
			let x = if prev.is_finite() {
				want.max(prev + MIN_SPACING)
			} else {
				want
			};
			prev = x;
			xs.insert(id, x);
		}
	}
	xs
}

/// Second pass, bottom level to top: re-center every parent over the span
/// of its children, clamped between its level neighbors so the minimum
/// spacing fixed by [`place_levels`] survives the symmetry pass.
fn recenter_parents(
	tiers: &mut [Vec<String>],
	xs: &mut HashMap<String, f64>,
	children_of: &HashMap<&str, Vec<&str>>,
) {
	// Neighbor clamping needs each tier in left-to-right order.
	for tier in tiers.iter_mut() {
		tier.sort_by(|a, b| xs[a].total_cmp(&xs[b]).then_with(|| a.cmp(b)));
	}
	for tier in tiers.iter().rev() {
		for (i, id) in tier.iter().enumerate() {
			let child_xs: Vec<f64> = children_of
				.get(id.as_str())
				.into_iter()
				.flatten()
				.filter_map(|c| xs.get(*c).copied())
				.collect();
			let Some(first) = child_xs.first() else {
				continue;
			};
			let (min, max) = child_xs
				.iter()
				.fold((*first, *first), |(lo, hi), &x| (lo.min(x), hi.max(x)));
			// Clamp between level neighbors; the scan order guarantees the
			// interval always contains the node's current x.
			let lo = if i > 0 {
				xs[&tier[i - 1]] + MIN_SPACING
			} else {
				f64::NEG_INFINITY
			};
			let hi = if i + 1 < tier.len() {
				xs[&tier[i + 1]] - MIN_SPACING
			} else {
				f64::INFINITY
			};
			if lo > hi {
				continue;
			}
			let center = ((min + max) / 2.0).clamp(lo, hi);
			xs.insert(id.clone(), center);
		}
	}
}

/// Translate the layout so its horizontal center sits on the canvas anchor
/// and expand levels into y coordinates.
fn finalize(tiers: &[Vec<String>], xs: &HashMap<String, f64>) -> Vec<(String, Position)> {
	let mut min_x = f64::INFINITY;
	let mut max_x = f64::NEG_INFINITY;
	for x in xs.values() {
		min_x = min_x.min(*x);
		max_x = max_x.max(*x);
	}
	let shift = ANCHOR_X - (min_x + max_x) / 2.0;

	let mut out = Vec::with_capacity(xs.len());
	for (depth, tier) in tiers.iter().enumerate() {
		let y = depth as f64 * LEVEL_SPACING + LEVEL_OFFSET;
		for id in tier {
			out.push((id.clone(), Position::new(xs[id] + shift, y)));
		}
	}
	out
}
