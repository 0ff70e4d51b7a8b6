//! layout
//!
//! Pure layout of a snapshot into render geometry.
//!
//! # Architecture
//!
//! [`layout`] is a function of `(&RepoState, &LayoutParams)` and nothing
//! else. It runs in five passes:
//!
//! 1. **Lanes**: branches sorted by position (name breaks ties); lane index
//!    is the sort rank and picks a color from the cyclic palette.
//! 2. **Depths**: longest-path distance from a root, from
//!    [`CommitGraph::depths`].
//! 3. **Ownership**: `main` walks its first-parent chain first and claims
//!    every commit it visits; every other branch then walks its own chain
//!    in lane order and claims only unclaimed commits. A commit nobody
//!    claims is drawn in `main`'s lane.
//! 4. **Nodes**: one per commit at `(lane, depth)`, plus a marker for each
//!    branch whose tip is owned by another branch, so every lane shows its
//!    tip.
//! 5. **Edges**: marker connectors, neutral trunk lines joining
//!    consecutive nodes within a lane, parent edges (straight within a
//!    lane, curved across lanes, one per parent of a merge), and one
//!    label-to-first-node connector per branch.
//!
//! # Invariants
//!
//! - No randomness and no caches: equal inputs give equal output, down to
//!   the order of nodes and edges.
//! - Nodes are ordered by (depth, commit id), then markers in lane order.
//! - Edges are ordered connectors, trunk, parent, label.
//! - This module reads `core` only.
//!
//! # Example
//!
//! ```
//! use branchlab::core::samples;
//! use branchlab::layout::{layout, LayoutParams};
//!
//! let graph = layout(&samples::tutorial(), &LayoutParams::default());
//!
//! let root = graph.node("f9821b").unwrap();
//! assert_eq!((root.x, root.y), (150.0, 100.0));
//!
//! let feature = graph.label("feature").unwrap();
//! assert!(feature.is_head);
//! assert_eq!(feature.x, 300.0);
//! ```

pub mod geometry;

pub use crate::core::config::Orientation;
pub use geometry::{Extent, Path, Point};

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::core::commit::Commit;
use crate::core::config::{Config, DEFAULT_NEUTRAL, DEFAULT_PALETTE};
use crate::core::graph::CommitGraph;
use crate::core::state::{Branch, RepoState};
use crate::core::types::{BranchName, CommitId};

/// Distance from a label's anchor to where its connector starts.
const LABEL_STUB: f64 = 15.0;

/// Geometry and colors for one layout run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutParams {
    pub orientation: Orientation,
    pub padding_x: f64,
    pub padding_y: f64,
    /// Distance between lanes.
    pub lane_step: f64,
    /// Distance between depths when vertical.
    pub depth_step: f64,
    /// Distance between depths when horizontal.
    pub horizontal_depth_step: f64,
    /// Label row (vertical) or column (horizontal).
    pub label_offset: f64,
    pub palette: Vec<String>,
    pub neutral_color: String,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            padding_x: 150.0,
            padding_y: 100.0,
            lane_step: 150.0,
            depth_step: 80.0,
            horizontal_depth_step: 120.0,
            label_offset: 40.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            neutral_color: DEFAULT_NEUTRAL.to_string(),
        }
    }
}

impl LayoutParams {
    /// Parameters from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            orientation: config.orientation(),
            padding_x: config.padding_x(),
            padding_y: config.padding_y(),
            lane_step: config.lane_step(),
            depth_step: config.depth_step(),
            horizontal_depth_step: config.horizontal_depth_step(),
            label_offset: config.label_offset(),
            palette: config.palette(),
            neutral_color: config.neutral_color(),
        }
    }

    /// Same parameters, other orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    fn vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }

    /// Step along the depth axis for the current orientation.
    fn along_step(&self) -> f64 {
        if self.vertical() {
            self.depth_step
        } else {
            self.horizontal_depth_step
        }
    }

    fn position(&self, lane: usize, depth: usize) -> Point {
        let across = lane as f64 * self.lane_step;
        let along = depth as f64 * self.along_step();
        if self.vertical() {
            Point::new(self.padding_x + across, self.padding_y + along)
        } else {
            Point::new(self.padding_x + along, self.padding_y + across)
        }
    }

    fn label_position(&self, lane: usize) -> Point {
        let across = lane as f64 * self.lane_step;
        if self.vertical() {
            Point::new(self.padding_x + across, self.label_offset)
        } else {
            Point::new(self.label_offset, self.padding_y + across)
        }
    }

    fn label_stub(&self, anchor: Point) -> Point {
        if self.vertical() {
            anchor.offset(0.0, LABEL_STUB)
        } else {
            anchor.offset(LABEL_STUB, 0.0)
        }
    }

    /// Lane color; lanes past the palette wrap around.
    pub fn color(&self, lane: usize) -> &str {
        if self.palette.is_empty() {
            return &self.neutral_color;
        }
        &self.palette[lane % self.palette.len()]
    }

    fn extent(&self, lanes: usize, depths: usize) -> Extent {
        let across = lanes as f64 * self.lane_step;
        let along = depths as f64 * self.along_step();
        if self.vertical() {
            Extent {
                width: self.padding_x + across,
                height: self.padding_y + along,
            }
        } else {
            Extent {
                width: self.padding_x + along,
                height: self.padding_y + across,
            }
        }
    }
}

/// A drawn commit, or a branch-tip marker duplicating one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Commit id, or `<branch>-marker-<commit>` for a marker.
    pub id: String,
    pub commit_id: CommitId,
    pub message: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub depth: usize,
    pub lane: usize,
    pub is_marker: bool,
    pub commit_data: Commit,
}

impl Node {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// What an edge connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Parent to child.
    Parent,
    /// Consecutive nodes within one lane.
    Trunk,
    /// Owning node to a branch-tip marker.
    BranchConnector,
    /// Branch label to the first node in its lane.
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub key: String,
    pub path: Path,
    pub color: String,
    pub kind: EdgeKind,
}

/// A branch name tag at the head of its lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: BranchName,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub is_head: bool,
    pub commit_id: CommitId,
}

/// Everything needed to draw a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGraph {
    pub orientation: Orientation,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub labels: Vec<Label>,
    pub extent: Extent,
}

impl RenderGraph {
    /// The non-marker node for a commit.
    pub fn node(&self, commit: &str) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| !n.is_marker && n.commit_id.as_str() == commit)
    }

    /// A branch's tip marker, if it has one.
    pub fn marker(&self, branch: &str) -> Option<&Node> {
        let prefix = format!("{branch}-marker-");
        self.nodes
            .iter()
            .find(|n| n.is_marker && n.id.starts_with(&prefix))
    }

    pub fn label(&self, branch: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name.as_str() == branch)
    }

    pub fn edge(&self, key: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.key == key)
    }

    /// Edges of one kind, in output order.
    pub fn edges_of(&self, kind: EdgeKind) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Number of lanes.
    pub fn lane_count(&self) -> usize {
        self.labels.len()
    }
}

/// First-parent ownership, `main` first, then the rest in lane order.
fn ownership<'a>(
    graph: &CommitGraph<'a>,
    branches: &[&'a Branch],
) -> HashMap<&'a CommitId, &'a BranchName> {
    let mut owners = HashMap::new();
    let main = branches.iter().filter(|b| b.name.is_main());
    let rest = branches.iter().filter(|b| !b.name.is_main());

    for branch in main.chain(rest).copied() {
        for id in graph.first_parent_walk(&branch.commit_id) {
            owners.entry(id).or_insert(&branch.name);
        }
    }
    owners
}

/// Lay out a snapshot.
pub fn layout(state: &RepoState, params: &LayoutParams) -> RenderGraph {
    let branches = state.branches_by_position();
    let lanes: HashMap<&str, usize> = branches
        .iter()
        .enumerate()
        .map(|(lane, b)| (b.name.as_str(), lane))
        .collect();
    let fallback_lane = lanes.get(BranchName::MAIN).copied().unwrap_or(0);

    let graph = CommitGraph::new(&state.commits);
    let depths = graph.depths();
    let depth_of = |id: &CommitId| depths.get(id).copied().unwrap_or(0);
    let owners = ownership(&graph, &branches);

    // Commit map iterates by id; a stable sort on depth gives (depth, id).
    let mut ordered: Vec<&Commit> = state.commits.values().collect();
    ordered.sort_by_key(|c| depth_of(&c.id));

    let mut nodes: Vec<Node> = Vec::with_capacity(ordered.len() + branches.len());
    let mut index: HashMap<&CommitId, usize> = HashMap::with_capacity(ordered.len());
    for commit in ordered {
        let lane = owners
            .get(&commit.id)
            .and_then(|owner| lanes.get(owner.as_str()))
            .copied()
            .unwrap_or(fallback_lane);
        let depth = depth_of(&commit.id);
        let at = params.position(lane, depth);
        index.insert(&commit.id, nodes.len());
        nodes.push(Node {
            id: commit.id.to_string(),
            commit_id: commit.id.clone(),
            message: commit.message.clone(),
            x: at.x,
            y: at.y,
            color: params.color(lane).to_string(),
            depth,
            lane,
            is_marker: false,
            commit_data: commit.clone(),
        });
    }

    let mut connectors = Vec::new();
    for (lane, branch) in branches.iter().enumerate() {
        let Some(&owner_index) = index.get(&branch.commit_id) else {
            continue;
        };
        if owners.get(&branch.commit_id) == Some(&&branch.name) {
            continue;
        }

        let owner = &nodes[owner_index];
        let at = params.position(lane, owner.depth);
        let color = params.color(lane).to_string();
        if owner.point() != at {
            connectors.push(Edge {
                key: format!("branch-connection-{}-{}", branch.name, branch.commit_id),
                path: Path::line(owner.point(), at),
                color: color.clone(),
                kind: EdgeKind::BranchConnector,
            });
        }
        let marker = Node {
            id: format!("{}-marker-{}", branch.name, branch.commit_id),
            commit_id: owner.commit_id.clone(),
            message: owner.message.clone(),
            x: at.x,
            y: at.y,
            color,
            depth: owner.depth,
            lane,
            is_marker: true,
            commit_data: owner.commit_data.clone(),
        };
        nodes.push(marker);
    }

    // Node indices per lane, nearest the labels first.
    let mut by_lane: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        by_lane.entry(node.lane).or_default().push(i);
    }
    for members in by_lane.values_mut() {
        members.sort_by_key(|&i| nodes[i].depth);
    }

    let mut edges = connectors;

    for members in by_lane.values() {
        for pair in members.windows(2) {
            let (a, b) = (&nodes[pair[0]], &nodes[pair[1]]);
            edges.push(Edge {
                key: format!("gray-trunk-{}-{}", a.id, b.id),
                path: Path::line(a.point(), b.point()),
                color: params.neutral_color.clone(),
                kind: EdgeKind::Trunk,
            });
        }
    }

    let bend = params.along_step() / 2.0;
    for child in nodes.iter().filter(|n| !n.is_marker) {
        for parent_id in child.commit_data.parent.ids() {
            let Some(&parent_index) = index.get(parent_id) else {
                continue;
            };
            let parent = &nodes[parent_index];
            let path = if parent.lane == child.lane {
                Path::line(parent.point(), child.point())
            } else {
                Path::depth_curve(parent.point(), child.point(), bend, params.vertical())
            };
            edges.push(Edge {
                key: format!("{}-{}", parent_id, child.commit_id),
                path,
                color: child.color.clone(),
                kind: EdgeKind::Parent,
            });
        }
    }

    let head = state.head.name();
    let mut labels = Vec::with_capacity(branches.len());
    for (lane, branch) in branches.iter().enumerate() {
        let anchor = params.label_position(lane);
        let color = params.color(lane).to_string();

        if let Some(&first) = by_lane.get(&lane).and_then(|members| members.first()) {
            let first = &nodes[first];
            let edge_color = if first.depth == 0 {
                color.clone()
            } else {
                params.neutral_color.clone()
            };
            edges.push(Edge {
                key: format!("label-trunk-{}", branch.name),
                path: Path::line(params.label_stub(anchor), first.point()),
                color: edge_color,
                kind: EdgeKind::Label,
            });
        }

        labels.push(Label {
            name: branch.name.clone(),
            x: anchor.x,
            y: anchor.y,
            color,
            is_head: &branch.name == head,
            commit_id: branch.commit_id.clone(),
        });
    }

    let depth_rows = depths.values().max().map_or(0, |d| d + 1);
    RenderGraph {
        orientation: params.orientation,
        nodes,
        edges,
        labels,
        extent: params.extent(branches.len(), depth_rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::samples;

    fn tutorial() -> RenderGraph {
        layout(&samples::tutorial(), &LayoutParams::default())
    }

    #[test]
    fn shared_ancestors_belong_to_main() {
        let graph = tutorial();
        for id in ["f9821b", "3009a", "7a19bf", "a568e1"] {
            assert_eq!(graph.node(id).unwrap().lane, 0, "{id}");
        }
        assert_eq!(graph.node("c4553b").unwrap().lane, 1);
        assert_eq!(graph.node("d8e9f0").unwrap().lane, 1);
    }

    #[test]
    fn vertical_coordinates() {
        let graph = tutorial();
        let feature_tip = graph.node("d8e9f0").unwrap();
        assert_eq!((feature_tip.x, feature_tip.y), (300.0, 100.0 + 4.0 * 80.0));
        assert_eq!(feature_tip.color, "#a78bfa");
    }

    #[test]
    fn horizontal_swaps_axes_with_wider_step() {
        let params = LayoutParams::default().with_orientation(Orientation::Horizontal);
        let graph = layout(&samples::tutorial(), &params);
        let tip = graph.node("d8e9f0").unwrap();
        assert_eq!((tip.x, tip.y), (150.0 + 4.0 * 120.0, 250.0));

        let label = graph.label("feature").unwrap();
        assert_eq!((label.x, label.y), (40.0, 250.0));
        assert_eq!(graph.orientation, Orientation::Horizontal);
    }

    #[test]
    fn nodes_ordered_by_depth_then_id() {
        let graph = tutorial();
        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["f9821b", "3009a", "7a19bf", "a568e1", "c4553b", "d8e9f0"]
        );
    }

    #[test]
    fn cross_lane_parent_edge_curves() {
        let graph = tutorial();
        let edge = graph.edge("7a19bf-c4553b").unwrap();
        assert_eq!(edge.kind, EdgeKind::Parent);
        assert_eq!(edge.path.to_string(), "M 150 260 C 150 300, 300 300, 300 340");
        assert_eq!(edge.color, "#a78bfa");

        let straight = graph.edge("3009a-7a19bf").unwrap();
        assert!(!straight.path.is_curve());
    }

    #[test]
    fn trunk_joins_lane_neighbours() {
        let graph = tutorial();
        let trunk: Vec<_> = graph.edges_of(EdgeKind::Trunk).map(|e| e.key.as_str()).collect();
        assert_eq!(
            trunk,
            vec![
                "gray-trunk-f9821b-3009a",
                "gray-trunk-3009a-7a19bf",
                "gray-trunk-7a19bf-a568e1",
                "gray-trunk-c4553b-d8e9f0",
            ]
        );
        assert!(graph
            .edges_of(EdgeKind::Trunk)
            .all(|e| e.color == DEFAULT_NEUTRAL));
    }

    #[test]
    fn label_connectors_color_by_first_depth() {
        let graph = tutorial();
        let main = graph.edge("label-trunk-main").unwrap();
        assert_eq!(main.color, "#38b2ac");
        assert_eq!(main.path.to_string(), "M 150 55 L 150 100");

        let feature = graph.edge("label-trunk-feature").unwrap();
        assert_eq!(feature.color, DEFAULT_NEUTRAL);
        assert_eq!(feature.path.to_string(), "M 300 55 L 300 340");
    }

    #[test]
    fn branch_on_ancestor_gets_marker() {
        let mut state = samples::tutorial();
        let tip = CommitId::new("3009a").unwrap();
        let name = BranchName::new("hotfix").unwrap();
        state.branches.insert(
            name.clone(),
            Branch {
                name,
                commit_id: tip,
                position: 2,
            },
        );

        let graph = layout(&state, &LayoutParams::default());
        let marker = graph.marker("hotfix").unwrap();
        assert_eq!(marker.id, "hotfix-marker-3009a");
        assert_eq!((marker.x, marker.y), (450.0, 180.0));
        assert_eq!(marker.lane, 2);

        let connector = graph.edge("branch-connection-hotfix-3009a").unwrap();
        assert_eq!(connector.path.to_string(), "M 150 180 L 450 180");
        assert_eq!(graph.edges[0].kind, EdgeKind::BranchConnector);
        assert!(graph.node("3009a").is_some_and(|n| n.lane == 0));
    }

    #[test]
    fn unowned_commits_fall_back_to_main_lane() {
        let mut state = samples::tutorial();
        // Move feature back so c4553b/d8e9f0 are reachable from no branch.
        if let Some(feature) = state.branches.get_mut("feature") {
            feature.commit_id = CommitId::new("7a19bf").unwrap();
        }
        let graph = layout(&state, &LayoutParams::default());
        assert_eq!(graph.node("d8e9f0").unwrap().lane, 0);
        assert!(graph.marker("feature").is_some());
    }

    #[test]
    fn palette_wraps_and_extent_covers_lanes() {
        let params = LayoutParams {
            palette: vec!["#000000".into(), "#ffffff".into()],
            ..LayoutParams::default()
        };
        assert_eq!(params.color(3), "#ffffff");

        let graph = layout(&samples::tutorial(), &params);
        assert_eq!(graph.extent.width, 150.0 + 2.0 * 150.0);
        assert_eq!(graph.extent.height, 100.0 + 5.0 * 80.0);
    }

    #[test]
    fn merge_commit_draws_edge_per_parent() {
        let graph = layout(&samples::showcase(), &LayoutParams::default());
        let merge = graph
            .nodes
            .iter()
            .find(|n| !n.is_marker && n.commit_data.is_merge())
            .unwrap();
        let into_merge = graph
            .edges_of(EdgeKind::Parent)
            .filter(|e| e.key.ends_with(&format!("-{}", merge.id)))
            .count();
        assert_eq!(into_merge, 2);
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(tutorial()).unwrap();
        assert_eq!(json["orientation"], "vertical");
        assert_eq!(json["nodes"][0]["commitId"], "f9821b");
        assert_eq!(json["nodes"][0]["isMarker"], false);
        assert_eq!(json["labels"][1]["isHead"], true);
        assert_eq!(json["edges"][0]["kind"], "trunk");
    }
}
