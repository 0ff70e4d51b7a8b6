//! Layout scenarios: coordinates, markers, merge curves and the large
//! generated history.

use branchlab::command::execute;
use branchlab::core::config::Orientation;
use branchlab::core::samples;
use branchlab::engine::{Repository, SequentialIds};
use branchlab::layout::{layout, EdgeKind, LayoutParams, RenderGraph};

fn repo() -> Repository {
    Repository::with_ids(samples::tutorial(), Box::new(SequentialIds::default()))
}

fn run(repo: &mut Repository, lines: &[&str]) -> RenderGraph {
    for line in lines {
        let result = execute(repo, line);
        assert!(result.success, "{line}: {}", result.message);
    }
    layout(repo.state(), &LayoutParams::default())
}

#[test]
fn tutorial_lanes_and_root_row() {
    let graph = layout(&samples::tutorial(), &LayoutParams::default());

    assert_eq!(graph.node("a568e1").unwrap().x, 150.0);
    assert_eq!(graph.node("d8e9f0").unwrap().x, 300.0);
    assert_eq!(graph.node("f9821b").unwrap().y, 100.0);

    let main = graph.label("main").unwrap();
    assert_eq!((main.x, main.y), (150.0, 40.0));
    assert!(!main.is_head);
    assert!(graph.label("feature").unwrap().is_head);

    assert_eq!(graph.extent.width, 150.0 + 2.0 * 150.0);
    assert_eq!(graph.extent.height, 100.0 + 5.0 * 80.0);
}

#[test]
fn layout_is_deterministic() {
    let state = samples::showcase();
    let params = LayoutParams::default();
    let first = layout(&state, &params);
    let second = layout(&state, &params);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn merge_draws_a_curve_from_the_other_lane() {
    let mut repo = repo();
    let graph = run(&mut repo, &["git switch main", "git merge feature"]);

    let merge_id = repo.state().branch("main").unwrap().commit_id.to_string();
    let merge = graph.node(&merge_id).unwrap();
    assert_eq!(merge.lane, 0);
    assert_eq!(merge.depth, 5);

    let straight = graph.edge(&format!("a568e1-{merge_id}")).unwrap();
    assert!(!straight.path.is_curve());

    let curve = graph.edge(&format!("d8e9f0-{merge_id}")).unwrap();
    assert!(curve.path.is_curve());
    assert_eq!(curve.kind, EdgeKind::Parent);
    assert_eq!((curve.path.start().x, curve.path.start().y), (300.0, 420.0));
    assert_eq!((curve.path.end().x, curve.path.end().y), (150.0, 500.0));
    assert_eq!(curve.color, merge.color);
}

#[test]
fn rebased_branch_gets_a_marker() {
    let mut repo = repo();
    let graph = run(&mut repo, &["git rebase main"]);

    let marker = graph.marker("feature").unwrap();
    assert_eq!(marker.id, "feature-marker-a568e1");
    assert_eq!((marker.x, marker.y), (300.0, 340.0));

    let connector = graph.edge("branch-connection-feature-a568e1").unwrap();
    assert_eq!(connector.kind, EdgeKind::BranchConnector);
    assert_eq!((connector.path.start().x, connector.path.start().y), (150.0, 340.0));

    // Abandoned feature commits fall back to main's lane.
    assert_eq!(graph.node("c4553b").unwrap().lane, 0);
    assert_eq!(graph.node("d8e9f0").unwrap().lane, 0);
}

#[test]
fn label_edge_colors() {
    let graph = layout(&samples::tutorial(), &LayoutParams::default());
    let params = LayoutParams::default();

    // main's lane starts at the root, so its label edge takes the lane color.
    assert_eq!(graph.edge("label-trunk-main").unwrap().color, params.color(0));
    assert_eq!(
        graph.edge("label-trunk-feature").unwrap().color,
        params.neutral_color
    );
}

#[test]
fn horizontal_layout_swaps_extent() {
    let params = LayoutParams::default().with_orientation(Orientation::Horizontal);
    let graph = layout(&samples::tutorial(), &params);

    assert_eq!(graph.extent.width, 150.0 + 5.0 * 120.0);
    assert_eq!(graph.extent.height, 100.0 + 2.0 * 150.0);
    assert_eq!(graph.node("f9821b").unwrap().x, 150.0);
    assert_eq!(graph.node("c4553b").unwrap().y, 250.0);
}

#[test]
fn showcase_draws_every_commit_once() {
    let state = samples::showcase();
    let graph = layout(&state, &LayoutParams::default());

    let drawn: Vec<_> = graph.nodes.iter().filter(|n| !n.is_marker).collect();
    assert_eq!(drawn.len(), state.commits.len());
    assert_eq!(graph.labels.len(), state.branches.len());
    assert_eq!(graph.lane_count(), state.branches.len());

    for node in &graph.nodes {
        assert!(node.x <= graph.extent.width, "{}", node.id);
        assert!(node.y <= graph.extent.height, "{}", node.id);
    }

    let parent_edges = graph.edges_of(EdgeKind::Parent).count();
    let parent_links: usize = state.commits.values().map(|c| c.parent.ids().count()).sum();
    assert_eq!(parent_edges, parent_links);
}

#[test]
fn showcase_palette_wraps() {
    let graph = layout(&samples::showcase(), &LayoutParams::default());
    let lane0 = &graph.labels[0];
    let lane4 = &graph.labels[4];
    assert_eq!(lane0.color, lane4.color);
    assert_ne!(graph.labels[1].color, lane0.color);
}
