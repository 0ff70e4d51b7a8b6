//! layout command - Print the render graph as JSON

use crate::core::config::{Config, Orientation};
use crate::engine::{Context, SnapshotSource};
use crate::layout::{layout as compute, LayoutParams};
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Lay out the selected snapshot and print the result.
pub fn layout(
    ctx: &Context,
    config: &Config,
    source: &SnapshotSource,
    orientation: Option<Orientation>,
) -> Result<()> {
    let state = source.load(ctx).context("Failed to load snapshot")?;

    let mut params = LayoutParams::from_config(config);
    if let Some(orientation) = orientation {
        params = params.with_orientation(orientation);
    }

    let graph = compute(&state, &params);
    output::debug(
        format!(
            "{} nodes, {} edges, {} lanes",
            graph.nodes.len(),
            graph.edges.len(),
            graph.lane_count()
        ),
        ctx.verbosity(),
    );

    let json = serde_json::to_string_pretty(&graph).context("Failed to encode layout")?;
    println!("{json}");
    Ok(())
}
