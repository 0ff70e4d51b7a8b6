//! config command - Show effective configuration

use crate::core::config::Config;
use anyhow::Result;

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|c| format!("\"{c}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Print every effective value in TOML form.
pub fn show(config: &Config) -> Result<()> {
    println!("[layout]");
    println!("orientation = \"{}\"", config.orientation());
    println!("padding_x = {:?}", config.padding_x());
    println!("padding_y = {:?}", config.padding_y());
    println!("lane_step = {:?}", config.lane_step());
    println!("depth_step = {:?}", config.depth_step());
    println!("horizontal_depth_step = {:?}", config.horizontal_depth_step());
    println!("label_offset = {:?}", config.label_offset());
    println!("palette = {}", quoted_list(&config.palette()));
    println!("neutral_color = \"{}\"", config.neutral_color());
    println!();
    println!("[history]");
    println!("recall_limit = {}", config.recall_limit());
    println!();
    println!("[shell]");
    println!("prompt = {:?}", config.prompt());
    Ok(())
}

/// Print which files were loaded.
pub fn path(config: &Config) -> Result<()> {
    match config.global_config_loaded_from() {
        Some(path) => println!("global: {}", path.display()),
        None => println!("global: (none)"),
    }
    match config.workspace_config_loaded_from() {
        Some(path) => println!("workspace: {}", path.display()),
        None => println!("workspace: (none)"),
    }
    Ok(())
}
