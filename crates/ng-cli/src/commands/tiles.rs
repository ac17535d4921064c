use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{fmt_vec, load};

pub fn run(path: &Path, detail: Option<&str>) -> Result<(), String> {
    let (_, scene) = load(path)?;

    if scene.is_empty() {
        println!("  No tiles in scene.");
        return Ok(());
    }

    if let Some(reference) = detail {
        return show_detail(&scene, reference);
    }

    let profile = scene.default_profile().clone();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tile", "Position", "Rotation", "Walkable", "Neighbours"]);

    let ids: Vec<_> = scene.tile_ids().collect();
    for id in ids {
        let Some(tile) = scene.get_tile(id) else {
            continue;
        };
        let neighbours: Vec<String> = scene.neighbours(id).iter().map(|n| scene.label(*n)).collect();
        let walkable = if tile.traversable_for(&profile) { "yes" } else { "no" };
        table.add_row(vec![
            tile.label(),
            fmt_vec(tile.position()),
            tile.rotation().to_string(),
            walkable.to_string(),
            if neighbours.is_empty() {
                "-".to_string()
            } else {
                neighbours.join(", ")
            },
        ]);
    }

    println!("  {} '{}'", "Scene".bold(), scene.name);
    println!("{table}");
    println!();
    println!("  {} tiles", scene.tile_count());
    Ok(())
}

fn show_detail(scene: &ng_core::Scene, reference: &str) -> Result<(), String> {
    let id = scene.resolve(reference).map_err(|e| e.to_string())?;
    let tile = scene.tile(id).map_err(|e| e.to_string())?;
    let overlay = scene
        .debug_overlay(id)
        .ok_or_else(|| format!("tile not found: {reference}"))?;

    println!("  {} {}", "Tile".bold(), tile.label());
    println!("  position     {}", fmt_vec(tile.position()));
    println!("  rotation     {}", tile.rotation());
    println!("  pawn anchor  {}", fmt_vec(tile.pawn_anchor()));
    println!();
    println!("  {}", "Contact points".bold().underline());
    for cp in overlay.contact_points {
        println!("    {}", fmt_vec(cp));
    }
    println!();
    println!("  {}", "Edges".bold().underline());
    if overlay.edges.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for (n, (from, to)) in scene.neighbours(id).iter().zip(&overlay.edges) {
        println!("    {} {} -> {}", scene.label(*n), fmt_vec(*from), fmt_vec(*to));
    }
    Ok(())
}
