use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use ng_core::{NoObstruction, ObstructionOracle};
use ng_pathing::{PathSearch, SearchRequest};

use super::{fmt_cost, fmt_vec, load};

pub fn run(path: &Path, from: &str, budget: f32, no_obstacles: bool) -> Result<(), String> {
    let (file, scene) = load(path)?;
    let start = scene.resolve(from).map_err(|e| e.to_string())?;

    let field = file.obstacle_field();
    let oracle: &dyn ObstructionOracle = if no_obstacles { &NoObstruction } else { &field };

    let mut search = PathSearch::new();
    let summary = search
        .run(&scene, &SearchRequest::new(start, budget), oracle)
        .map_err(|e| e.to_string())?;

    println!(
        "  {} from {} {}",
        "Reach".bold(),
        scene.label(start),
        format!("(budget {budget})").dimmed()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Tile", "Distance", "Via", "Anchor"]);
    for (id, distance) in search.reachable() {
        let via = search
            .predecessor(id)
            .map(|p| scene.label(p))
            .unwrap_or_else(|| "-".to_string());
        let anchor = scene
            .get_tile(id)
            .map(|t| fmt_vec(t.pawn_anchor()))
            .unwrap_or_default();
        table.add_row(vec![scene.label(id), fmt_cost(distance), via, anchor]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} of {} tiles reachable, {} sweeps",
        summary.reached,
        scene.tile_count(),
        summary.sweeps
    );
    Ok(())
}
