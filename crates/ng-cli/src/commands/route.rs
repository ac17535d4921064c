use std::path::Path;

use colored::Colorize;
use ng_pathing::{PathError, PathSearch, SearchRequest};

use super::{fmt_cost, fmt_vec, load};

pub fn run(path: &Path, from: &str, to: &str, budget: Option<f32>) -> Result<(), String> {
    let (file, scene) = load(path)?;
    let start = scene.resolve(from).map_err(|e| e.to_string())?;
    let target = scene.resolve(to).map_err(|e| e.to_string())?;

    let request = SearchRequest::new(start, budget.unwrap_or(f32::MAX));
    let route = PathSearch::new()
        .route(&scene, &request, target, &file.obstacle_field())
        .map_err(|e| match e {
            PathError::NoPath { .. } => {
                format!("no route from {} to {}", scene.label(start), scene.label(target))
            }
            other => other.to_string(),
        })?;

    let names: Vec<String> = route.tiles.iter().map(|id| scene.label(*id)).collect();
    println!(
        "  {} {} {}",
        "Route".bold(),
        names.join(" -> "),
        format!("(cost {}, {} steps)", fmt_cost(route.cost), route.steps()).dimmed()
    );
    println!();
    println!("  {}", "Waypoints".bold().underline());
    for (name, point) in names.iter().zip(route.waypoints(&scene)) {
        println!("    {:<12} {}", name, fmt_vec(point));
    }
    Ok(())
}
