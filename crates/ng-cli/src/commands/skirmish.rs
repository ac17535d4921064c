use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use ng_core::{
    ActorId, CollisionCapsule, MovementProfile, Obstacle, ObstacleField, Scene, TileId,
};
use ng_pathing::{PathSearch, SearchRequest};
use ng_turns::{TurnConfig, TurnParticipant, TurnSequencer};

use super::{fmt_cost, load};

/// A unit on the board.
struct Unit {
    actor: ActorId,
    name: String,
    tile: TileId,
    budget: f32,
    capsule: CollisionCapsule,
    profile: MovementProfile,
}

impl Unit {
    /// The box other units collide with.
    fn body(&self, scene: &Scene) -> Option<Obstacle> {
        let anchor = scene.get_tile(self.tile)?.pawn_anchor();
        let half = Vec3::new(self.capsule.radius, self.capsule.radius, self.capsule.half_height);
        Some(Obstacle::new(anchor + self.capsule.offset, half).owned_by(self.actor))
    }
}

pub fn run(path: &Path, rounds: u32, seed: u64) -> Result<(), String> {
    let (file, scene) = load(path)?;

    let mut units = Vec::with_capacity(file.units.len());
    for spec in &file.units {
        let actor = ActorId::new();
        let tile = scene.resolve(&spec.tile).map_err(|e| e.to_string())?;
        units.push(Unit {
            actor,
            name: spec.name.clone(),
            tile,
            budget: spec.budget,
            capsule: spec.capsule.owned_by(actor),
            profile: spec
                .profile
                .clone()
                .unwrap_or_else(|| scene.default_profile().clone()),
        });
    }

    if units.is_empty() {
        println!("  No units in scene. Nothing to play.");
        return Ok(());
    }

    let mut field: ObstacleField = file.obstacle_field();
    for unit in &units {
        if let Some(body) = unit.body(&scene) {
            field.push(body);
        }
    }

    let transcript: Rc<RefCell<Vec<String>>> = Rc::default();
    let mut sequencer = TurnSequencer::with_config(TurnConfig::default().with_max_events(256));
    for unit in &units {
        let mut participant = TurnParticipant::new(unit.actor);
        let (log, name) = (Rc::clone(&transcript), unit.name.clone());
        participant.on_turn_start(move |_| log.borrow_mut().push(format!("{name} takes the turn")));
        let (log, name) = (Rc::clone(&transcript), unit.name.clone());
        participant.on_turn_end(move |_| log.borrow_mut().push(format!("{name} is done")));
        sequencer.register(participant).map_err(|e| e.to_string())?;
    }

    println!(
        "  {} '{}' {}",
        "Skirmish".bold(),
        scene.name,
        format!("({} units, {rounds} rounds, seed={seed})", units.len()).dimmed()
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut search = PathSearch::new();
    let mut shown_round = 0;

    sequencer.start();
    while sequencer.round_number() <= rounds {
        if sequencer.round_number() != shown_round {
            shown_round = sequencer.round_number();
            println!();
            println!("  {}", format!("Round {shown_round}").bold().underline());
        }
        let pending = std::mem::take(&mut *transcript.borrow_mut());
        for line in pending {
            println!("    {}", line.dimmed());
        }

        let Some(actor) = sequencer.active() else {
            break;
        };
        let Some(index) = units.iter().position(|u| u.actor == actor) else {
            return Err(format!("active actor {actor} has no unit"));
        };

        take_turn(&scene, &mut units, index, &mut field, &mut search, &mut rng)?;
        sequencer.end_turn(actor).map_err(|e| e.to_string())?;
        // Keep the "done" line in the round it belongs to.
        let done = {
            let mut lines = transcript.borrow_mut();
            (!lines.is_empty()).then(|| lines.remove(0))
        };
        if let Some(line) = done {
            println!("    {}", line.dimmed());
        }
    }

    println!();
    println!("  {}", "Final positions".bold().underline());
    for unit in &units {
        println!("    {:<12} {}", unit.name, scene.label(unit.tile));
    }
    Ok(())
}

fn take_turn(
    scene: &Scene,
    units: &mut [Unit],
    index: usize,
    field: &mut ObstacleField,
    search: &mut PathSearch,
    rng: &mut StdRng,
) -> Result<(), String> {
    let occupied: Vec<TileId> = units.iter().map(|u| u.tile).collect();
    let unit = &units[index];
    let request = SearchRequest::new(unit.tile, unit.budget)
        .with_profile(unit.profile.clone())
        .with_capsule(unit.capsule);
    search.run(scene, &request, &*field).map_err(|e| e.to_string())?;

    let candidates: Vec<(TileId, f32)> = search
        .reachable()
        .into_iter()
        .filter(|(id, _)| !occupied.contains(id))
        .filter(|(id, _)| {
            scene.get_tile(*id).is_some_and(|t| {
                t.legal_position_at_end_of_turn(unit.profile.max_walk_angle, &unit.profile.modes)
            })
        })
        .collect();

    if candidates.is_empty() {
        println!("    {} holds at {}", unit.name.cyan(), scene.label(unit.tile));
        return Ok(());
    }

    let (target, cost) = candidates[rng.random_range(0..candidates.len())];
    let Some(path) = search.path_to(target) else {
        return Err(format!("no path to reached tile {}", scene.label(target)));
    };
    let route: Vec<String> = path.tiles.iter().map(|id| scene.label(*id)).collect();
    println!(
        "    {} moves {} {}",
        unit.name.cyan(),
        route.join(" -> "),
        format!("(cost {})", fmt_cost(cost)).dimmed()
    );
    debug!(unit = %unit.name, from = %unit.tile, to = %target, waypoints = path.waypoints(scene).len(), "unit moved");

    let unit = &mut units[index];
    unit.tile = target;
    field.remove_owned_by(unit.actor);
    if let Some(body) = unit.body(scene) {
        field.push(body);
    }
    Ok(())
}
