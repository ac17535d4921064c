use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use ng_core::{CollisionCapsule, MovementProfile, ObstructionOracle, Scene, TileId};
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::cost::{CostModel, EuclideanCost};
use crate::error::{PathError, PathResult};
use crate::path::Path;

/// Per-tile search state.
///
/// Right after a reset `distance` is infinite, `predecessor` is `None` and
/// `visited` is false. When a search completes, `distance` is finite exactly
/// for the tiles reachable within budget, and those are all visited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileScratch {
    /// Cheapest known travel cost from the origin.
    pub distance: f32,
    /// The tile this one is entered from on the cheapest known route.
    pub predecessor: Option<TileId>,
    /// Whether the tile's distance is final.
    pub visited: bool,
}

impl Default for TileScratch {
    fn default() -> Self {
        Self {
            distance: f32::INFINITY,
            predecessor: None,
            visited: false,
        }
    }
}

/// Parameters of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Origin tile.
    pub start: TileId,
    /// Maximum total travel cost.
    pub budget: f32,
    /// Movement abilities. `None` uses the scene default.
    pub profile: Option<MovementProfile>,
    /// Collision shape swept along every step.
    pub capsule: CollisionCapsule,
}

impl SearchRequest {
    /// Search from `start` with the given budget, the scene's default profile
    /// and a default capsule.
    pub fn new(start: TileId, budget: f32) -> Self {
        Self {
            start,
            budget,
            profile: None,
            capsule: CollisionCapsule::default(),
        }
    }

    /// Set the movement profile.
    pub fn with_profile(mut self, profile: MovementProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the collision capsule.
    pub fn with_capsule(mut self, capsule: CollisionCapsule) -> Self {
        self.capsule = capsule;
        self
    }
}

/// Outcome counters of a finished search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSummary {
    /// Tiles reachable within budget, origin included.
    pub reached: usize,
    /// Largest distance among reached tiles.
    pub farthest: f32,
    /// Obstruction sweeps issued.
    pub sweeps: usize,
}

/// Budgeted single-source shortest-path search over a scene.
///
/// The scratch state lives in a side table owned by the search, so several
/// searches may exist over the same scene at once.
#[derive(Debug)]
pub struct PathSearch {
    scratch: BTreeMap<TileId, TileScratch>,
    start: Option<TileId>,
    cost: Box<dyn CostModel>,
}

impl Default for PathSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PathSearch {
    /// Create a search pricing steps by Euclidean distance.
    pub fn new() -> Self {
        Self::with_cost_model(Box::new(EuclideanCost))
    }

    /// Create a search with a custom cost model.
    pub fn with_cost_model(cost: Box<dyn CostModel>) -> Self {
        Self {
            scratch: BTreeMap::new(),
            start: None,
            cost,
        }
    }

    /// Reset the scratch state of one tile.
    pub fn reset_path(&mut self, tile: TileId) {
        self.scratch.insert(tile, TileScratch::default());
    }

    /// Reset the scratch state of every tile in `scene` and forget any other.
    pub fn reset(&mut self, scene: &Scene) {
        self.scratch.clear();
        self.start = None;
        for id in scene.tile_ids() {
            self.reset_path(id);
        }
    }

    /// Run a search, replacing the results of any previous one.
    ///
    /// The origin is always usable even if it is steep or enclosed; only
    /// outgoing steps are filtered. A step to a neighbour is taken when the
    /// neighbour is traversable, the capsule sweep between pawn anchors is
    /// clear, and the running cost stays within budget.
    pub fn run<O>(&mut self, scene: &Scene, request: &SearchRequest, oracle: &O) -> PathResult<SearchSummary>
    where
        O: ObstructionOracle + ?Sized,
    {
        let budget = request.budget;
        if !(budget.is_finite() && budget >= 0.0) {
            return Err(PathError::InvalidBudget(budget));
        }
        if scene.get_tile(request.start).is_none() {
            return Err(PathError::UnknownStart(request.start));
        }
        let profile = request
            .profile
            .as_ref()
            .unwrap_or_else(|| scene.default_profile());

        self.reset(scene);
        self.start = Some(request.start);
        self.entry(request.start).distance = 0.0;

        let mut frontier = BinaryHeap::new();
        let mut sequence: u64 = 0;
        let mut sweeps = 0;
        frontier.push(Reverse((OrderedFloat(0.0_f32), sequence, request.start)));

        while let Some(Reverse((OrderedFloat(distance), _, current))) = frontier.pop() {
            let state = self.entry(current);
            if state.visited || distance > state.distance {
                continue;
            }
            state.visited = true;

            let Some(tile) = scene.get_tile(current) else {
                continue;
            };
            let from = tile.pawn_anchor();

            for &next in scene.neighbours(current) {
                let Some(neighbour) = scene.get_tile(next) else {
                    continue;
                };
                if self.visited(next) || !neighbour.traversable_for(profile) {
                    continue;
                }
                let candidate = distance + self.cost.edge_cost(tile, neighbour);
                if !candidate.is_finite() || candidate > budget || candidate >= self.distance(next) {
                    continue;
                }
                sweeps += 1;
                if scene.obstructed(from, neighbour.pawn_anchor(), &request.capsule, oracle) {
                    continue;
                }
                let entry = self.entry(next);
                entry.distance = candidate;
                entry.predecessor = Some(current);
                sequence += 1;
                frontier.push(Reverse((OrderedFloat(candidate), sequence, next)));
            }
        }

        let summary = self.summary(sweeps);
        debug!(
            target: "ng_pathing::search",
            start = %request.start,
            budget,
            reached = summary.reached,
            sweeps,
            "search finished"
        );
        Ok(summary)
    }

    /// Run a search and return the path to `target`.
    pub fn route<O>(
        &mut self,
        scene: &Scene,
        request: &SearchRequest,
        target: TileId,
        oracle: &O,
    ) -> PathResult<Path>
    where
        O: ObstructionOracle + ?Sized,
    {
        self.run(scene, request, oracle)?;
        self.path_to(target).ok_or(PathError::NoPath {
            from: request.start,
            to: target,
        })
    }

    fn entry(&mut self, tile: TileId) -> &mut TileScratch {
        self.scratch.entry(tile).or_default()
    }

    fn summary(&self, sweeps: usize) -> SearchSummary {
        let reached: Vec<f32> = self
            .scratch
            .values()
            .filter(|s| s.visited)
            .map(|s| s.distance)
            .collect();
        SearchSummary {
            reached: reached.len(),
            farthest: reached.iter().copied().fold(0.0, f32::max),
            sweeps,
        }
    }

    /// The origin of the last search.
    pub fn start(&self) -> Option<TileId> {
        self.start
    }

    /// Scratch state of a tile. Tiles the search never saw read as reset.
    pub fn scratch(&self, tile: TileId) -> TileScratch {
        self.scratch.get(&tile).copied().unwrap_or_default()
    }

    /// Travel cost to a tile; infinite when unreachable within budget.
    pub fn distance(&self, tile: TileId) -> f32 {
        self.scratch(tile).distance
    }

    /// The tile a reached tile is entered from.
    pub fn predecessor(&self, tile: TileId) -> Option<TileId> {
        self.scratch(tile).predecessor
    }

    /// Whether the tile's distance is final.
    pub fn visited(&self, tile: TileId) -> bool {
        self.scratch(tile).visited
    }

    /// Return `true` if the last search reached `tile` within budget.
    pub fn is_reachable(&self, tile: TileId) -> bool {
        let state = self.scratch(tile);
        state.visited && state.distance.is_finite()
    }

    /// Reached tiles with their distances, nearest first.
    pub fn reachable(&self) -> Vec<(TileId, f32)> {
        let mut reached: Vec<(TileId, f32)> = self
            .scratch
            .iter()
            .filter(|(_, s)| s.visited && s.distance.is_finite())
            .map(|(id, s)| (*id, s.distance))
            .collect();
        reached.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        reached
    }

    /// Follow predecessors from `target` back to the origin.
    pub fn path_to(&self, target: TileId) -> Option<Path> {
        if !self.is_reachable(target) {
            return None;
        }
        let mut tiles = vec![target];
        let mut node = target;
        while let Some(prev) = self.predecessor(node) {
            if tiles.len() > self.scratch.len() {
                return None;
            }
            tiles.push(prev);
            node = prev;
        }
        tiles.reverse();
        Some(Path {
            tiles,
            cost: self.distance(target),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ClimbCost;
    use ng_core::{
        NoObstruction, Obstacle, ObstacleField, Rotator, SweepQuery, TileSpec, Vec2, Vec3,
    };

    /// A -- B -- C, 200 apart, 200 x 200 footprints.
    fn collinear() -> (Scene, TileId, TileId, TileId) {
        let mut scene = Scene::new("Test");
        let a = scene.add_tile(TileSpec::at(Vec3::ZERO).named("A")).unwrap();
        let b = scene
            .add_tile(TileSpec::at(Vec3::new(200.0, 0.0, 0.0)).named("B"))
            .unwrap();
        let c = scene
            .add_tile(TileSpec::at(Vec3::new(400.0, 0.0, 0.0)).named("C"))
            .unwrap();
        (scene, a, b, c)
    }

    fn capsule() -> CollisionCapsule {
        CollisionCapsule::new(20.0, 40.0)
    }

    #[test]
    fn generous_budget_reaches_the_whole_line() {
        let (scene, a, b, c) = collinear();
        let mut search = PathSearch::new();
        let summary = search
            .run(&scene, &SearchRequest::new(a, 500.0).with_capsule(capsule()), &NoObstruction)
            .unwrap();

        assert_eq!(summary.reached, 3);
        assert!((search.distance(a) - 0.0).abs() < f32::EPSILON);
        assert!((search.distance(b) - 200.0).abs() < 1e-3);
        assert!((search.distance(c) - 400.0).abs() < 1e-3);
        assert_eq!(search.predecessor(c), Some(b));
        assert_eq!(search.predecessor(a), None);
    }

    #[test]
    fn tight_budget_reaches_only_the_origin() {
        let (scene, a, b, c) = collinear();
        let mut search = PathSearch::new();
        let summary = search
            .run(&scene, &SearchRequest::new(a, 150.0), &NoObstruction)
            .unwrap();

        assert_eq!(summary.reached, 1);
        assert_eq!(search.reachable(), vec![(a, 0.0)]);
        assert!(search.distance(b).is_infinite());
        assert!(search.distance(c).is_infinite());
        assert!(!search.visited(b));
    }

    #[test]
    fn blocked_step_cuts_off_everything_behind_it() {
        let (scene, a, b, c) = collinear();
        let wall: ObstacleField =
            [Obstacle::new(Vec3::new(100.0, 0.0, 0.0), Vec3::new(5.0, 150.0, 150.0))]
                .into_iter()
                .collect();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0).with_capsule(capsule()), &wall)
            .unwrap();

        assert!(!search.is_reachable(b));
        assert!(!search.is_reachable(c));
        assert!(search.path_to(c).is_none());
    }

    #[test]
    fn oracle_sees_offset_capsule_between_anchors() {
        let (scene, a, _, _) = collinear();
        let lifted = capsule().with_offset(Vec3::new(0.0, 0.0, 40.0));
        let seen = std::cell::RefCell::new(Vec::new());
        let spy = |q: &SweepQuery| {
            seen.borrow_mut().push((q.start, q.end));
            false
        };
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 250.0).with_capsule(lifted), &spy)
            .unwrap();

        assert_eq!(
            seen.borrow().as_slice(),
            &[(Vec3::new(0.0, 0.0, 40.0), Vec3::new(200.0, 0.0, 40.0))]
        );
    }

    #[test]
    fn steep_tiles_are_skipped_but_steep_origin_is_usable() {
        // Tilting moves the corners, so widen the contact threshold.
        let config = ng_core::NavConfig::default().with_adjacency_threshold(150.0);
        let mut scene = Scene::with_config("Hill", config);
        let cliff = scene
            .add_tile(TileSpec::at(Vec3::ZERO).with_rotation(Rotator::new(0.0, 0.0, 60.0)))
            .unwrap();
        let flat = scene.add_tile(TileSpec::at(Vec3::new(200.0, 0.0, 0.0))).unwrap();
        let mut search = PathSearch::new();

        search
            .run(&scene, &SearchRequest::new(cliff, 500.0), &NoObstruction)
            .unwrap();
        assert!(search.is_reachable(flat));

        search
            .run(&scene, &SearchRequest::new(flat, 500.0), &NoObstruction)
            .unwrap();
        assert!(!search.is_reachable(cliff));
    }

    #[test]
    fn enclosed_origin_still_counts_as_reached() {
        let (scene, a, b, _) = collinear();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0), &|_: &SweepQuery| true)
            .unwrap();
        assert_eq!(search.reachable(), vec![(a, 0.0)]);
        assert!(!search.is_reachable(b));
    }

    #[test]
    fn disconnected_tile_reaches_only_itself() {
        let mut scene = Scene::new("Island");
        let lonely = scene.add_tile(TileSpec::at(Vec3::ZERO)).unwrap();
        let far = scene.add_tile(TileSpec::at(Vec3::new(5000.0, 0.0, 0.0))).unwrap();
        let mut search = PathSearch::new();
        let summary = search
            .run(&scene, &SearchRequest::new(lonely, 1e6), &NoObstruction)
            .unwrap();
        assert_eq!(summary.reached, 1);
        assert!(!search.is_reachable(far));
        assert_eq!(search.path_to(lonely).unwrap().steps(), 0);
    }

    #[test]
    fn shortest_route_is_preferred() {
        // 3 x 3 grid; the diagonal is shorter than going around the edge.
        let mut scene = Scene::new("Grid");
        let ids = scene
            .add_grid(&ng_core::GridSpec::new(Vec3::ZERO, 3, 3))
            .unwrap();
        let (corner, centre, far) = (ids[0], ids[4], ids[8]);
        let mut search = PathSearch::new();
        let path = search
            .route(&scene, &SearchRequest::new(corner, 1000.0), far, &NoObstruction)
            .unwrap();

        assert_eq!(path.tiles, vec![corner, centre, far]);
        assert!((path.cost - 2.0 * 200.0 * std::f32::consts::SQRT_2).abs() < 1e-2);
    }

    #[test]
    fn route_reports_unreachable_targets() {
        let (scene, a, _, c) = collinear();
        let mut search = PathSearch::new();
        let result = search.route(&scene, &SearchRequest::new(a, 300.0), c, &NoObstruction);
        assert!(matches!(result, Err(PathError::NoPath { .. })));
    }

    #[test]
    fn invalid_requests_leave_state_untouched() {
        let (scene, a, b, _) = collinear();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0), &NoObstruction)
            .unwrap();

        let bad_budget = search.run(&scene, &SearchRequest::new(a, f32::NAN), &NoObstruction);
        assert!(matches!(bad_budget, Err(PathError::InvalidBudget(_))));
        let bad_start = search.run(&scene, &SearchRequest::new(TileId(77), 500.0), &NoObstruction);
        assert!(matches!(bad_start, Err(PathError::UnknownStart(_))));

        assert!(search.is_reachable(b));
        assert_eq!(search.start(), Some(a));
    }

    #[test]
    fn reset_path_is_idempotent() {
        let (scene, a, b, _) = collinear();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0), &NoObstruction)
            .unwrap();

        search.reset_path(b);
        let once = search.scratch(b);
        search.reset_path(b);
        assert_eq!(search.scratch(b), once);
        assert_eq!(once, TileScratch::default());
        assert!(search.distance(a).is_finite());
    }

    #[test]
    fn reset_clears_every_tile() {
        let (scene, a, b, c) = collinear();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0), &NoObstruction)
            .unwrap();
        search.reset(&scene);
        for id in [a, b, c] {
            assert_eq!(search.scratch(id), TileScratch::default());
        }
        assert_eq!(search.start(), None);
    }

    #[test]
    fn rerun_does_not_leak_previous_results() {
        let (scene, a, _, c) = collinear();
        let mut search = PathSearch::new();
        search
            .run(&scene, &SearchRequest::new(a, 500.0), &NoObstruction)
            .unwrap();
        search
            .run(&scene, &SearchRequest::new(c, 100.0), &NoObstruction)
            .unwrap();
        assert!(!search.is_reachable(a));
        assert_eq!(search.reachable(), vec![(c, 0.0)]);
    }

    #[test]
    fn profile_without_walking_stays_put() {
        let (scene, a, _, _) = collinear();
        let mut search = PathSearch::new();
        let flyer = MovementProfile::walking(45.0).with_modes(vec![ng_core::MovementMode::Flying]);
        let summary = search
            .run(&scene, &SearchRequest::new(a, 500.0).with_profile(flyer), &NoObstruction)
            .unwrap();
        assert_eq!(summary.reached, 1);
    }

    #[test]
    fn custom_cost_model_changes_distances() {
        let mut scene = Scene::new("Stairs");
        let bottom = scene.add_tile(TileSpec::at(Vec3::ZERO)).unwrap();
        let top = scene
            .add_tile(
                TileSpec::at(Vec3::new(200.0, 0.0, 10.0)).with_half_extent(Vec2::new(100.0, 100.0)),
            )
            .unwrap();
        let mut search = PathSearch::with_cost_model(Box::new(ClimbCost { uphill_factor: 10.0 }));
        search
            .run(&scene, &SearchRequest::new(bottom, 1000.0), &NoObstruction)
            .unwrap();
        let flat_cost = Vec3::ZERO.distance(Vec3::new(200.0, 0.0, 10.0));
        assert!((search.distance(top) - (flat_cost + 100.0)).abs() < 1e-2);
    }
}
