use std::fmt;

use ng_core::Tile;

/// Prices a single step between two neighbouring tiles.
///
/// Costs must be non-negative. A non-finite cost makes the step unusable.
pub trait CostModel: fmt::Debug {
    /// Cost of moving from `from` to `to`.
    fn edge_cost(&self, from: &Tile, to: &Tile) -> f32;
}

/// Straight-line distance between pawn anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanCost;

impl CostModel for EuclideanCost {
    fn edge_cost(&self, from: &Tile, to: &Tile) -> f32 {
        from.pawn_anchor().distance(to.pawn_anchor())
    }
}

/// Euclidean distance plus a surcharge for every unit climbed.
#[derive(Debug, Clone, Copy)]
pub struct ClimbCost {
    /// Extra cost per unit of height gained. Descending is free.
    pub uphill_factor: f32,
}

impl CostModel for ClimbCost {
    fn edge_cost(&self, from: &Tile, to: &Tile) -> f32 {
        let (a, b) = (from.pawn_anchor(), to.pawn_anchor());
        a.distance(b) + self.uphill_factor * (b.z - a.z).max(0.0)
    }
}
