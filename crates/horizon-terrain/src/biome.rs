//! Biome identifiers and the traversal cost table used by navigation.

use rustc_hash::FxHashMap;

/// Compact biome identifier returned by the terrain oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u8);

impl BiomeId {
    /// Open flat land.
    pub const PLAIN: Self = Self(0);
    /// Broken, rocky ground.
    pub const RUGGED: Self = Self(1);
    /// Canyon floors.
    pub const CANYON: Self = Self(2);
    /// Shallow reef shelves.
    pub const REEF: Self = Self(3);

    /// Human-readable name for the built-in biomes.
    pub fn name(self) -> &'static str {
        match self {
            Self::PLAIN => "plain",
            Self::RUGGED => "rugged",
            Self::CANYON => "canyon",
            Self::REEF => "reef",
            _ => "unknown",
        }
    }
}

/// Traversal cost per biome. Unknown biomes use the default cost.
///
/// Costs are clamped to at least 1.0 so the Euclidean heuristic stays
/// admissible.
#[derive(Clone, Debug)]
pub struct BiomeCostTable {
    costs: FxHashMap<BiomeId, f32>,
    default_cost: f32,
}

impl BiomeCostTable {
    /// Creates a table where every biome costs `default_cost`.
    pub fn uniform(default_cost: f32) -> Self {
        Self {
            costs: FxHashMap::default(),
            default_cost: default_cost.max(1.0),
        }
    }

    /// Sets the cost of a biome, builder style.
    pub fn with_cost(mut self, biome: BiomeId, cost: f32) -> Self {
        self.set_cost(biome, cost);
        self
    }

    /// Sets the cost of a biome.
    pub fn set_cost(&mut self, biome: BiomeId, cost: f32) {
        self.costs.insert(biome, cost.max(1.0));
    }

    /// Traversal cost for `biome`.
    pub fn cost(&self, biome: BiomeId) -> f32 {
        self.costs.get(&biome).copied().unwrap_or(self.default_cost)
    }
}

impl Default for BiomeCostTable {
    fn default() -> Self {
        Self::uniform(1.0)
            .with_cost(BiomeId::PLAIN, 1.0)
            .with_cost(BiomeId::RUGGED, 3.0)
            .with_cost(BiomeId::CANYON, 1.5)
            .with_cost(BiomeId::REEF, 2.0)
    }
}
