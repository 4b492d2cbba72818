//! Background snapshotting of a terrain oracle.
//!
//! [`spawn_bake`] samples a source oracle on a dedicated worker thread and
//! publishes the result into a [`BakedTerrain`]. Until the worker finishes,
//! the baked terrain reports `is_world_generated() == false`; completion is
//! additionally signalled on a channel so consumers can switch state without
//! polling the oracle.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crossbeam_channel::{Receiver, bounded};

use crate::{BiomeId, SampledTerrain, TerrainOracle};

/// A terrain oracle that becomes available once its background bake completes.
#[derive(Debug, Default)]
pub struct BakedTerrain {
    snapshot: OnceLock<SampledTerrain>,
}

impl BakedTerrain {
    /// The baked samples, once available.
    pub fn snapshot(&self) -> Option<&SampledTerrain> {
        self.snapshot.get()
    }
}

impl TerrainOracle for BakedTerrain {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.snapshot.get().map_or(0.0, |s| s.height_at(x, z))
    }

    fn is_navigable_at(&self, x: f32, z: f32) -> bool {
        self.snapshot.get().is_some_and(|s| s.is_navigable_at(x, z))
    }

    fn biome_at(&self, x: f32, z: f32) -> BiomeId {
        self.snapshot
            .get()
            .map_or(BiomeId::default(), |s| s.biome_at(x, z))
    }

    fn is_world_generated(&self) -> bool {
        self.snapshot.get().is_some()
    }
}

/// Handle to an in-progress bake.
pub struct TerrainBake {
    /// The oracle that will hold the baked samples.
    pub terrain: Arc<BakedTerrain>,
    /// Receives one message when the bake has completed.
    pub ready: Receiver<()>,
}

/// Samples `source` on a `width × length` grid at `spacing` on a worker thread.
///
/// Fails only if the worker thread cannot be spawned.
pub fn spawn_bake(
    source: Arc<dyn TerrainOracle>,
    width: usize,
    length: usize,
    spacing: f32,
) -> std::io::Result<TerrainBake> {
    let terrain = Arc::new(BakedTerrain::default());
    let (tx, ready) = bounded(1);
    let target = Arc::clone(&terrain);

    std::thread::Builder::new()
        .name("terrain-bake".into())
        .spawn(move || {
            let start = Instant::now();
            let snapshot = SampledTerrain::from_fn(width, length, spacing, |x, z| {
                (
                    source.height_at(x, z),
                    source.is_navigable_at(x, z),
                    source.biome_at(x, z),
                )
            });
            if target.snapshot.set(snapshot).is_err() {
                tracing::warn!("terrain bake finished twice; keeping the first snapshot");
            }
            tracing::info!(
                "Baked {}x{} terrain samples in {:.1} ms",
                width,
                length,
                start.elapsed().as_secs_f64() * 1000.0
            );
            let _ = tx.send(());
        })?;

    Ok(TerrainBake { terrain, ready })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_unbaked_terrain_is_not_generated() {
        let terrain = BakedTerrain::default();
        assert!(!terrain.is_world_generated());
        assert!(!terrain.is_navigable_at(0.0, 0.0));
        assert_eq!(terrain.height_at(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_bake_signals_completion() {
        let mut source = SampledTerrain::flat(8, 8, 1.0, 2.0);
        source.set_navigable(3, 3, false);
        let bake = spawn_bake(Arc::new(source), 8, 8, 1.0).unwrap();

        bake.ready.recv_timeout(Duration::from_secs(10)).unwrap();

        assert!(bake.terrain.is_world_generated());
        assert_eq!(bake.terrain.height_at(1.0, 1.0), 2.0);
        assert!(!bake.terrain.is_navigable_at(3.0, 3.0));
    }
}
