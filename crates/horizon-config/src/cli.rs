//! Command-line argument parsing for the Horizon runtime.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, SearchAlgorithm};

/// Horizon command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "horizon", about = "Horizon world streaming runtime")]
pub struct CliArgs {
    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// World size in chunks along both axes.
    #[arg(long)]
    pub world_chunks: Option<u32>,

    /// Chunk edge length in world units.
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// Pathfinding algorithm.
    #[arg(long, value_enum)]
    pub algorithm: Option<SearchAlgorithm>,

    /// Terrain noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of simulation ticks to run (demo only).
    #[arg(long)]
    pub ticks: Option<u32>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(rd) = args.render_distance {
            self.streaming.render_distance = rd;
        }
        if let Some(n) = args.world_chunks {
            self.world.world_chunks_x = n;
            self.world.world_chunks_z = n;
        }
        if let Some(size) = args.chunk_size {
            self.world.chunk_size = size;
        }
        if let Some(algorithm) = args.algorithm {
            self.navigation.algorithm = algorithm;
        }
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            render_distance: Some(1),
            world_chunks: Some(4),
            algorithm: Some(SearchAlgorithm::Dijkstra),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.streaming.render_distance, 1);
        assert_eq!(config.world.world_chunks_x, 4);
        assert_eq!(config.world.world_chunks_z, 4);
        assert_eq!(config.navigation.algorithm, SearchAlgorithm::Dijkstra);
        // Non-overridden fields retain defaults
        assert_eq!(config.world.chunk_size, 16);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "horizon",
            "--render-distance",
            "2",
            "--algorithm",
            "dijkstra",
            "--ticks",
            "30",
        ]);
        assert_eq!(args.render_distance, Some(2));
        assert_eq!(args.algorithm, Some(SearchAlgorithm::Dijkstra));
        assert_eq!(args.ticks, Some(30));
        assert!(args.config.is_none());
    }
}
