//! CLI configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Shipped content, relative to this crate.
const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../game/content/data");

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub data_dir: PathBuf,
    pub maze: String,
    pub ticks: u32,
    pub seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(BUNDLED_DATA_DIR),
            maze: "arena".to_string(),
            ticks: 240,
            seed: None,
            log_dir: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MAZE_DATA_DIR` - Content directory (default: bundled data)
    /// - `MAZE_MAZE` - Maze file stem under `mazes/` (default: arena)
    /// - `MAZE_TICKS` - Ticks to run (default: 240, four seconds at 60 Hz)
    /// - `MAZE_SEED` - Overrides the seed from `config.toml`
    /// - `MAZE_LOG_DIR` - Directory for the log file (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("MAZE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(maze) = env::var("MAZE_MAZE") {
            config.maze = maze;
        }
        if let Some(ticks) = read_env::<u32>("MAZE_TICKS") {
            config.ticks = ticks.max(1);
        }
        config.seed = read_env::<u64>("MAZE_SEED");
        config.log_dir = env::var("MAZE_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    /// Log directory, falling back to the platform cache directory.
    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("", "", "maze")
                .map(|dirs| dirs.cache_dir().join("logs"))
                .unwrap_or_else(|| PathBuf::from("/tmp/maze/logs"))
        })
    }
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}
