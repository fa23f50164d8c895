use clap::Parser;
use std::path::PathBuf;

/// Command line of the game server.
#[derive(Debug, Clone, Parser)]
#[command(name = "fetchd", about = "Multiplayer lost-and-found game server")]
pub struct Args {
    /// Path to the JSON game config.
    #[arg(long, short = 'c', value_name = "file")]
    pub config_file: PathBuf,
    /// Root directory of the static frontend files.
    #[arg(long, short = 'w', value_name = "dir")]
    pub www_root: PathBuf,
    /// Internal tick period in milliseconds. Zero disables the internal
    /// timer and enables the external tick endpoint instead.
    #[arg(long, short = 't', value_name = "milliseconds", default_value_t = 0)]
    pub tick_period: u64,
    /// Spawn dogs at random road positions instead of the first road start.
    #[arg(long)]
    pub randomize_spawn_points: bool,
    /// Path of the durable state snapshot.
    #[arg(long, value_name = "file")]
    pub state_file: Option<PathBuf>,
    /// Game-time period between automatic snapshots, in milliseconds.
    #[arg(long, value_name = "milliseconds", default_value_t = 0)]
    pub save_state_period: u64,
}
