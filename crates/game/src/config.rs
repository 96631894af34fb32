//! Demo configuration (chain shape, patrol layout). Loaded from serpent.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Persistent demo settings. Loaded from `serpent.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total number of body segments, head included.
    #[serde(default = "default_segment_count")]
    pub segment_count: usize,
    /// Target spacing between neighboring segments.
    #[serde(default = "default_separation")]
    pub separation: f32,
    /// Axis the body extends along at spawn.
    #[serde(default = "default_axis")]
    pub axis: [f32; 3],
    /// Head travel speed in units/sec.
    #[serde(default = "default_head_speed")]
    pub head_speed: f32,
    /// Distance at which a waypoint counts as reached.
    #[serde(default = "default_reach_distance")]
    pub reach_distance: f32,
    /// Number of patrol waypoints to scatter.
    #[serde(default = "default_waypoint_count")]
    pub waypoint_count: usize,
    /// Half-extent of the square the waypoints are scattered in.
    #[serde(default = "default_waypoint_spread")]
    pub waypoint_spread: f32,
    /// Number of frames to simulate.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Toggle navigation and reverse the chain every this many frames
    /// (0 = never).
    #[serde(default)]
    pub reverse_interval: u32,
    /// Seed for the waypoint scatter.
    #[serde(default)]
    pub seed: u64,
}

fn default_segment_count() -> usize {
    40
}
fn default_separation() -> f32 {
    1.0
}
fn default_axis() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}
fn default_head_speed() -> f32 {
    6.0
}
fn default_reach_distance() -> f32 {
    5.0
}
fn default_waypoint_count() -> usize {
    6
}
fn default_waypoint_spread() -> f32 {
    40.0
}
fn default_frames() -> u32 {
    900
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            segment_count: default_segment_count(),
            separation: default_separation(),
            axis: default_axis(),
            head_speed: default_head_speed(),
            reach_distance: default_reach_distance(),
            waypoint_count: default_waypoint_count(),
            waypoint_spread: default_waypoint_spread(),
            frames: default_frames(),
            reverse_interval: 0,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Load config from `serpent.ron`, writing a default file on the first
    /// run so there is something to tweak. An existing file is never
    /// overwritten, even when it fails to parse.
    pub fn load_or_init() -> Self {
        Self::load_or_init_at(&config_path())
    }

    fn load_or_init_at(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            config.save_at(path);
            return config;
        }
        Self::load_at(path)
    }

    fn load_at(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    fn save_at(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("serpent.ron")
}
