//! Planner configuration: a flat record of tunable parameters, optionally
//! loaded from an INI file with `configparser` (the crate and file format
//! the teacher's own `src/config.rs` uses). Unlike that module's global
//! `Lazy<Mutex<Config>>`, this config is an owned value threaded explicitly
//! through the planner — spec.md §5 requires the planner itself to carry no
//! global mutable state.

use configparser::ini::Ini;
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickDirection {
    /// Perpendicular to the line's tangent at the note's time.
    Perpendicular,
    /// Parallel to the line's tangent at the note's time.
    Parallel,
}

#[derive(Debug, Clone, Copy)]
pub struct PlannerConfig {
    /// Pre-roll before the note time where a flick's DOWN is emitted
    /// (negative: before the note).
    pub flick_start_ms: i32,
    /// Post-roll after note time where the flick UP is emitted.
    pub flick_end_ms: i32,
    pub flick_direction: FlickDirection,
    /// Spacing between MOVE samples for holds/drags.
    pub sample_delay_ms: u32,
    /// Reserved, currently no-op — kept so config files that already set
    /// these don't fail to parse.
    pub target_score: Option<f64>,
    pub strict_mode: bool,
    /// Radical planner policy on pointer exhaustion: drop the note (with a
    /// warning) instead of failing outright.
    pub continue_when_failed: bool,
    /// Hard cap on simultaneous pointers.
    pub max_pointers: u32,
    /// Gap after a TAP's DOWN before its UP.
    pub tap_release_ms: u32,
    /// Radical planner: max distance between a free pointer's last release
    /// position and a new note's start for that pointer to be reused,
    /// rather than a fresh one allocated.
    pub reuse_distance: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            flick_start_ms: -17,
            flick_end_ms: 17,
            flick_direction: FlickDirection::Perpendicular,
            sample_delay_ms: 10,
            target_score: None,
            strict_mode: false,
            continue_when_failed: false,
            max_pointers: 10,
            tap_release_ms: 1,
            reuse_distance: 64.0,
        }
    }
}

impl PlannerConfig {
    pub fn load_ini(path: &str) -> Self {
        let default = PlannerConfig::default();
        if !std::path::Path::new(path).exists() {
            info!("'{path}' not found, using built-in planner defaults.");
            return default;
        }

        let mut conf = Ini::new();
        match conf.load(path) {
            Ok(_) => {
                let direction = conf
                    .get("Planner", "FlickDirection")
                    .and_then(|v| v.parse::<u8>().ok())
                    .map(|v| if v == 1 { FlickDirection::Parallel } else { FlickDirection::Perpendicular })
                    .unwrap_or(default.flick_direction);

                let cfg = PlannerConfig {
                    flick_start_ms: conf.getint("Planner", "FlickStartMs").ok().flatten().unwrap_or(default.flick_start_ms as i64) as i32,
                    flick_end_ms: conf.getint("Planner", "FlickEndMs").ok().flatten().unwrap_or(default.flick_end_ms as i64) as i32,
                    flick_direction: direction,
                    sample_delay_ms: conf.getuint("Planner", "SampleDelayMs").ok().flatten().unwrap_or(default.sample_delay_ms as u64) as u32,
                    target_score: conf.getfloat("Planner", "TargetScore").ok().flatten(),
                    strict_mode: conf.getbool("Planner", "StrictMode").ok().flatten().unwrap_or(default.strict_mode),
                    continue_when_failed: conf.getbool("Planner", "ContinueWhenFailed").ok().flatten().unwrap_or(default.continue_when_failed),
                    max_pointers: conf.getuint("Planner", "MaxPointers").ok().flatten().unwrap_or(default.max_pointers as u64) as u32,
                    tap_release_ms: conf.getuint("Planner", "TapReleaseMs").ok().flatten().unwrap_or(default.tap_release_ms as u64) as u32,
                    reuse_distance: conf.getfloat("Planner", "ReuseDistance").ok().flatten().unwrap_or(default.reuse_distance),
                };
                info!("Planner configuration loaded from '{path}'.");
                cfg
            }
            Err(e) => {
                warn!("Failed to load '{path}': {e}. Using built-in planner defaults.");
                default
            }
        }
    }

    pub fn save_ini(&self, path: &str) -> std::io::Result<()> {
        let mut conf = Ini::new();
        conf.set("Planner", "FlickStartMs", Some(self.flick_start_ms.to_string()));
        conf.set("Planner", "FlickEndMs", Some(self.flick_end_ms.to_string()));
        conf.set(
            "Planner",
            "FlickDirection",
            Some((if self.flick_direction == FlickDirection::Parallel { "1" } else { "0" }).to_string()),
        );
        conf.set("Planner", "SampleDelayMs", Some(self.sample_delay_ms.to_string()));
        if let Some(score) = self.target_score {
            conf.set("Planner", "TargetScore", Some(score.to_string()));
        }
        conf.set("Planner", "StrictMode", Some((if self.strict_mode { "1" } else { "0" }).to_string()));
        conf.set(
            "Planner",
            "ContinueWhenFailed",
            Some((if self.continue_when_failed { "1" } else { "0" }).to_string()),
        );
        conf.set("Planner", "MaxPointers", Some(self.max_pointers.to_string()));
        conf.set("Planner", "TapReleaseMs", Some(self.tap_release_ms.to_string()));
        conf.set("Planner", "ReuseDistance", Some(self.reuse_distance.to_string()));
        conf.write(path)
    }
}
