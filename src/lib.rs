use std::{
    fmt::Display,
    path::PathBuf,
    time::Duration,
};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;

pub use config::Settings;
pub use crate::core::{Color, FlyingToaster, Model, Scene};
pub use error::{Result, ToasterError};
pub use pipeline::{Pipeline, RenderOptions};

pub const DEFAULT_WIDTH: usize = 1280;
pub const DEFAULT_HEIGHT: usize = 720;
pub const DEFAULT_SETTINGS_FILE: &str = "flying_toasters.json";

/// How many recent frames the averages are taken over.
const METRICS_WINDOW: usize = 120;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayTarget {
    Window,
    Terminal,
    /// Render headless and write the last frame to a PNG.
    Frame {
        frames: usize,
        out: PathBuf,
        width: usize,
        height: usize,
    },
}

pub struct Metrics {
    pub frame_time: Duration,
    pub fps_counter: u32,
    pub current_fps: f32,
    pub frame_times: Vec<f32>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
impl Metrics {
    pub fn new() -> Self {
        Self {
            frame_time: Duration::from_secs_f32(1.0 / 60.0),
            fps_counter: 0,
            current_fps: 0.0,
            frame_times: Vec::with_capacity(METRICS_WINDOW),
        }
    }

    pub fn update(&mut self, frame_delta: Duration) {
        self.fps_counter += 1;
        if self.frame_times.len() == METRICS_WINDOW {
            self.frame_times.remove(0);
        }
        self.frame_times.push(frame_delta.as_secs_f32() * 1000.0);

        let avg_ms = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
        self.frame_time = Duration::from_secs_f32(avg_ms / 1000.0);
        self.current_fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
    }
}
impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FPS: {:.2} | Avg: {:.2}ms | Min: {:.2}ms | Max: {:.2}ms",
            self.current_fps,
            self.frame_time.as_secs_f32() * 1000.0,
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::min)
                .unwrap_or(0.0),
            self.frame_times
                .iter()
                .copied()
                .reduce(f32::max)
                .unwrap_or(0.0)
        )
    }
}

/// Everything the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub target: DisplayTarget,
    pub settings_path: PathBuf,
    pub save_settings: bool,
    pub toasters: Option<usize>,
    pub no_scanlines: bool,
    pub no_glow: bool,
    pub no_trails: bool,
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
}

impl Invocation {
    /// Layer the command line flags over stored settings.
    pub fn apply(&self, settings: Settings) -> Settings {
        Settings {
            toaster_count: self.toasters.unwrap_or(settings.toaster_count),
            show_scanlines: settings.show_scanlines && !self.no_scanlines,
            show_glow: settings.show_glow && !self.no_glow,
            show_trails: settings.show_trails && !self.no_trails,
        }
        .clamped()
    }
}

pub fn create_clap_command() -> Command {
    Command::new("flying_toasters")
        .about("Wireframe flying toasters")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("toasters")
                .short('n')
                .long("toasters")
                .value_name("COUNT")
                .help("How many toasters to fly (1-12)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("no-scanlines")
                .long("no-scanlines")
                .help("Turn off the scanline overlay")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-glow")
                .long("no-glow")
                .help("Turn off the corner glow")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-trails")
                .long("no-trails")
                .help("Clear every frame instead of leaving motion trails")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("settings")
                .short('c')
                .long("settings")
                .value_name("FILE")
                .help("Settings file to read (and write with --save-settings)")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("save-settings")
                .long("save-settings")
                .help("Write the effective settings back to the settings file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed the random flight paths for a reproducible run")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("How chatty the log is")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"]),
        )
        .subcommand(
            Command::new("run")
                .about("Fly toasters in a window or the terminal")
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_name("MODE")
                        .help("Specify the mode ('window', 'terminal', 'w', or 't')")
                        .value_parser(["window", "terminal", "w", "t"]),
                ),
        )
        .subcommand(
            Command::new("frame")
                .about("Render headless and save the final frame as a PNG")
                .arg(
                    Arg::new("frames")
                        .long("frames")
                        .value_name("N")
                        .help("Number of frames to simulate")
                        .default_value("60")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("out")
                        .short('o')
                        .long("out")
                        .value_name("FILE")
                        .help("Where to write the PNG")
                        .default_value("toasters.png")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_name("PX")
                        .default_value("800")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .value_name("PX")
                        .default_value("600")
                        .value_parser(value_parser!(usize)),
                ),
        )
}

pub fn handle_clap_matches(matches: &ArgMatches) -> Invocation {
    let target = match matches.subcommand() {
        Some(("run", sub)) => match sub.get_one::<String>("mode").map(|s| s.as_str()) {
            Some("terminal" | "t") => DisplayTarget::Terminal,
            _ => DisplayTarget::Window,
        },
        Some(("frame", sub)) => DisplayTarget::Frame {
            frames: sub
                .get_one::<u64>("frames")
                .map_or(60, |&n| n as usize),
            out: sub
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("toasters.png")),
            width: sub.get_one::<usize>("width").copied().unwrap_or(800),
            height: sub.get_one::<usize>("height").copied().unwrap_or(600),
        },
        // Default behavior when no subcommand is provided
        _ => DisplayTarget::Window,
    };

    Invocation {
        target,
        settings_path: matches
            .get_one::<PathBuf>("settings")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE)),
        save_settings: matches.get_flag("save-settings"),
        toasters: matches.get_one::<usize>("toasters").copied(),
        no_scanlines: matches.get_flag("no-scanlines"),
        no_glow: matches.get_flag("no-glow"),
        no_trails: matches.get_flag("no-trails"),
        seed: matches.get_one::<u64>("seed").copied(),
        log_level: matches
            .get_one::<String>("log-level")
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Info),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Invocation {
        let matches = create_clap_command()
            .try_get_matches_from(args)
            .unwrap();
        handle_clap_matches(&matches)
    }

    #[test]
    fn bare_invocation_opens_a_window() {
        let inv = parse(&["flying_toasters"]);
        assert_eq!(inv.target, DisplayTarget::Window);
        assert_eq!(inv.settings_path, PathBuf::from(DEFAULT_SETTINGS_FILE));
        assert_eq!(inv.log_level, LevelFilter::Info);
        assert!(!inv.save_settings);
    }

    #[test]
    fn terminal_mode_shorthand() {
        let inv = parse(&["flying_toasters", "run", "-m", "t"]);
        assert_eq!(inv.target, DisplayTarget::Terminal);
    }

    #[test]
    fn frame_subcommand_defaults() {
        let inv = parse(&["flying_toasters", "--seed", "9", "frame", "--frames", "3"]);
        assert_eq!(
            inv.target,
            DisplayTarget::Frame {
                frames: 3,
                out: PathBuf::from("toasters.png"),
                width: 800,
                height: 600,
            }
        );
        assert_eq!(inv.seed, Some(9));
    }

    #[test]
    fn frame_count_must_be_positive() {
        let zero = create_clap_command().try_get_matches_from([
            "flying_toasters",
            "frame",
            "--frames",
            "0",
        ]);
        assert!(zero.is_err());
        let one = parse(&["flying_toasters", "frame", "--frames", "1"]);
        assert!(matches!(one.target, DisplayTarget::Frame { frames: 1, .. }));
    }

    #[test]
    fn flags_override_settings() {
        let inv = parse(&["flying_toasters", "-n", "30", "--no-glow", "--log-level", "debug"]);
        let s = inv.apply(Settings::default());
        assert_eq!(s.toaster_count, crate::core::MAX_TOASTERS);
        assert!(!s.show_glow);
        assert!(s.show_scanlines && s.show_trails);
        assert_eq!(inv.log_level, LevelFilter::Debug);
    }

    #[test]
    fn flags_cannot_turn_stored_effects_back_on() {
        let inv = parse(&["flying_toasters"]);
        let stored = Settings {
            show_trails: false,
            ..Settings::default()
        };
        assert!(!inv.apply(stored).show_trails);
    }

    #[test]
    fn metrics_average_recent_frames() {
        let mut m = Metrics::new();
        for _ in 0..10 {
            m.update(Duration::from_millis(20));
        }
        assert_eq!(m.fps_counter, 10);
        assert!((m.current_fps - 50.0).abs() < 0.5);
        for _ in 0..METRICS_WINDOW * 2 {
            m.update(Duration::from_millis(10));
        }
        assert_eq!(m.frame_times.len(), METRICS_WINDOW);
        assert!(m.to_string().starts_with("FPS: "));
    }
}
