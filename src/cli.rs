//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::demo::MAX_SNAPSHOT_SECONDS;

/// Which renderer drives the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Software-rasterized 50×50 grid in screen space
    Cpu,
    /// Vertex-shader displaced 100×100 mesh with an orbiting camera
    Gpu,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavesim")]
#[command(about = "Interactive animated water surface", long_about = None)]
pub struct Args {
    /// Renderer: cpu (default) or gpu
    #[arg(long, value_enum, default_value_t = Mode::Cpu)]
    pub mode: Mode,

    /// Directory holding wave.vert.wgsl and wave.frag.wgsl (gpu mode)
    #[arg(long, value_name = "DIR", default_value = "shaders")]
    pub shader_dir: PathBuf,

    /// Render one CPU frame to a PNG and exit without opening a window
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Simulated seconds before the snapshot is taken (0 to 3600)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0, value_parser = parse_seconds)]
    pub time: f32,

    /// Ripple origin for the snapshot, in frame pixels
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    pub ripple: Option<(f32, f32)>,
}

/// Parse a snapshot time in `[0, MAX_SNAPSHOT_SECONDS]`
fn parse_seconds(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid time '{}': {}", s.trim(), e))?;
    if !value.is_finite() || !(0.0..=MAX_SNAPSHOT_SECONDS).contains(&value) {
        return Err(format!(
            "time must be between 0 and {} seconds, got '{}'",
            MAX_SNAPSHOT_SECONDS,
            s.trim()
        ));
    }
    Ok(value)
}

/// Parse `X,Y` into a pair of finite floats
fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", s))?;
    let parse = |v: &str| -> Result<f32, String> {
        let value: f32 = v
            .trim()
            .parse()
            .map_err(|e| format!("invalid coordinate '{}': {}", v.trim(), e))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("coordinate '{}' is not finite", v.trim()))
        }
    };
    Ok((parse(x)?, parse(y)?))
}
