/// Command line configuration for the terminal renderer
use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};

/// Shading variant selected at startup (switchable with 1/2/3 at runtime)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShaderOption {
    /// Interpolated vertex colors
    #[default]
    Color,
    /// Procedural checkerboard from texture coordinates
    Checker,
    /// Diffuse lighting from normals
    Lambert,
}

#[derive(Debug, Parser)]
#[command(name = "sr3d-terminal", about = "Software rasterizer rendering to the terminal")]
pub struct Args {
    /// STL file to display instead of the demo triangle
    #[arg(long, conflicts_with = "cube")]
    pub stl: Option<PathBuf>,

    /// Display a cube instead of the demo triangle
    #[arg(long)]
    pub cube: bool,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    pub fov: f32,

    /// Near clip plane distance
    #[arg(long, default_value_t = 0.01)]
    pub near: f32,

    /// Far clip plane distance
    #[arg(long, default_value_t = 20.0)]
    pub far: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Object spin around its vertical axis, radians per second
    #[arg(long, default_value_t = 0.0)]
    pub spin: f32,

    #[arg(long, value_enum, default_value_t = ShaderOption::Color)]
    pub shader: ShaderOption,

    /// Write logs here (the terminal itself is the render target)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Settings the running application needs
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub horizontal_fov: f32,
    pub near_plane_z: f32,
    pub far_plane_z: f32,
    pub target_fps: u32,
    pub spin: f32,
    pub shader: ShaderOption,
}

impl AppConfig {
    /// Collect the arguments, rejecting projections the camera cannot build
    pub fn from_args(args: &Args) -> Result<Self> {
        ensure!(
            args.fov > 0.0 && args.fov < 180.0,
            "--fov must be between 0 and 180 degrees, got {}",
            args.fov
        );
        ensure!(args.near > 0.0, "--near must be positive, got {}", args.near);
        ensure!(
            args.far > args.near,
            "--far ({}) must lie beyond --near ({})",
            args.far,
            args.near
        );
        ensure!(args.spin.is_finite(), "--spin must be finite, got {}", args.spin);

        Ok(Self {
            horizontal_fov: args.fov.to_radians(),
            near_plane_z: args.near,
            far_plane_z: args.far,
            target_fps: args.fps.max(1),
            spin: args.spin,
            shader: args.shader,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            horizontal_fov: std::f32::consts::FRAC_PI_2,
            near_plane_z: 0.01,
            far_plane_z: 20.0,
            target_fps: 30,
            spin: 0.0,
            shader: ShaderOption::Color,
        }
    }
}
