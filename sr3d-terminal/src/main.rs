/// SR3D Terminal Renderer
///
/// Renders the demo triangle, a cube, or an STL model into the terminal.
/// Controls:
///   - WASD / Arrow Keys: Move the camera
///   - R/F: Move up / down
///   - Q/E: Turn left / right
///   - 1/2/3: Color, checker, lambert shading
///   - ESC: Quit
use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use sr3d_terminal::{stl, AppConfig, Args, Scene, TerminalApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_scene(args: &Args) -> Result<Scene> {
    if let Some(path) = &args.stl {
        let data = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mesh = stl::parse_stl(&data)
            .with_context(|| format!("failed to load STL {}", path.display()))?;
        info!(path = %path.display(), triangles = mesh.triangle_count(), "loaded STL");
        return Ok(Scene::fitted(mesh));
    }

    if args.cube {
        Ok(Scene::cube())
    } else {
        Ok(Scene::colored_triangle())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = AppConfig::from_args(&args)?;
    let scene = load_scene(&args)?;

    let mut app = TerminalApp::new(scene, config).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}
