/// Terminal front end for the SR3D software rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use sr3d_core::{Camera, Shader, Transform, Vector3};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod config;
pub mod renderer;
pub mod scene;
pub mod shaders;
pub mod stl;

pub use config::{AppConfig, Args, ShaderOption};
pub use renderer::AsciiRenderer;
pub use scene::Scene;

use shaders::{CheckerShader, ColorShader, LambertShader};

/// Camera translation per key press
const MOVE_SPEED: f32 = 0.1;
/// Camera yaw per key press, radians
const YAW_SPEED: f32 = 0.05;
/// Key help shown on the status line
const CONTROLS: &str = "WASD move, R/F up/down, Q/E turn, 1-3 shader, Esc quit";
/// Upper bound on the camera's vertical field of view; at a half turn the
/// projection flips
const MAX_VERTICAL_FOV: f32 = 170.0 * std::f32::consts::PI / 180.0;

/// Aspect ratio handed to the camera for a viewport
fn camera_aspect(renderer: &AsciiRenderer, horizontal_fov: f32) -> f32 {
    renderer.aspect_ratio().min(MAX_VERTICAL_FOV / horizontal_fov)
}

/// Renderer covering the terminal minus the status line
fn renderer_for(width: u16, height: u16) -> AsciiRenderer {
    AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize)
}

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Yaw(f32),
    SelectShader(ShaderOption),
}

impl Command {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let command = match code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Char('w') | KeyCode::Up => Command::MoveForward,
            KeyCode::Char('s') | KeyCode::Down => Command::MoveBackward,
            KeyCode::Char('a') | KeyCode::Left => Command::MoveLeft,
            KeyCode::Char('d') | KeyCode::Right => Command::MoveRight,
            KeyCode::Char('r') => Command::MoveUp,
            KeyCode::Char('f') => Command::MoveDown,
            KeyCode::Char('q') => Command::Yaw(-YAW_SPEED),
            KeyCode::Char('e') => Command::Yaw(YAW_SPEED),
            KeyCode::Char('1') => Command::SelectShader(ShaderOption::Color),
            KeyCode::Char('2') => Command::SelectShader(ShaderOption::Checker),
            KeyCode::Char('3') => Command::SelectShader(ShaderOption::Lambert),
            _ => return None,
        };
        Some(command)
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    camera: Camera,
    renderer: AsciiRenderer,
    color_shader: ColorShader,
    checker_shader: CheckerShader,
    lambert_shader: LambertShader,
    shader_option: ShaderOption,
    config: AppConfig,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: AppConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_renderer(scene, config, renderer_for(width, height)))
    }

    /// Build the application around an existing renderer (no terminal access)
    pub fn with_renderer(scene: Scene, config: AppConfig, renderer: AsciiRenderer) -> Self {
        let camera = Camera::new(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            config.horizontal_fov,
            camera_aspect(&renderer, config.horizontal_fov),
            config.near_plane_z,
            config.far_plane_z,
        );

        let mut app = Self {
            scene,
            camera,
            renderer,
            color_shader: ColorShader::new(),
            checker_shader: CheckerShader::default(),
            lambert_shader: LambertShader::default(),
            shader_option: config.shader,
            config,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.update_transform();
        app
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn shader_option(&self) -> ShaderOption {
        self.shader_option
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        info!(
            triangles = self.scene.mesh.triangle_count(),
            shader = ?self.shader_option,
            "starting terminal renderer"
        );
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_secs(1) / self.config.target_fps;

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update(target_frame_time.as_secs_f32());

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        info!("terminal renderer stopped");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                if let Some(command) = Command::from_key(code) {
                    self.apply(command);
                }
            }
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    /// Fit the renderer and the camera's vertical field of view to a new
    /// terminal size
    pub fn resize(&mut self, width: u16, height: u16) {
        self.renderer = renderer_for(width, height);
        self.camera
            .set_aspect_ratio(camera_aspect(&self.renderer, self.config.horizontal_fov));
        self.update_transform();
        debug!(width, height, vertical_fov = self.camera.vertical_fov(), "terminal resized");
    }

    /// Apply an input command, then rebuild the draw transform
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Quit => self.running = false,
            Command::MoveForward => self.camera.move_forward(MOVE_SPEED),
            Command::MoveBackward => self.camera.move_backward(MOVE_SPEED),
            Command::MoveLeft => self.camera.move_left(MOVE_SPEED),
            Command::MoveRight => self.camera.move_right(MOVE_SPEED),
            Command::MoveUp => self.camera.move_up(MOVE_SPEED),
            Command::MoveDown => self.camera.move_down(MOVE_SPEED),
            Command::Yaw(radians) => self.camera.yaw(radians),
            Command::SelectShader(option) => {
                debug!(shader = ?option, "shader selected");
                self.shader_option = option;
            }
        }
        self.update_transform();
    }

    fn update(&mut self, dt: f32) {
        // Continuous spin for demo effect
        if self.config.spin != 0.0 {
            self.scene.placement.rotation.rotate(0.0, self.config.spin * dt, 0.0);
            self.update_transform();
        }
    }

    /// Recompute the local-to-clip matrix and hand it to every shader
    fn update_transform(&mut self) {
        let local_to_clip = Transform::for_draw(&self.scene.placement, &self.camera);
        self.color_shader.set_local_to_clip(local_to_clip);
        self.checker_shader.set_local_to_clip(local_to_clip);
        self.lambert_shader.set_local_to_clip(local_to_clip);
    }

    /// Rasterize the scene into the renderer's buffers
    pub fn render_frame(&mut self) -> renderer::RenderStats {
        self.renderer.clear();
        // Field-level borrows so the renderer can be borrowed mutably alongside
        let shader = match self.shader_option {
            ShaderOption::Color => &self.color_shader as &dyn Shader,
            ShaderOption::Checker => &self.checker_shader,
            ShaderOption::Lambert => &self.lambert_shader,
        };
        self.renderer.render_mesh(&self.scene.mesh, shader)
    }

    fn render(&mut self) -> io::Result<()> {
        self.render_frame();

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw status line
        let p = self.camera.position();
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "SR3D | FPS: {:.1} | {:?} | pos {:.2} {:.2} {:.2} | {CONTROLS}",
                self.fps, self.shader_option, p.x, p.y, p.z
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn app() -> TerminalApp {
        TerminalApp::with_renderer(
            Scene::colored_triangle(),
            AppConfig::default(),
            AsciiRenderer::new(40, 20),
        )
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Command::from_key(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(Command::from_key(KeyCode::Char('e')), Some(Command::Yaw(YAW_SPEED)));
        assert_eq!(
            Command::from_key(KeyCode::Char('2')),
            Some(Command::SelectShader(ShaderOption::Checker))
        );
        assert_eq!(Command::from_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn test_commands_move_camera() {
        let mut app = app();
        app.apply(Command::MoveForward);
        app.apply(Command::MoveUp);
        let expected = Vector3::new(0.0, MOVE_SPEED, MOVE_SPEED);
        assert_relative_eq!(app.camera().position(), expected, epsilon = 1e-6);

        app.apply(Command::Yaw(0.5));
        assert_relative_eq!(app.camera().forward().x, 0.5f32.sin(), epsilon = 1e-5);

        app.apply(Command::Quit);
        assert!(!app.is_running());
    }

    #[test]
    fn test_render_frame_with_each_shader() {
        let mut app = app();
        for option in [ShaderOption::Color, ShaderOption::Checker, ShaderOption::Lambert] {
            app.apply(Command::SelectShader(option));
            assert_eq!(app.shader_option(), option);

            let stats = app.render_frame();
            assert_eq!(stats.triangles_drawn, 1);
            assert!(stats.pixels_shaded > 0);
        }
    }

    #[test]
    fn test_turning_away_hides_triangle() {
        let mut app = app();
        app.apply(Command::Yaw(std::f32::consts::PI));
        let stats = app.render_frame();
        assert_eq!(stats.pixels_shaded, 0);
    }

    #[test]
    fn test_resize_refits_vertical_fov() {
        let mut app = app();
        let position = app.camera().position();
        assert_relative_eq!(app.camera().vertical_fov(), FRAC_PI_2, epsilon = 1e-6);

        // 80 columns by 20 rows (plus the status line) is half as tall
        app.resize(80, 21);
        assert_relative_eq!(app.camera().vertical_fov(), FRAC_PI_2 * 0.5, epsilon = 1e-6);
        assert_eq!(app.camera().position(), position);
        assert_eq!(app.camera().horizontal_fov(), FRAC_PI_2);

        let stats = app.render_frame();
        assert_eq!(stats.triangles_drawn, 1);
        assert!(stats.pixels_shaded > 0);
    }

    #[test]
    fn test_tall_terminal_keeps_projection_upright() {
        let mut app = app();
        app.resize(10, 41);
        assert!(app.camera().vertical_fov() <= MAX_VERTICAL_FOV + 1e-6);

        // The apex of the triangle stays above its base on screen
        let clip = Transform::for_draw(&app.scene.placement, app.camera());
        let apex = sr3d_core::algebra::homogeneous_point(&Vector3::new(0.0, 1.0, 0.0)) * clip;
        assert!(apex.y / apex.w > 0.0);
    }
}
