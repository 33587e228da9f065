/// Terminal front-end: drives the viewer and rasterizes frames as ASCII
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::warn;
use phongview_core::{keymap, Scene, Selection, Viewer, ViewerConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;
pub mod status;

pub use renderer::AsciiRenderer;

/// DOM-style key name for a terminal key, as understood by the keymap
pub fn key_name(code: KeyCode) -> Option<String> {
    match code {
        KeyCode::Char(c) => Some(c.to_string()),
        KeyCode::Left => Some("ArrowLeft".to_string()),
        KeyCode::Right => Some("ArrowRight".to_string()),
        _ => None,
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    viewer: Viewer,
    renderer: AsciiRenderer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: ViewerConfig) -> io::Result<Self> {
        let viewer = Viewer::new(scene, config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let (width, height) = terminal::size()?;

        Ok(Self {
            viewer,
            // top row is the status line
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

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

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code, modifiers, kind, ..
            }) if kind != KeyEventKind::Release => {
                if code == KeyCode::Esc
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
                {
                    self.running = false;
                    return;
                }
                let command = key_name(code).and_then(|name| keymap::command_for_key(&name));
                if let Some(command) = command {
                    if let Err(e) = self.viewer.dispatch(command) {
                        warn!("{:?} ignored: {}", command, e);
                    }
                }
            }
            Event::Resize(width, height) => {
                self.renderer
                    .resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let stats = self
            .viewer
            .frame(&mut self.renderer)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.present(&mut stdout)?;

        // Draw UI overlay
        let (width, _) = terminal::size()?;
        let selection = match self.viewer.selection() {
            Selection::Unselected => "none".to_string(),
            Selection::Highlighted(set) => format!("set {}", set),
        };
        let mut line = format!(
            "PhongView | FPS: {:.1} | Triangles: {} | Selected: {} | Esc=Quit",
            self.fps,
            stats.vertex_count / 3,
            selection
        );
        if let Some(message) = status::last_message() {
            line.push_str(" | ");
            line.push_str(&message);
        }
        let line: String = line.chars().take(width as usize).collect();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(line),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
