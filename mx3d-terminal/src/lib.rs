/// Terminal host for the matrix viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, ClearType},
};
use mx3d_core::{Axis, BuiltinModel, Camera, Model, OperationKind, Session, PRESETS};
use nalgebra::Matrix3;
use std::io::{self, stdout, Write};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Rows reserved at the top of the screen for the matrix and status
const HUD_ROWS: u16 = 6;

const ROTATE_STEP: f32 = 15.0;
const SCALE_STEP: f32 = 0.1;
const SHEAR_STEP: f32 = 0.1;
const CELL_STEP: f32 = 0.1;

/// Interactive terminal session: keys drive the transform, every change redraws
pub struct TerminalApp {
    session: Session,
    renderer: AsciiRenderer,
    aspect: f32,
    builtin: Option<BuiltinModel>,
    cursor: (usize, usize),
    focus: usize,
    preset: usize,
    running: bool,
}

impl TerminalApp {
    pub fn new(model: Model, aspect: f32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(model, aspect, width, height))
    }

    /// Build without touching the terminal
    pub fn with_size(model: Model, aspect: f32, width: u16, height: u16) -> Self {
        let view_height = height.saturating_sub(HUD_ROWS);
        let camera = Camera::new(width as u32, view_height as u32).with_aspect(aspect);
        Self {
            session: Session::new(model, camera),
            renderer: AsciiRenderer::new(width as usize, view_height as usize),
            aspect,
            builtin: None,
            cursor: (0, 0),
            focus: 0,
            preset: 0,
            running: true,
        }
    }

    /// Remember which built-in model is showing so `m` can cycle from it
    pub fn with_builtin(mut self, builtin: BuiltinModel) -> Self {
        self.builtin = Some(builtin);
        self
    }

    pub fn with_matrix(mut self, matrix: Matrix3<f32>) -> Self {
        self.session.set_matrix(matrix);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
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
        self.render()?;
        while self.running {
            // Nothing changes between events, so block until the next one
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    self.handle_key(key);
                    self.render()?;
                }
                Event::Resize(width, height) => {
                    self.resize(width, height);
                    self.render()?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        let view_height = height.saturating_sub(HUD_ROWS);
        tracing::debug!(width, height, "terminal resized");
        self.renderer.resize(width as usize, view_height as usize);
        self.session
            .set_camera(Camera::new(width as u32, view_height as u32).with_aspect(self.aspect));
    }

    pub fn handle_key(&mut self, KeyEvent { code, .. }: KeyEvent) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('r') => self.select(OperationKind::Rotate),
            KeyCode::Char('s') => self.select(OperationKind::Scale),
            KeyCode::Char('h') => self.select(OperationKind::Shear),
            KeyCode::Char('f') => self.select(OperationKind::Flatten),
            KeyCode::Char('0') => {
                self.session.reset();
                self.focus = 0;
            }
            KeyCode::Char('m') => {
                let next = self.builtin.map_or(BuiltinModel::Cube, BuiltinModel::next);
                self.builtin = Some(next);
                self.session.set_model(next.build());
            }
            KeyCode::Char('p') => {
                self.session.apply_preset(&PRESETS[self.preset]);
                self.preset = (self.preset + 1) % PRESETS.len();
            }
            KeyCode::Up => self.cursor.0 = (self.cursor.0 + 2) % 3,
            KeyCode::Down => self.cursor.0 = (self.cursor.0 + 1) % 3,
            KeyCode::Left => self.cursor.1 = (self.cursor.1 + 2) % 3,
            KeyCode::Right => self.cursor.1 = (self.cursor.1 + 1) % 3,
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_cell(CELL_STEP),
            KeyCode::Char('-') => self.nudge_cell(-CELL_STEP),
            KeyCode::Tab => {
                let count = parameter_count(self.session.state().active());
                if count > 0 {
                    self.focus = (self.focus + 1) % count;
                }
            }
            KeyCode::Char(']') => self.adjust_parameter(1.0),
            KeyCode::Char('[') => self.adjust_parameter(-1.0),
            _ => {}
        }
    }

    fn select(&mut self, kind: OperationKind) {
        self.session.select_operation(kind);
        self.focus = 0;
    }

    fn nudge_cell(&mut self, delta: f32) {
        let (row, col) = self.cursor;
        let value = self.session.cell(row, col) + delta;
        self.session.set_cell(row, col, value);
    }

    fn adjust_parameter(&mut self, direction: f32) {
        let params = *self.session.state().params();
        match self.session.state().active() {
            OperationKind::Idle => {}
            OperationKind::Rotate => {
                let axis = Axis::ALL[self.focus % 3];
                let degrees = params.rotate.get(axis) + ROTATE_STEP * direction;
                self.session.set_rotation_angle(axis, degrees);
            }
            OperationKind::Scale => {
                let axis = Axis::ALL[self.focus % 3];
                let factor = params.scale.get(axis) + SCALE_STEP * direction;
                self.session.set_scale_factor(axis, factor);
            }
            OperationKind::Shear => {
                if self.focus == 0 {
                    self.session
                        .set_shear_amount(params.shear.amount + SHEAR_STEP * direction);
                } else {
                    self.session.set_shear_plane(params.shear.plane.next());
                }
            }
            OperationKind::Flatten => {
                self.session.set_flatten_axis(params.flatten.axis.next());
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        self.renderer.render_frame(self.session.frame());

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        self.draw_hud(&mut stdout)?;

        queue!(stdout, cursor::MoveTo(0, HUD_ROWS))?;
        self.renderer.draw(&mut stdout)?;

        stdout.flush()
    }

    fn draw_hud<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let state = self.session.state();
        queue!(
            out,
            SetForegroundColor(Color::Yellow),
            Print(format!("MX3D | {} ", self.session.model().label)),
            SetForegroundColor(Color::DarkGrey),
            Print("r/s/h/f=Op [ ]=Param Tab=Next Arrows+/-=Cell p=Preset m=Model 0=Reset q=Quit"),
            ResetColor,
        )?;

        // Columns are colored like the axis arrows: where X, Y and Z land
        let column_colors = self.session.frame().axes.map(|a| a.color);
        for row in 0..3 {
            queue!(out, cursor::MoveTo(0, 1 + row as u16), Print("[ "))?;
            for (col, color) in column_colors.iter().enumerate() {
                let selected = (row, col) == self.cursor;
                if selected {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    out,
                    SetForegroundColor(Color::Rgb { r: color.r, g: color.g, b: color.b }),
                    Print(format!("{:>6.2}", state.cell(row, col))),
                    SetAttribute(Attribute::Reset),
                    Print(" "),
                )?;
            }
            queue!(out, ResetColor, Print("]"))?;
        }

        let focus = focus_label(state.active(), self.focus);
        queue!(
            out,
            cursor::MoveTo(0, 4),
            SetForegroundColor(Color::Cyan),
            Print(format!("Operation: {}", state.active_operation())),
            ResetColor,
            Print(focus.map(|f| format!("  (editing {f})")).unwrap_or_default()),
            cursor::MoveTo(0, 5),
            SetForegroundColor(Color::DarkGrey),
            Print(format!("det = {:.3}", self.session.matrix().determinant())),
            ResetColor,
        )
    }
}

fn parameter_count(kind: OperationKind) -> usize {
    match kind {
        OperationKind::Idle => 0,
        OperationKind::Rotate | OperationKind::Scale => 3,
        OperationKind::Shear => 2,
        OperationKind::Flatten => 1,
    }
}

fn focus_label(kind: OperationKind, focus: usize) -> Option<String> {
    match kind {
        OperationKind::Idle => None,
        OperationKind::Rotate | OperationKind::Scale => Some(Axis::ALL[focus % 3].to_string()),
        OperationKind::Shear if focus == 0 => Some("amount".to_string()),
        OperationKind::Shear => Some("plane".to_string()),
        OperationKind::Flatten => Some("axis".to_string()),
    }
}
