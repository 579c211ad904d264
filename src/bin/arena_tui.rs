//! Terminal arena
//!
//! Draws the field on a ratatui canvas and steps the kernel at the
//! configured tick rate. Terminals report key presses but rarely releases,
//! so a press holds its button for a few ticks and each repeat extends it.
//!
//! Player 0: arrows, Space fires, Enter uses the ability.
//! Player 1: W A D, F fires, E uses the ability.
//! P pauses, Q or Esc quits.

use std::error::Error;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color as TermColor, Style};
use ratatui::symbols::Marker;
use ratatui::text::Line;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};

use torus_arena::core::config::SimulationConfig;
use torus_arena::core::types::{PlayerSlot, Tick};
use torus_arena::ecs::world::World;
use torus_arena::input::Button;
use torus_arena::render::{self, Color, DrawCall, DrawSurface, Shape};
use torus_arena::simulation::{populate, run_simulation_tick, ArenaLayout, SimulationEvent};

/// Ticks a single key press keeps its button held
const HOLD_TICKS: u64 = 6;
/// Lines kept in the event log panel
const LOG_LINES: usize = 12;

#[derive(Parser, Debug)]
#[command(name = "arena_tui")]
#[command(about = "Play the torus arena in a terminal")]
struct Args {
    /// Simulation config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed, overrides the config's
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the background grid
    #[arg(long)]
    grid: bool,
}

/// Collects one frame of draw calls for the canvas
#[derive(Default)]
struct FrameBuffer {
    tick: Tick,
    calls: Vec<DrawCall>,
}

impl DrawSurface for FrameBuffer {
    fn begin_frame(&mut self, tick: Tick) {
        self.tick = tick;
        self.calls.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(*call);
    }

    fn end_frame(&mut self) {}
}

struct App {
    world: World,
    frame: FrameBuffer,
    grid: Vec<DrawCall>,
    show_grid: bool,
    /// Held buttons and the tick their hold runs out
    holds: AHashMap<(PlayerSlot, Button), Tick>,
    log: Vec<String>,
    paused: bool,
}

fn binding(code: KeyCode) -> Option<(PlayerSlot, Button)> {
    let p0 = PlayerSlot(0);
    let p1 = PlayerSlot(1);
    match code {
        KeyCode::Up => Some((p0, Button::Thrust)),
        KeyCode::Left => Some((p0, Button::TurnLeft)),
        KeyCode::Right => Some((p0, Button::TurnRight)),
        KeyCode::Char(' ') => Some((p0, Button::Fire)),
        KeyCode::Enter => Some((p0, Button::Ability)),
        KeyCode::Char('w') => Some((p1, Button::Thrust)),
        KeyCode::Char('a') => Some((p1, Button::TurnLeft)),
        KeyCode::Char('d') => Some((p1, Button::TurnRight)),
        KeyCode::Char('f') => Some((p1, Button::Fire)),
        KeyCode::Char('e') => Some((p1, Button::Ability)),
        _ => None,
    }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb8();
    TermColor::Rgb(r, g, b)
}

fn describe(event: &SimulationEvent) -> Option<String> {
    match event {
        SimulationEvent::Kill {
            victim_kind,
            credit: Some(slot),
            value,
            ..
        } => Some(format!("P{} destroyed a {} (+{})", slot.0, victim_kind, value)),
        SimulationEvent::Absorbed { victim_kind, .. } => {
            Some(format!("A well swallowed a {}", victim_kind))
        }
        SimulationEvent::WellCollapsed { .. } => Some("A well collapsed".to_string()),
        SimulationEvent::PickupCollected { slot, .. } => Some(format!("P{} grabbed a pickup", slot.0)),
        SimulationEvent::AbilityUsed { slot, ability } => {
            Some(format!("P{} used {:?}", slot.0, ability))
        }
        SimulationEvent::Split { generation, .. } => {
            Some(format!("A shot split (generation {})", generation))
        }
        _ => None,
    }
}

impl App {
    fn new(world: World, show_grid: bool) -> Self {
        Self {
            world,
            frame: FrameBuffer::default(),
            grid: Vec::new(),
            show_grid,
            holds: AHashMap::new(),
            log: Vec::new(),
            paused: false,
        }
    }

    /// Returns true when the app should quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => return true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Char('p'), _) => self.paused = !self.paused,
            (KeyCode::Char('g'), _) => self.show_grid = !self.show_grid,
            (code, _) => {
                if let Some(held) = binding(code) {
                    let until = self.world.clock.id() + HOLD_TICKS;
                    if self.holds.insert(held, until).is_none() {
                        self.world.input.press(held.0, held.1);
                    }
                }
            }
        }
        false
    }

    fn step(&mut self) {
        let now = self.world.clock.id();
        let input = &mut self.world.input;
        self.holds.retain(|(slot, button), until| {
            let keep = *until > now;
            if !keep {
                input.release(*slot, *button);
            }
            keep
        });

        for event in run_simulation_tick(&mut self.world) {
            if let Some(line) = describe(&event) {
                self.log.push(line);
            }
        }
        let overflow = self.log.len().saturating_sub(LOG_LINES);
        self.log.drain(..overflow);
    }

    fn refresh(&mut self) {
        render::draw_world(&self.world, &mut self.frame);
        self.grid.clear();
        if self.show_grid {
            render::collect_grid(&self.world, &mut self.grid);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(34)])
            .split(frame.size());
        self.draw_field(frame, columns[0]);
        self.draw_sidebar(frame, columns[1]);
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect) {
        let (width, height) = (self.world.torus.width as f64, self.world.torus.height as f64);
        let title = if self.paused {
            format!("Tick {} (paused)", self.frame.tick)
        } else {
            format!("Tick {}", self.frame.tick)
        };
        // Canvas y grows upward; the field's grows downward
        let flip = |call: &DrawCall| (call.position.x as f64, height - call.position.y as f64);

        let canvas = Canvas::default()
            .block(Block::default().title(title).borders(Borders::ALL))
            .marker(Marker::Braille)
            .background_color(term_color(render::colors::BACKGROUND))
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for call in &self.grid {
                    ctx.draw(&Points {
                        coords: &[flip(call)],
                        color: term_color(call.color),
                    });
                }
                ctx.layer();
                for call in &self.frame.calls {
                    let (x, y) = flip(call);
                    let color = term_color(call.color);
                    match call.shape {
                        Shape::Well(_) | Shape::Damping(_) | Shape::Pulse(_) => ctx.draw(&Circle {
                            x,
                            y,
                            radius: call.radius as f64,
                            color,
                        }),
                        Shape::Entity(_) if call.radius * call.scale >= 4.0 => ctx.draw(&Circle {
                            x,
                            y,
                            radius: (call.radius * call.scale) as f64,
                            color,
                        }),
                        _ => ctx.draw(&Points {
                            coords: &[(x, y)],
                            color,
                        }),
                    }
                }
            });
        frame.render_widget(canvas, area);
    }

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(4)])
            .split(area);

        let mut lines = Vec::new();
        for (slot, score) in self.world.scoreboard.rows() {
            let style = Style::default().fg(term_color(render::colors::player_color(slot)));
            lines.push(Line::styled(
                format!("P{}  score {:>6}  K{} D{}", slot.0, score.score, score.kills, score.deaths),
                style,
            ));
            let status = self
                .world
                .player_entity(slot)
                .and_then(|id| self.world.get(id))
                .and_then(|craft| craft.vehicle.as_ref())
                .map(|v| format!("    energy {:>3.0}  hull {:>3.0}", v.energy, v.integrity))
                .unwrap_or_else(|| "    (respawning)".to_string());
            lines.push(Line::styled(status, style));
            lines.push(Line::styled(
                format!("    territory {:>3.0}%", score.area_fraction * 100.0),
                style,
            ));
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().title("Players").borders(Borders::ALL)),
            rows[0],
        );

        let log: Vec<Line> = self.log.iter().map(|l| Line::raw(l.as_str())).collect();
        frame.render_widget(
            Paragraph::new(log).block(Block::default().title("Events").borders(Borders::ALL)),
            rows[1],
        );
    }
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), Box<dyn Error>> {
    let hz = app.world.config.timing.tick_hz.max(1);
    let tick_interval = Duration::from_secs_f64(1.0 / hz as f64);
    let mut next_tick = Instant::now();

    loop {
        let now = Instant::now();
        if now >= next_tick {
            if !app.paused {
                app.step();
            }
            app.refresh();
            terminal.draw(|frame| app.draw(frame))?;
            // Overruns arrive late rather than being made up
            next_tick = now + tick_interval;
        }

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if app.handle_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Logs would scribble over the canvas; only errors go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("torus_arena=error"))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut world = World::try_new(config)?;
    populate(&mut world, &ArenaLayout::default());
    let mut app = App::new(world, args.grid);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor().ok();

    let result = run_event_loop(&mut app, &mut terminal);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!(?err, "failed to leave alternate screen");
    }
    result
}
