//! Watch command implementation - Interactive TUI viewer.
//!
//! The session runs on its own thread and publishes a snapshot after
//! every turn. The TUI only ever reads the latest snapshot, so a slow
//! agent never blocks the screen and a slow terminal never stalls the
//! game.

use super::output::format_text;
use super::{read_map, CliError, GameArgs};
use anthill::game::{MapSymbol, Occupant};
use anthill::{ColonyId, GameResult, Session, Snapshot, SnapshotSlot};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::ops::ControlFlow;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the map is invalid, an agent cannot be started
/// or the TUI fails.
pub(crate) fn execute(map: &Path, game: &GameArgs, speed: u64) -> Result<(), CliError> {
    let text = read_map(map)?;
    let config = game.config();
    let session = Session::new(&text, &game.agents, &config)?;
    let agent_names = session.agent_names();

    let slot = SnapshotSlot::new();
    let (controls, requests) = crossbeam_channel::unbounded();
    let engine = spawn_engine(session, slot.clone(), Pacer::new(requests, speed))?;

    let app = App {
        slot,
        controls,
        paused: true,
        speed_ms: speed,
        engine: Some(engine),
        result: None,
        agent_names,
        max_turns: config.rules.max_turns,
    };
    let result = run_tui(app)?;

    if let Some(result) = result {
        print!("{}", format_text(&result));
    }
    Ok(())
}

/// A request from the TUI to the engine thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Pause(bool),
    Step,
    Speed(u64),
    Quit,
}

/// Engine side of the controls: decides when the next turn may run.
#[derive(Debug)]
struct Pacer {
    controls: Receiver<Control>,
    paused: bool,
    delay: Duration,
}

impl Pacer {
    fn new(controls: Receiver<Control>, speed_ms: u64) -> Self {
        Self {
            controls,
            paused: true, // Start paused
            delay: Duration::from_millis(speed_ms),
        }
    }

    /// Block until the next turn is due or the viewer goes away.
    fn pace(&mut self) -> ControlFlow<()> {
        let mut started = Instant::now();
        loop {
            let due = started.checked_add(self.delay);
            let received = match due {
                Some(due) if !self.paused => self.controls.recv_deadline(due),
                _ => self.controls.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Err(RecvTimeoutError::Timeout) => return ControlFlow::Continue(()),
                Ok(Control::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    return ControlFlow::Break(());
                }
                Ok(Control::Step) => {
                    self.paused = true;
                    return ControlFlow::Continue(());
                }
                Ok(Control::Pause(paused)) => {
                    self.paused = paused;
                    started = Instant::now();
                }
                Ok(Control::Speed(ms)) => self.delay = Duration::from_millis(ms),
            }
        }
    }
}

fn spawn_engine(
    session: Session,
    slot: SnapshotSlot,
    mut pacer: Pacer,
) -> Result<JoinHandle<GameResult>, CliError> {
    let handle = thread::Builder::new()
        .name("engine".to_string())
        .spawn(move || {
            slot.publish(session.world().snapshot());
            if pacer.pace().is_break() {
                return session.finish();
            }
            session.run_until(|world, _| {
                slot.publish(world.snapshot());
                pacer.pace()
            })
        })?;
    Ok(handle)
}

/// App state for the TUI.
struct App {
    slot: SnapshotSlot,
    controls: Sender<Control>,
    paused: bool,
    speed_ms: u64,
    engine: Option<JoinHandle<GameResult>>,
    result: Option<GameResult>,
    agent_names: Vec<String>,
    max_turns: u32,
}

impl App {
    fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Collect the result once the engine thread is done.
    fn poll_engine(&mut self) -> Result<(), CliError> {
        if self.engine.as_ref().is_some_and(JoinHandle::is_finished)
            && let Some(handle) = self.engine.take()
        {
            let result = handle
                .join()
                .map_err(|_| CliError::new("engine thread panicked"))?;
            self.result = Some(result);
        }
        Ok(())
    }

    /// Tell the engine; it is gone once the game is over.
    fn send(&self, control: Control) {
        let _ = self.controls.send(control);
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.send(Control::Pause(self.paused));
    }

    fn step_forward(&mut self) {
        self.paused = true;
        self.send(Control::Step);
    }

    fn increase_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_sub(100).max(50);
        self.send(Control::Speed(self.speed_ms));
    }

    fn decrease_speed(&mut self) {
        self.speed_ms = self.speed_ms.saturating_add(100).min(2000);
        self.send(Control::Speed(self.speed_ms));
    }

    /// Stop the engine and wait for the final result.
    fn shutdown(&mut self) -> Result<(), CliError> {
        self.send(Control::Quit);
        if let Some(handle) = self.engine.take() {
            let result = handle
                .join()
                .map_err(|_| CliError::new("engine thread panicked"))?;
            self.result = Some(result);
        }
        Ok(())
    }
}

fn run_tui(mut app: App) -> Result<Option<GameResult>, CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        app.poll_engine()?;

        // Draw
        let snapshot = app.slot.latest();
        terminal
            .draw(|f| ui(f, &app, snapshot.as_deref()))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(50)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') => app.toggle_pause(),
                KeyCode::Right | KeyCode::Char('l') => app.step_forward(),
                KeyCode::Char('+' | '=') => app.increase_speed(),
                KeyCode::Char('-') => app.decrease_speed(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    app.shutdown()?;
    Ok(app.result)
}

fn ui(f: &mut Frame, app: &App, snapshot: Option<&Snapshot>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app, snapshot);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_map(f, main_chunks[0], snapshot);
    render_stats(f, main_chunks[1], app, snapshot);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App, snapshot: Option<&Snapshot>) {
    let turn = snapshot.map_or(0, |s| s.turn);

    let status = if app.is_game_over() {
        "GAME OVER"
    } else if app.paused {
        "PAUSED"
    } else {
        "RUNNING"
    };

    let title = format!(
        " Anthill | Turn {}/{} | {} | Speed: {}ms ",
        turn,
        app.max_turns,
        status,
        app.speed_ms
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_map(f: &mut Frame, area: Rect, snapshot: Option<&Snapshot>) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(snapshot) = snapshot {
        let torus = snapshot.terrain.torus();
        // Show the top-left portion of the map that fits
        let visible_width = area.width.saturating_sub(2).min(torus.width());
        let visible_height = area.height.saturating_sub(2).min(torus.height());

        for y in 0..visible_height {
            let spans: Vec<Span> = (0..visible_width)
                .map(|x| {
                    let terrain = *snapshot.terrain.at(x, y);
                    let occupant = *snapshot.occupants.at(x, y);
                    let symbol = MapSymbol::for_cell(terrain, occupant, false);
                    Span::styled(
                        symbol.to_char().to_string(),
                        Style::default().fg(symbol_color(symbol, occupant)),
                    )
                })
                .collect();
            lines.push(Line::from(spans));
        }
    }

    let map_widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Map "));

    f.render_widget(map_widget, area);
}

fn symbol_color(symbol: MapSymbol, occupant: Occupant) -> Color {
    match (symbol, occupant) {
        (MapSymbol::Ant(colony) | MapSymbol::AntOnHill(colony) | MapSymbol::Hill(colony), _) => {
            colony_color(colony)
        }
        (MapSymbol::Water, _) => Color::Blue,
        (_, Occupant::Food) => Color::White,
        _ => Color::DarkGray,
    }
}

fn colony_color(colony: ColonyId) -> Color {
    match colony.0 {
        0 => Color::Red,
        1 => Color::Yellow,
        2 => Color::Green,
        3 => Color::Magenta,
        4 => Color::Cyan,
        5 => Color::LightRed,
        6 => Color::LightGreen,
        7 => Color::LightYellow,
        8 => Color::LightMagenta,
        _ => Color::LightCyan,
    }
}

fn render_stats(f: &mut Frame, area: Rect, app: &App, snapshot: Option<&Snapshot>) {
    let mut lines = vec![Line::from("")];

    for stats in snapshot.map(|s| s.colonies.as_slice()).unwrap_or_default() {
        let name = app
            .agent_names
            .get(stats.colony.index())
            .map_or("unknown", String::as_str);
        let status = if stats.ants == 0 && stats.hive == 0 {
            " [EXTINCT]"
        } else {
            ""
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("Colony {} ", stats.colony),
                Style::default()
                    .fg(colony_color(stats.colony))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("({name}){status}")),
        ]));
        lines.push(Line::from(format!("  Ants: {}  Hills: {}", stats.ants, stats.hills)));
        lines.push(Line::from(format!("  Hive: {}", stats.hive)));
        lines.push(Line::from(format!("  Score: {}", stats.score)));
        lines.push(Line::from(""));
    }

    let stats_widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Colonies "))
        .wrap(Wrap { trim: false });

    f.render_widget(stats_widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.is_game_over() {
        " [q] Quit "
    } else {
        " [q] Quit  [Space] Pause  [→] Step  [+/-] Speed "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
