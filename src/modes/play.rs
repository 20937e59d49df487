use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};

use crate::game::{GameEngine, GameState, Phase};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionStats;
use crate::render::Renderer;

/// Frame pacing, roughly 60 FPS
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Interactive keyboard play in the terminal
///
/// Each frame measures the wall-clock time since the previous one and hands
/// it to [`GameEngine::advance`], so the step rate follows the configured move
/// interval regardless of frame rate.
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn with_engine(mut engine: GameEngine) -> Self {
        let state = engine.new_session();

        Self {
            engine,
            state,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        restore_on_err(
            execute!(stderr, EnterAlternateScreen),
            || {
                let _ = disable_raw_mode();
            },
            "Failed to enter alternate screen",
        )?;

        let backend = CrosstermBackend::new(stderr);
        let mut terminal = restore_on_err(
            Terminal::new(backend),
            || {
                let _ = disable_raw_mode();
                let _ = execute!(io::stderr(), LeaveAlternateScreen);
            },
            "Failed to create terminal",
        )?;

        let result = match Self::prepare_terminal(&mut terminal) {
            Ok(()) => self.run_game_loop(&mut terminal).await,
            Err(err) => Err(err),
        };

        // Restore the terminal before reporting a loop failure
        let cleanup = Self::cleanup_terminal(&mut terminal);
        result.and(cleanup)
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);
        frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                _ = frame_timer.tick() => {
                    let now = Instant::now();
                    let delta = now.duration_since(last_frame).as_secs_f64();
                    last_frame = now;

                    self.update(delta);
                    self.stats.update();

                    let snapshot = self.state.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.stats);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.set_direction(&mut self.state, direction);
                }
                KeyAction::Start => self.start_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Advance the simulation by one frame's worth of time
    fn update(&mut self, delta: f64) {
        let info = self.engine.advance(&mut self.state, delta);

        if info.collision_type.is_some() && self.state.phase == Phase::GameOver {
            self.stats.on_game_over(self.state.score);
        }
    }

    fn start_game(&mut self) {
        if self.engine.start(&mut self.state) {
            self.stats.on_game_start();
        }
    }

    fn prepare_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;
        Ok(())
    }

    fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Undo partial terminal setup before handing a setup error back
fn restore_on_err<T>(result: io::Result<T>, restore: impl FnOnce(), what: &'static str) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result.context(what)
}
