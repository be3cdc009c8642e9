use anyhow::{Context, Result};
use crossterm::{
    execute,
    style::Print,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{stderr, Stderr, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::game::{
    Board, Flow, GameConfig, Phase, RoundEngine, RoundState, RoundStatus, Session, TickInput,
};
use crate::input::{InputHandler, KeyAction, KeySource, TerminalKeys};
use crate::render::{food_blink_on, Renderer};

/// Delay between frames on menu screens and while a round is paused
const IDLE_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one driver step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub flow: Flow,
    /// Food was eaten and sound is on
    pub ring_bell: bool,
}

impl Step {
    fn proceed() -> Self {
        Self {
            flow: Flow::Continue,
            ring_bell: false,
        }
    }

    fn exit() -> Self {
        Self {
            flow: Flow::Exit,
            ring_bell: false,
        }
    }
}

/// Interactive play: menus, rounds and end screens driven by key presses
pub struct PlayMode<K: KeySource = TerminalKeys> {
    session: Session,
    engine: RoundEngine,
    round: Option<RoundState>,
    keys: K,
    renderer: Renderer,
    input_handler: InputHandler,
    started: Instant,
}

impl PlayMode<TerminalKeys> {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_keys(config, TerminalKeys)
    }
}

impl<K: KeySource> PlayMode<K> {
    pub fn with_keys(config: &GameConfig, keys: K) -> Self {
        Self {
            session: Session::new(config),
            engine: RoundEngine::new(config.seed),
            round: None,
            keys,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            started: Instant::now(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The running round, if any
    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    /// How long to wait before the next step
    pub fn tick_interval(&self) -> Duration {
        match &self.round {
            Some(round) if self.session.phase() == Phase::Playing && !round.paused => {
                self.session.context().difficulty.tick_interval()
            }
            _ => IDLE_INTERVAL,
        }
    }

    /// Process pending keys and advance the round by one tick. `rows` and
    /// `cols` are the terminal size a new round lays its board out on.
    pub fn step(&mut self, rows: u16, cols: u16) -> Result<Step> {
        if self.session.phase() != Phase::Playing && self.handle_menu_keys()? == Flow::Exit {
            return Ok(Step::exit());
        }
        if self.session.phase() != Phase::Playing {
            return Ok(Step::proceed());
        }

        let Some(round) = self.round.as_mut() else {
            // First step of a round only lays it out, so it is drawn once
            // before anything moves
            let setup = self.session.round_setup(Board::from_terminal(rows, cols));
            self.round = Some(self.engine.start(&setup));
            return Ok(Step::proceed());
        };

        let mut input = TickInput::default();
        while let Some(key) = self.keys.poll_key()? {
            match self.input_handler.handle_key_event(key) {
                KeyAction::Interrupt => return Ok(Step::exit()),
                action => action.apply_to(&mut input),
            }
        }

        let result = self.engine.tick(round, input);
        let ring_bell =
            self.session.context().sound_enabled && result.ate_food.iter().any(|&ate| ate);

        if let RoundStatus::Ended(reason) = result.status {
            debug!(?reason, "handing round outcome to session");
            if let Some(outcome) = round.outcome() {
                self.session.finish_round(outcome);
            }
            self.round = None;
        }

        Ok(Step {
            flow: Flow::Continue,
            ring_bell,
        })
    }

    /// Feed keys to the current menu screen until one starts a round
    fn handle_menu_keys(&mut self) -> Result<Flow> {
        while self.session.phase() != Phase::Playing {
            let Some(key) = self.keys.poll_key()? else {
                break;
            };
            let action = self.input_handler.handle_key_event(key);
            if action == KeyAction::Interrupt {
                return Ok(Flow::Exit);
            }
            if self.session.handle(action.to_command()) == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Draw the current screen
    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let blink = food_blink_on(self.started.elapsed());
        terminal
            .draw(|frame| {
                self.renderer
                    .render(frame, &self.session, self.round.as_ref(), blink);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Step, draw and sleep until the session exits or Ctrl+C arrives
    pub async fn run_loop<B: Backend + Write>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            let size = terminal.size().context("Failed to read terminal size")?;
            let step = self.step(size.height, size.width)?;
            if step.flow == Flow::Exit {
                break;
            }
            if step.ring_bell {
                execute!(terminal.backend_mut(), Print("\x07")).context("Failed to ring bell")?;
            }
            self.draw(terminal)?;

            tokio::select! {
                _ = tokio::time::sleep(self.tick_interval()) => {}

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupted");
                    break;
                }
            }
        }

        Ok(())
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
