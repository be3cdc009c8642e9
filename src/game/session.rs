//! Top-level game flow: which screen is active, and the values that outlive
//! a single round (level, high score, difficulty, mode).
//!
//! Every phase has its own transition function. Rounds are not run here;
//! the driver asks for a [`RoundSetup`] when the phase is
//! [`Phase::Playing`] and reports the [`RoundOutcome`] back through
//! [`Session::finish_round`].

use tracing::{debug, info};

use super::{
    config::{Difficulty, GameConfig, SNAKE_GLYPHS},
    engine::{EndReason, RoundOutcome, RoundSetup},
    state::Board,
};

/// Highest level offered on the level select screen
pub const MAX_SELECTABLE_LEVEL: u8 = 5;

/// Settings sub-screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsView {
    Main,
    Character,
    Level,
    Difficulty,
}

/// Active screen of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
    LevelComplete,
    Settings(SettingsView),
    HighScores,
}

/// A key press as the menus see it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Digit key `0`-`9`
    Select(u8),
    Restart,
    NextLevel,
    Menu,
    Quit,
    /// Any other key
    Other,
}

/// Whether the session keeps going after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

enum Transition {
    Stay,
    Go(Phase),
    Exit,
}

/// One row of the high score table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32, level: u32) -> Self {
        Self {
            name: name.into(),
            score,
            level,
        }
    }
}

/// In-memory leaderboard for the current run of the program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    entries: Vec<ScoreEntry>,
}

impl HighScoreTable {
    pub const CAPACITY: usize = 5;

    /// Shown until the first real score is recorded
    pub fn samples() -> Vec<ScoreEntry> {
        vec![
            ScoreEntry::new("CHAMP", 1000, 5),
            ScoreEntry::new("PRO", 800, 4),
            ScoreEntry::new("PLAYER", 600, 3),
            ScoreEntry::new("BEGINNER", 400, 2),
            ScoreEntry::new("NEWBIE", 200, 1),
        ]
    }

    /// Insert an entry in score order. Ties rank below existing entries.
    /// Returns the zero-based rank, or `None` if the entry did not make the
    /// table.
    pub fn record(&mut self, entry: ScoreEntry) -> Option<usize> {
        let rank = self
            .entries
            .iter()
            .position(|existing| existing.score < entry.score)
            .unwrap_or(self.entries.len());
        if rank >= Self::CAPACITY {
            return None;
        }

        self.entries.insert(rank, entry);
        self.entries.truncate(Self::CAPACITY);
        Some(rank)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Rows for the high score screen
    pub fn display_entries(&self) -> Vec<ScoreEntry> {
        if self.entries.is_empty() {
            Self::samples()
        } else {
            self.entries.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Values that persist across rounds
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    /// Level of the current or next round
    pub level: u32,
    /// Level a game started from the menu begins at
    pub start_level: u32,
    /// Score of the most recently finished round
    pub last_score: u32,
    /// Best round score seen this run; never decreases
    pub high_score: u32,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
    pub snake_glyphs: [char; 2],
    pub player_names: [String; 2],
    pub sound_enabled: bool,
    pub carry_score: bool,
    /// Score the next round starts from
    pub carried_score: u32,
    pub high_scores: HighScoreTable,
}

impl SessionContext {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            level: config.start_level.max(1),
            start_level: config.start_level.max(1),
            last_score: 0,
            high_score: 0,
            difficulty: config.difficulty,
            multiplayer: false,
            snake_glyphs: [config.snake_glyph, config.snake2_glyph],
            player_names: [config.player1_name.clone(), config.player2_name.clone()],
            sound_enabled: config.sound,
            carry_score: config.carry_score,
            carried_score: 0,
            high_scores: HighScoreTable::default(),
        }
    }

    /// Name a round's score is recorded under
    pub fn score_holder(&self) -> String {
        if self.multiplayer {
            format!("{} & {}", self.player_names[0], self.player_names[1])
        } else {
            self.player_names[0].clone()
        }
    }
}

/// The session state machine
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    phase: Phase,
    ctx: SessionContext,
    last_outcome: Option<RoundOutcome>,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: Phase::Menu,
            ctx: SessionContext::new(config),
            last_outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Outcome of the most recently finished round
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Parameters for the round the Playing phase should run
    pub fn round_setup(&self, board: Board) -> RoundSetup {
        RoundSetup {
            starting_score: self.ctx.carried_score,
            ..RoundSetup::new(board, self.ctx.level, self.ctx.difficulty, self.ctx.multiplayer)
        }
    }

    /// Apply a key press to the current screen. Rounds consume their own
    /// input, so this does nothing while playing.
    pub fn handle(&mut self, command: Command) -> Flow {
        let transition = match self.phase {
            Phase::Menu => self.on_menu(command),
            Phase::Playing => Transition::Stay,
            Phase::GameOver => self.on_game_over(command),
            Phase::LevelComplete => self.on_level_complete(command),
            Phase::Settings(view) => self.on_settings(view, command),
            Phase::HighScores => Transition::Go(Phase::Menu),
        };

        match transition {
            Transition::Stay => Flow::Continue,
            Transition::Go(next) => {
                self.go(next);
                Flow::Continue
            }
            Transition::Exit => {
                info!(phase = ?self.phase, "exit requested");
                Flow::Exit
            }
        }
    }

    /// Take the result of a finished round and move to the matching screen
    pub fn finish_round(&mut self, outcome: RoundOutcome) {
        let next = match outcome.reason {
            EndReason::SelfOrBorderCollision { .. } => Phase::GameOver,
            EndReason::LevelComplete => Phase::LevelComplete,
            EndReason::UserQuitToMenu | EndReason::UserQuit => Phase::Menu,
        };

        if next != Phase::Menu {
            self.ctx.last_score = outcome.score;
            if outcome.score > self.ctx.high_score {
                info!(score = outcome.score, previous = self.ctx.high_score, "new high score");
                self.ctx.high_score = outcome.score;
            }
            if outcome.score > 0 {
                let entry = ScoreEntry::new(self.ctx.score_holder(), outcome.score, outcome.level);
                if let Some(rank) = self.ctx.high_scores.record(entry) {
                    debug!(rank, "score entered the high score table");
                }
            }
        }

        self.last_outcome = Some(outcome);
        self.go(next);
    }

    fn go(&mut self, next: Phase) {
        if next != self.phase {
            info!(from = ?self.phase, to = ?next, "phase change");
            self.phase = next;
        }
    }

    fn start_new_game(&mut self, multiplayer: bool) -> Transition {
        self.ctx.multiplayer = multiplayer;
        self.ctx.level = self.ctx.start_level;
        self.ctx.last_score = 0;
        self.ctx.carried_score = 0;
        Transition::Go(Phase::Playing)
    }

    fn on_menu(&mut self, command: Command) -> Transition {
        match command {
            Command::Select(1) => self.start_new_game(false),
            Command::Select(2) => self.start_new_game(true),
            Command::Select(3) => Transition::Go(Phase::Settings(SettingsView::Main)),
            Command::Select(4) => Transition::Go(Phase::HighScores),
            Command::Select(5) | Command::Quit => Transition::Exit,
            _ => Transition::Stay,
        }
    }

    fn on_game_over(&mut self, command: Command) -> Transition {
        match command {
            Command::Restart => {
                self.ctx.level = 1;
                self.ctx.carried_score = 0;
                Transition::Go(Phase::Playing)
            }
            Command::Menu => Transition::Go(Phase::Menu),
            Command::Quit => Transition::Exit,
            _ => Transition::Stay,
        }
    }

    fn on_level_complete(&mut self, command: Command) -> Transition {
        match command {
            Command::NextLevel => {
                self.ctx.level += 1;
                self.ctx.carried_score = if self.ctx.carry_score {
                    self.ctx.last_score
                } else {
                    0
                };
                Transition::Go(Phase::Playing)
            }
            Command::Menu => Transition::Go(Phase::Menu),
            Command::Quit => Transition::Exit,
            _ => Transition::Stay,
        }
    }

    fn on_settings(&mut self, view: SettingsView, command: Command) -> Transition {
        let back = Transition::Go(Phase::Settings(SettingsView::Main));

        match (view, command) {
            (SettingsView::Main, Command::Select(1)) => {
                Transition::Go(Phase::Settings(SettingsView::Character))
            }
            (SettingsView::Main, Command::Select(2)) => Transition::Go(Phase::Settings(SettingsView::Level)),
            (SettingsView::Main, Command::Select(3)) => {
                Transition::Go(Phase::Settings(SettingsView::Difficulty))
            }
            (SettingsView::Main, Command::Select(4)) => {
                self.ctx.sound_enabled = !self.ctx.sound_enabled;
                debug!(sound = self.ctx.sound_enabled, "sound toggled");
                Transition::Stay
            }
            (SettingsView::Main, Command::Select(5) | Command::Quit) => Transition::Go(Phase::Menu),

            (SettingsView::Character, Command::Select(digit @ 1..=6)) => {
                self.ctx.snake_glyphs[0] = SNAKE_GLYPHS[usize::from(digit - 1)];
                debug!(glyph = %self.ctx.snake_glyphs[0], "snake glyph changed");
                back
            }
            (SettingsView::Level, Command::Select(digit @ 1..=MAX_SELECTABLE_LEVEL)) => {
                self.ctx.start_level = u32::from(digit);
                self.ctx.level = u32::from(digit);
                debug!(level = digit, "start level changed");
                back
            }
            (SettingsView::Difficulty, Command::Select(digit)) => match Difficulty::from_digit(digit) {
                Some(difficulty) => {
                    self.ctx.difficulty = difficulty;
                    debug!(%difficulty, "difficulty changed");
                    back
                }
                None => Transition::Stay,
            },
            (SettingsView::Character | SettingsView::Level | SettingsView::Difficulty, Command::Quit) => {
                back
            }
            _ => Transition::Stay,
        }
    }
}
