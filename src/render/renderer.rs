use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Duration;

use crate::game::{
    EndReason, Phase, Player, RoundState, Session, SessionContext, SettingsView, SNAKE_GLYPHS,
};

use super::surface::{Surface, Tone};

const FOOD_GLYPH: &str = "●";
const OBSTACLE_GLYPH: &str = "█";

/// Terminals at least this wide get the long labels
const WIDE_LAYOUT: u16 = 50;

/// Food alternates color five times a second
pub fn food_blink_on(elapsed: Duration) -> bool {
    (elapsed.as_millis() / 200) % 2 == 0
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the screen for the session's current phase. `round` is the
    /// running round while playing.
    pub fn render(&self, frame: &mut Frame, session: &Session, round: Option<&RoundState>, blink: bool) {
        match (session.phase(), round) {
            (Phase::Playing, Some(round)) => {
                self.render_round(frame, session.context(), round, blink);
            }
            (Phase::Playing, None) => {}
            (Phase::Menu, _) => self.render_menu(frame, session.context()),
            (Phase::Settings(view), _) => self.render_settings(frame, session.context(), view),
            (Phase::HighScores, _) => self.render_high_scores(frame, session.context()),
            (Phase::GameOver, _) => self.render_game_over(frame, session),
            (Phase::LevelComplete, _) => self.render_level_complete(frame, session.context()),
        }
    }

    fn render_round(&self, frame: &mut Frame, ctx: &SessionContext, round: &RoundState, blink: bool) {
        let wide = frame.area().width >= WIDE_LAYOUT;
        let surface = frame.buffer_mut();
        surface.clear();
        let board = round.board;

        let mode = if round.is_multiplayer() {
            "Mode: Multiplayer"
        } else {
            "Mode: Single Player"
        };
        surface.draw_centered(
            0,
            &format!(
                "Level: {} | Score: {} | Food: {}/{}",
                round.level, round.score, round.food_eaten, round.required_food
            ),
            Tone::White,
        );
        surface.draw_centered(1, &format!("{mode} | Difficulty: {}", ctx.difficulty), Tone::Cyan);

        let border_tone = match round.level {
            0..=2 => Tone::Cyan,
            3 | 4 => Tone::Yellow,
            _ => Tone::Red,
        };
        surface.draw_box(
            board.top,
            board.left,
            board.bottom - board.top + 1,
            board.right - board.left + 1,
            border_tone,
        );

        let obstacle_tone = if round.level >= 4 { Tone::Red } else { Tone::Magenta };
        for cell in round.obstacles.iter().filter(|c| board.is_interior(**c)) {
            surface.draw_glyph(cell.row, cell.col, OBSTACLE_GLYPH, obstacle_tone);
        }

        let food_tone = if blink || round.paused { Tone::Yellow } else { Tone::Magenta };
        surface.draw_glyph(round.food.row, round.food.col, FOOD_GLYPH, food_tone);

        for (index, snake) in round.snakes.iter().enumerate() {
            let (head_tone, body_tone) = if index == 0 {
                (Tone::Green, Tone::Cyan)
            } else {
                (Tone::Blue, Tone::Magenta)
            };
            let glyph = ctx.snake_glyphs[index.min(1)].to_string();
            // Tail first so the head stays visible when segments overlap
            for (position, cell) in snake.body.iter().enumerate().rev() {
                let tone = if position == 0 { head_tone } else { body_tone };
                surface.draw_glyph(cell.row, cell.col, &glyph, tone);
            }
        }

        let controls = match (wide, round.is_multiplayer()) {
            (true, true) => "P1: WASD | P2: Arrows | P: Pause | Q: Quit | M: Menu",
            (true, false) => "WASD to move | P: Pause | Q: Quit | M: Menu",
            (false, true) => "P1:WASD P2:Arrows P:Pause Q:Quit",
            (false, false) => "WASD move P:Pause Q:Quit M:Menu",
        };
        surface.draw_centered(board.bottom + 1, controls, Tone::Gray);

        if round.paused {
            surface.draw_centered(board.center().row, " GAME PAUSED - Press P to resume ", Tone::Yellow);
        }
    }

    fn render_menu(&self, frame: &mut Frame, ctx: &SessionContext) {
        let wide = frame.area().width >= WIDE_LAYOUT;
        let items: [(&str, Color); 5] = if wide {
            [
                ("1. SINGLE PLAYER", Color::Green),
                ("2. MULTI PLAYER", Color::Blue),
                ("3. SETTINGS", Color::Yellow),
                ("4. HIGH SCORES", Color::Cyan),
                ("5. EXIT GAME", Color::Red),
            ]
        } else {
            [
                ("1. SINGLE", Color::Green),
                ("2. MULTI", Color::Blue),
                ("3. SETTINGS", Color::Yellow),
                ("4. SCORES", Color::Cyan),
                ("5. EXIT", Color::Red),
            ]
        };

        let mut lines = vec![
            title_line("SNAKE GAME", Color::Green),
            Line::from(""),
            title_line("MAIN MENU", Color::Magenta),
            Line::from(""),
        ];
        lines.extend(items.iter().map(|(text, color)| colored_line(text, *color)));
        lines.push(Line::from(""));
        lines.push(colored_line("Select option (1-5)", Color::Cyan));
        lines.push(Line::from(""));
        lines.push(colored_line("Single: WASD to move", Color::White));
        lines.push(colored_line("Multi: P1(WASD) P2(Arrows/IJKL)", Color::White));
        lines.push(colored_line("Pause: P, Quit: Q, Menu: M", Color::White));
        lines.push(Line::from(vec![
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                ctx.high_score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));

        self.render_panel(frame, lines, Color::Cyan, " Snake ");
    }

    fn render_settings(&self, frame: &mut Frame, ctx: &SessionContext, view: SettingsView) {
        let mut lines = Vec::new();

        match view {
            SettingsView::Main => {
                lines.push(title_line("GAME SETTINGS", Color::Magenta));
                lines.push(Line::from(""));
                for (text, color) in [
                    ("1. CHANGE SNAKE CHARACTER", Color::Green),
                    ("2. SELECT LEVEL", Color::Blue),
                    ("3. DIFFICULTY SETTINGS", Color::Yellow),
                    ("4. TOGGLE SOUND", Color::Cyan),
                    ("5. BACK TO MAIN MENU", Color::Red),
                ] {
                    lines.push(colored_line(text, color));
                }
                lines.push(Line::from(""));
                lines.push(colored_line(
                    &format!("Current: Char={}, Level={}", ctx.snake_glyphs[0], ctx.start_level),
                    Color::White,
                ));
                lines.push(colored_line(
                    &format!(
                        "Difficulty: {}, Sound: {}",
                        ctx.difficulty,
                        if ctx.sound_enabled { "ON" } else { "OFF" }
                    ),
                    Color::White,
                ));
                lines.push(Line::from(""));
                lines.push(colored_line("Select option (1-5)", Color::Cyan));
            }
            SettingsView::Character => {
                lines.push(title_line("SELECT SNAKE CHARACTER", Color::Magenta));
                lines.push(Line::from(""));
                let names = ["Square", "Hollow Square", "Circle", "Solid Circle", "Triangle", "Diamond"];
                let colors = [
                    Color::Green,
                    Color::Blue,
                    Color::Cyan,
                    Color::Magenta,
                    Color::Red,
                    Color::Yellow,
                ];
                for (index, glyph) in SNAKE_GLYPHS.iter().enumerate() {
                    lines.push(colored_line(
                        &format!("{}. {} ({})", index + 1, glyph, names[index]),
                        colors[index],
                    ));
                }
                lines.push(Line::from(""));
                lines.push(colored_line("Select character (1-6) or Q to cancel", Color::Cyan));
            }
            SettingsView::Level => {
                lines.push(title_line("SELECT LEVEL", Color::Magenta));
                lines.push(Line::from(""));
                for (text, color) in [
                    ("Level 1: Beginner - Simple borders", Color::Green),
                    ("Level 2: Easy - Cross pattern", Color::Cyan),
                    ("Level 3: Medium - Horizontal bars", Color::Yellow),
                    ("Level 4: Hard - Vertical maze", Color::Magenta),
                    ("Level 5: Expert - Complex grid", Color::Red),
                ] {
                    lines.push(colored_line(text, color));
                }
                lines.push(Line::from(""));
                lines.push(colored_line(&format!("Current: {}", ctx.start_level), Color::White));
                lines.push(colored_line("Select level (1-5) or Q to cancel", Color::Cyan));
            }
            SettingsView::Difficulty => {
                lines.push(title_line("DIFFICULTY SETTINGS", Color::Magenta));
                lines.push(Line::from(""));
                for (text, color) in [
                    ("1. EASY - Slow speed, few obstacles", Color::Green),
                    ("2. NORMAL - Balanced gameplay", Color::Yellow),
                    ("3. HARD - Fast speed, many obstacles", Color::Red),
                    ("4. EXPERT - Very fast, complex maze", Color::Magenta),
                ] {
                    lines.push(colored_line(text, color));
                }
                lines.push(Line::from(""));
                lines.push(colored_line(&format!("Current: {}", ctx.difficulty), Color::White));
                lines.push(colored_line("Select difficulty (1-4) or Q to cancel", Color::Cyan));
            }
        }

        self.render_panel(frame, lines, Color::Blue, " Settings ");
    }

    fn render_high_scores(&self, frame: &mut Frame, ctx: &SessionContext) {
        let wide = frame.area().width >= WIDE_LAYOUT;
        let mut lines = vec![title_line("HIGH SCORES", Color::Magenta), Line::from("")];

        let header = if wide {
            "RANK  NAME               SCORE  LEVEL"
        } else {
            "#  NAME  SCORE  LVL"
        };
        lines.push(colored_line(header, Color::Yellow));

        for (index, entry) in ctx.high_scores.display_entries().iter().enumerate() {
            let text = if wide {
                format!("{:>3}.  {:<17.17}  {:>5}  {:>5}", index + 1, entry.name, entry.score, entry.level)
            } else {
                format!("{}. {} {} {}", index + 1, entry.name, entry.score, entry.level)
            };
            let color = match index {
                0 => Color::Green,
                1 | 2 => Color::Cyan,
                _ => Color::White,
            };
            lines.push(colored_line(&text, color));
        }

        lines.push(Line::from(""));
        lines.push(colored_line(&format!("Session best: {}", ctx.high_score), Color::White));
        lines.push(colored_line("Press any key to return", Color::Cyan));

        self.render_panel(frame, lines, Color::Yellow, " Leaderboard ");
    }

    fn render_game_over(&self, frame: &mut Frame, session: &Session) {
        let ctx = session.context();
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "GAME OVER!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            colored_line("Better luck next time!", Color::Gray),
            Line::from(""),
        ];

        if let Some(EndReason::SelfOrBorderCollision { player, kind }) =
            session.last_outcome().map(|outcome| outcome.reason)
        {
            if ctx.multiplayer {
                let name = match player {
                    Player::One => &ctx.player_names[0],
                    Player::Two => &ctx.player_names[1],
                };
                lines.push(colored_line(&format!("{name} {kind}"), Color::Magenta));
            }
        }

        lines.push(Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                ctx.last_score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(colored_line(&format!("Level Reached: {}", ctx.level), Color::Cyan));
        lines.push(colored_line(&format!("High Score: {}", ctx.high_score), Color::Blue));
        lines.push(colored_line(
            if ctx.multiplayer {
                "Mode: Multiplayer"
            } else {
                "Mode: Single Player"
            },
            Color::White,
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
            Span::styled("M", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" for menu or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        self.render_panel(frame, lines, Color::Red, " Game Over ");
    }

    fn render_level_complete(&self, frame: &mut Frame, ctx: &SessionContext) {
        let lines = vec![
            Line::from(vec![Span::styled(
                "LEVEL COMPLETE!",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            colored_line("Congratulations!", Color::Green),
            Line::from(""),
            colored_line(&format!("Level {} Completed!", ctx.level), Color::Yellow),
            colored_line(&format!("Score: {}", ctx.last_score), Color::Green),
            colored_line(&format!("Next Level: {}", ctx.level + 1), Color::Magenta),
            colored_line(&format!("High Score: {}", ctx.high_score), Color::Blue),
            Line::from(""),
            colored_line("Press 'N' for Next Level, 'M' for Menu, or 'Q' to Quit", Color::Cyan),
        ];

        self.render_panel(frame, lines, Color::Green, " Level Complete ");
    }

    /// Centered double-bordered box sized to its text
    fn render_panel(&self, frame: &mut Frame, lines: Vec<Line<'_>>, border: Color, title: &str) {
        let width = lines.iter().map(Line::width).max().unwrap_or(0) as u16 + 6;
        let height = lines.len() as u16 + 2;
        let area = centered_rect(frame.area(), width, height);

        let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(border))
                .title(title.to_string()),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(panel, area);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_line(text: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn colored_line(text: &str, color: Color) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
}

/// Rect of the given size centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
