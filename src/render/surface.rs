use ratatui::{
    buffer::Buffer,
    style::{Color, Style},
};

/// The handful of colors the game draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl From<Tone> for Color {
    fn from(tone: Tone) -> Self {
        match tone {
            Tone::Red => Color::Red,
            Tone::Green => Color::Green,
            Tone::Yellow => Color::Yellow,
            Tone::Blue => Color::Blue,
            Tone::Magenta => Color::Magenta,
            Tone::Cyan => Color::Cyan,
            Tone::White => Color::White,
            Tone::Gray => Color::Gray,
        }
    }
}

/// Character-cell drawing target addressed by (row, column).
///
/// Anything drawn outside the surface is silently clipped, so callers can
/// draw a board laid out for a bigger terminal without checking bounds.
pub trait Surface {
    /// (rows, columns)
    fn size(&self) -> (u16, u16);

    fn clear(&mut self);

    /// Draw `text` starting at (row, col), one character per cell
    fn draw_glyph(&mut self, row: i32, col: i32, text: &str, tone: Tone);

    /// Draw `text` centered on a row
    fn draw_centered(&mut self, row: i32, text: &str, tone: Tone) {
        let width = i32::from(self.size().1);
        let len = text.chars().count() as i32;
        self.draw_glyph(row, (width / 2 - len / 2).max(0), text, tone);
    }

    /// Double-lined rectangle with its top-left corner at (row, col)
    fn draw_box(&mut self, row: i32, col: i32, height: i32, width: i32, tone: Tone) {
        if height < 2 || width < 2 {
            return;
        }
        let span = "═".repeat((width - 2) as usize);

        self.draw_glyph(row, col, &format!("╔{span}╗"), tone);
        for r in row + 1..row + height - 1 {
            self.draw_glyph(r, col, "║", tone);
            self.draw_glyph(r, col + width - 1, "║", tone);
        }
        self.draw_glyph(row + height - 1, col, &format!("╚{span}╝"), tone);
    }
}

impl Surface for Buffer {
    fn size(&self) -> (u16, u16) {
        (self.area.height, self.area.width)
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn draw_glyph(&mut self, row: i32, col: i32, text: &str, tone: Tone) {
        let (Ok(y), Ok(x0)) = (u16::try_from(row), u16::try_from(col)) else {
            return;
        };
        if y >= self.area.height {
            return;
        }
        let style = Style::default().fg(tone.into());

        for (offset, ch) in text.chars().enumerate() {
            let Some(x) = u16::try_from(offset).ok().and_then(|o| x0.checked_add(o)) else {
                break;
            };
            if x >= self.area.width {
                break;
            }
            let position = (self.area.x + x, self.area.y + y);
            if let Some(cell) = self.cell_mut(position) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}
