//! Terminal renderer
//!
//! Maps screen pixels onto terminal cells. Row 0 is the HUD, the remaining
//! rows are the playfield. No game logic lives here.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{self, Color, Print},
    terminal,
};

use super::{HOW_TO_PLAY, Renderer, Snapshot, View};
use crate::sim::{Facing, FallingObject, Fruit, Kind, MovementState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_HEALTH: Color = Color::Red;
const C_SCORE: Color = Color::White;
const C_PLAYER: Color = Color::Magenta;

/// Background tint per level
const LEVEL_COLORS: [Color; 5] = [
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::DarkYellow,
    Color::Red,
];

const HEALTH_BAR_CELLS: usize = 20;

/// Draws frames with crossterm commands
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self { out, cols, rows }
    }

    /// Terminal was resized
    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Pixel position to (column, row), clamped inside the playfield
    fn to_cell(&self, x: i32, y: i32, snapshot: &Snapshot) -> (u16, u16) {
        let cols = i64::from(self.cols.max(1));
        let field_rows = i64::from(self.rows.saturating_sub(1).max(1));
        let sw = i64::from(snapshot.screen_width.max(1));
        let sh = i64::from(snapshot.screen_height.max(1));
        let col = (i64::from(x) * cols / sw).clamp(0, cols - 1);
        let row = (i64::from(y) * field_rows / sh).clamp(0, field_rows - 1) + 1;
        (col as u16, row as u16)
    }

    fn centered(&mut self, row: u16, text: &str, color: Color) -> io::Result<()> {
        let col = (self.cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn draw_home(&mut self) -> io::Result<()> {
        let cy = self.rows / 2;
        self.centered(cy.saturating_sub(3), "~  HIPPO CATCH  ~", C_TITLE)?;
        self.centered(cy.saturating_sub(1), "Catch the fruit, dodge the bombs!", C_SCORE)?;
        self.centered(cy + 1, "[Enter] Start   [H] How to play   [Q] Quit", C_HINT)?;
        Ok(())
    }

    fn draw_how_to_play(&mut self) -> io::Result<()> {
        let top = (self.rows / 2).saturating_sub(HOW_TO_PLAY.len() as u16 / 2 + 2);
        self.centered(top, "How to Play", C_TITLE)?;
        for (i, line) in HOW_TO_PLAY.iter().enumerate() {
            self.centered(top + 2 + i as u16, line, C_SCORE)?;
        }
        self.centered(top + 3 + HOW_TO_PLAY.len() as u16, "[Esc] Back   [Enter] Start", C_HINT)?;
        Ok(())
    }

    fn draw_hud(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let filled = usize::from(snapshot.health) * HEALTH_BAR_CELLS / 100;
        let bar = format!(
            "[{}{}] {:>3}",
            "#".repeat(filled),
            ".".repeat(HEALTH_BAR_CELLS - filled),
            snapshot.health
        );
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(style::SetForegroundColor(C_HEALTH))?;
        self.out.queue(Print(&bar))?;

        if snapshot.shielded {
            self.out.queue(style::SetForegroundColor(Color::Cyan))?;
            self.out.queue(Print(" ◆"))?;
        }
        if snapshot.paralysis_ms.is_some() {
            self.out.queue(style::SetForegroundColor(Color::Magenta))?;
            self.out.queue(Print(" PARALYZED"))?;
        }
        if snapshot.slowdown_ms.is_some() {
            self.out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            self.out.queue(Print(" SLOW"))?;
        }

        let level = format!("Level {}", snapshot.level + 1);
        let color = LEVEL_COLORS[usize::from(snapshot.level).min(LEVEL_COLORS.len() - 1)];
        self.centered(0, &level, color)?;

        let score = format!("Score: {}", snapshot.score);
        let col = self.cols.saturating_sub(score.len() as u16 + 1);
        self.out.queue(cursor::MoveTo(col, 0))?;
        self.out.queue(style::SetForegroundColor(C_SCORE))?;
        self.out.queue(Print(&score))?;
        Ok(())
    }

    fn draw_object(&mut self, obj: &FallingObject, snapshot: &Snapshot) -> io::Result<()> {
        let (glyph, color) = glyph_for(obj.kind);
        let center_x = obj.rect.pos.x + obj.rect.size.x / 2;
        let center_y = obj.rect.pos.y + obj.rect.size.y / 2;
        let (col, row) = self.to_cell(center_x, center_y, snapshot);
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(style::SetForegroundColor(color))?;
        self.out.queue(Print(glyph))?;
        Ok(())
    }

    fn draw_player(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let player = &snapshot.player;
        let face = match player.movement {
            MovementState::Idle => "(o.o)",
            MovementState::Walking if player.animation_frame == 0 => "(o-o)",
            MovementState::Walking => "(-o-)",
            MovementState::MouthOpen => "(oOo)",
            MovementState::Paralyzed => "(x_x)",
        };
        let body = match player.facing {
            Facing::Left => "<(___)",
            Facing::Right => "(___)>",
        };
        let (left, top) = self.to_cell(player.rect.pos.x, player.rect.pos.y, snapshot);
        let (right, _) = self.to_cell(player.rect.right(), player.rect.pos.y, snapshot);
        let mid = left + right.saturating_sub(left) / 2;

        self.out.queue(style::SetForegroundColor(C_PLAYER))?;
        self.out.queue(cursor::MoveTo(mid.saturating_sub(2), top))?;
        self.out.queue(Print(face))?;
        self.out.queue(cursor::MoveTo(mid.saturating_sub(3), top + 1))?;
        self.out.queue(Print(body))?;
        Ok(())
    }

    fn draw_game(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        self.draw_hud(snapshot)?;

        if snapshot.game_over() || snapshot.cleared() {
            let cy = self.rows / 2;
            let title = if snapshot.cleared() {
                "Congrats! You cleared the game!"
            } else {
                "Game Over"
            };
            self.centered(cy.saturating_sub(1), title, C_SCORE)?;
            self.centered(cy + 1, &format!("Score: {}", snapshot.score), C_SCORE)?;
            self.centered(cy + 3, "[N] New game   [Q] Quit", C_HINT)?;
            return Ok(());
        }

        for obj in &snapshot.objects {
            self.draw_object(obj, snapshot)?;
        }
        self.draw_player(snapshot)
    }
}

fn glyph_for(kind: Kind) -> (&'static str, Color) {
    match kind {
        Kind::Fruit(fruit) => match fruit {
            Fruit::Apple => ("●", Color::Red),
            Fruit::Watermelon => ("●", Color::Green),
            Fruit::Banana => ("●", Color::Yellow),
            Fruit::Pineapple => ("●", Color::DarkYellow),
            Fruit::Mango => ("●", Color::Magenta),
        },
        Kind::Bomb => ("✹", Color::White),
        Kind::Potion => ("+", Color::Green),
        Kind::Poison => ("☠", Color::Magenta),
        Kind::Magnet => ("U", Color::Red),
        Kind::Shield => ("◆", Color::Cyan),
        Kind::Rock => ("▲", Color::DarkGrey),
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: View<'_>) -> io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        match view {
            View::Home => self.draw_home()?,
            View::HowToPlay => self.draw_how_to_play()?,
            View::Game(snapshot) => self.draw_game(snapshot)?,
        }
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()
    }
}
