/// Terminal presentation: all terminal I/O lives here.
///
/// The play area comes from `scene::render` as a canvas of cells; this
/// module copies it to the terminal below a one-row HUD and lays menus and
/// overlays on top as text. No game logic happens here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use car_destroyer::entities::Rgb;
use car_destroyer::game::{Game, GameState, Winner, MENU_OPTIONS, PAUSE_OPTIONS};
use car_destroyer::scene::{self, Canvas};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::White;
const C_HUD: Color = Color::White;
const C_SELECTED: Color = Color::Yellow;
const C_OPTION: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD above the play area and the hint below it.
pub const CHROME_ROWS: u16 = 2;

fn rgb(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    game: &Game,
    canvas: &mut Canvas,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    canvas.resize(width, height.saturating_sub(CHROME_ROWS));
    scene::render(game, canvas);
    draw_canvas(out, canvas)?;

    match game.state {
        GameState::Menu => draw_menu(out, game, width, height)?,
        GameState::GameOver => draw_game_over(out, game, width, height)?,
        GameState::Paused => {
            draw_hud(out, game)?;
            draw_pause_menu(out, game, width, height)?;
        }
        GameState::SinglePlayer | GameState::Multiplayer => {
            draw_hud(out, game)?;
            if game.show_controls {
                draw_controls(out, game, width, height)?;
            }
        }
    }
    draw_hint(out, height)?;

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Play area ─────────────────────────────────────────────────────────────────

fn draw_canvas<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    for row in 0..canvas.height() {
        for col in 0..canvas.width() {
            if let Some(cell) = canvas.get(col, row) {
                out.queue(cursor::MoveTo(col, row + 1))?;
                out.queue(style::SetForegroundColor(rgb(cell.color)))?;
                out.queue(Print(cell.glyph))?;
            }
        }
    }
    Ok(())
}

// ── Text helpers ──────────────────────────────────────────────────────────────

fn centered<W: Write>(out: &mut W, width: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_options<W: Write>(
    out: &mut W,
    options: &[&str],
    selected: usize,
    width: u16,
    first_row: u16,
) -> std::io::Result<()> {
    for (i, option) in options.iter().enumerate() {
        let (text, color) = if i == selected {
            (format!("> {option} <"), C_SELECTED)
        } else {
            (option.to_string(), C_OPTION)
        };
        centered(out, width, first_row + i as u16 * 2, &text, color)?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let world = &game.world;
    let level = world.difficulty().level + 1;
    let text = match &world.player2 {
        Some(p2) => format!(
            "P1 Score: {} | P2 Score: {} | Level: {}",
            world.player.score, p2.score, level
        ),
        None => format!("Score: {} | Level: {}", world.player.score, level),
    };
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Menus & overlays ──────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(5), "CAR DESTROYER", C_TITLE)?;
    draw_options(out, &MENU_OPTIONS, game.menu_selected, width, cy.saturating_sub(1))?;
    centered(out, width, cy + 4, "W / S : Select   ENTER : Start   Q : Quit", C_HINT)?;
    Ok(())
}

fn draw_pause_menu<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(4), "PAUSED", C_TITLE)?;
    draw_options(out, &PAUSE_OPTIONS, game.pause_selected, width, cy.saturating_sub(1))?;
    Ok(())
}

fn draw_controls<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let mut lines = vec!["Player 1 Controls:", "WASD - Move", "SPACE - Shoot", "P - Pause"];
    if game.state == GameState::Multiplayer {
        lines.extend(["", "Player 2 Controls:", "Arrow Keys - Move", "END - Shoot"]);
    }
    lines.extend(["", "Press any key to start"]);

    let start = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, line) in lines.iter().enumerate() {
        centered(out, width, start + i as u16, line, C_TITLE)?;
    }
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let world = &game.world;
    let cy = height / 2;
    centered(out, width, cy.saturating_sub(4), "Game Over!", C_GAME_OVER)?;

    match (&world.player2, game.winner) {
        (Some(p2), Some(winner)) => {
            centered(out, width, cy.saturating_sub(2), &format!("Red Player: {}", world.player.score), C_OPTION)?;
            centered(out, width, cy.saturating_sub(1), &format!("Blue Player: {}", p2.score), C_OPTION)?;
            let (text, color) = match winner {
                Winner::Red => ("Red Player Wins!", Color::Red),
                Winner::Blue => ("Blue Player Wins!", Color::Blue),
                Winner::Tie => ("It's a Tie!", Color::Yellow),
            };
            centered(out, width, cy + 1, text, color)?;
        }
        _ => {
            let text = format!("Final Score: {}", world.player.score);
            centered(out, width, cy.saturating_sub(1), &text, C_OPTION)?;
        }
    }

    centered(out, width, cy + 3, "Press ENTER to return to menu", C_OPTION)?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("P1: WASD SPACE   P2: ARROWS END   P: Pause   Q: Quit"))?;
    Ok(())
}
