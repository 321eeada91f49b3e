/// Render pass: turns the game into a grid of coloured cells.
///
/// Every primitive goes through `raster`; the terminal layer only has to
/// copy cells to the screen and add text on top.

use crate::entities::{
    Bullet, Car, Entity, PlayerId, Rgb, BLUE, BOSS_BULLET_COLOR, BULLET_SIZE, CAR_HEIGHT,
    CAR_WIDTH, EXPLOSION_DURATION, LANE_COUNT, LANE_WIDTH, RED, ROAD_LEFT, ROAD_WIDTH,
    TOTAL_LANES, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::game::{Game, GameState};
use crate::raster::{self, Pixel};

const ROAD_EDGE: Rgb = Rgb::new(110, 110, 110);
const CENTRE_LINE: Rgb = Rgb::new(255, 255, 0);
const LANE_MARKER: Rgb = Rgb::new(255, 255, 255);
const HEALTH_BAR: Rgb = Rgb::new(0, 255, 0);

const MARKER_HEIGHT: f32 = 40.0;
const MARKER_GAP: f32 = 30.0;
/// Extra width on each side of a boss outline.
const BOSS_EXTRA_WIDTH: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
}

#[derive(Clone, Debug)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Cell>>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Canvas {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        if (width, height) != (self.width, self.height) {
            *self = Canvas::new(width, height);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Set one cell; anything off the grid is clipped.
    pub fn plot(&mut self, p: Pixel, glyph: char, color: Rgb) {
        if p.x < 0 || p.y < 0 || p.x >= self.width as i32 || p.y >= self.height as i32 {
            return;
        }
        let idx = p.y as usize * self.width as usize + p.x as usize;
        self.cells[idx] = Some(Cell { glyph, color });
    }

    pub fn line(&mut self, a: Pixel, b: Pixel, glyph: char, color: Rgb) {
        for p in raster::line(a.x, a.y, b.x, b.y) {
            self.plot(p, glyph, color);
        }
    }

    pub fn circle(&mut self, centre: Pixel, radius: u32, glyph: char, color: Rgb) {
        for p in raster::circle(centre.x, centre.y, radius) {
            self.plot(p, glyph, color);
        }
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Maps playfield coordinates (y up) onto canvas cells (row 0 at the top).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    sx: f32,
    sy: f32,
}

impl Viewport {
    pub fn fit(canvas: &Canvas) -> Self {
        Viewport {
            sx: canvas.width() as f32 / WINDOW_WIDTH,
            sy: canvas.height() as f32 / WINDOW_HEIGHT,
        }
    }

    pub fn project(&self, x: f32, y: f32) -> Pixel {
        Pixel::new(
            (x * self.sx).floor() as i32,
            ((WINDOW_HEIGHT - y) * self.sy).floor() as i32,
        )
    }

    pub fn radius(&self, r: u32) -> u32 {
        (r as f32 * self.sx.min(self.sy)).round() as u32
    }
}

// ── Render pass ──────────────────────────────────────────────────────────────

/// Draw the current frame. The menu is pure text, so it leaves the canvas
/// empty; game over shows only the road under its text.
pub fn render(game: &Game, canvas: &mut Canvas) {
    canvas.clear();
    if game.state == GameState::Menu {
        return;
    }
    let view = Viewport::fit(canvas);
    draw_road(canvas, &view);
    if game.state == GameState::GameOver {
        return;
    }

    let world = &game.world;
    let mut cars: Vec<&Car> = world
        .traffic_cars
        .iter()
        .chain(world.oncoming_cars.iter())
        .chain(std::iter::once(&world.player))
        .chain(world.player2.as_ref())
        .collect();
    cars.sort_by(|a, b| a.depth().total_cmp(&b.depth()));

    for car in cars {
        draw_car(canvas, &view, car);
    }
    for bullet in &world.bullets {
        draw_bullet(canvas, &view, bullet);
    }
}

fn vline(canvas: &mut Canvas, view: &Viewport, x: f32, ys: (f32, f32), glyph: char, color: Rgb) {
    canvas.line(view.project(x, ys.0), view.project(x, ys.1), glyph, color);
}

/// Outline of the box spanning corners `(x1, y1)` and `(x2, y2)`.
fn rect(
    canvas: &mut Canvas,
    view: &Viewport,
    (x1, y1): (f32, f32),
    (x2, y2): (f32, f32),
    glyph: char,
    color: Rgb,
) {
    let corners = [
        view.project(x1, y1),
        view.project(x2, y1),
        view.project(x2, y2),
        view.project(x1, y2),
    ];
    for i in 0..4 {
        canvas.line(corners[i], corners[(i + 1) % 4], glyph, color);
    }
}

fn draw_road(canvas: &mut Canvas, view: &Viewport) {
    vline(canvas, view, ROAD_LEFT, (0.0, WINDOW_HEIGHT), '│', ROAD_EDGE);
    vline(canvas, view, ROAD_LEFT + ROAD_WIDTH, (0.0, WINDOW_HEIGHT), '│', ROAD_EDGE);

    let centre = WINDOW_WIDTH / 2.0;
    vline(canvas, view, centre - 2.0, (0.0, WINDOW_HEIGHT), '║', CENTRE_LINE);
    vline(canvas, view, centre + 2.0, (0.0, WINDOW_HEIGHT), '║', CENTRE_LINE);

    for lane in (1..TOTAL_LANES).filter(|&l| l != LANE_COUNT) {
        let x = ROAD_LEFT + lane as f32 * LANE_WIDTH;
        let mut y = 0.0;
        while y < WINDOW_HEIGHT {
            vline(canvas, view, x, (y, y + MARKER_HEIGHT), '┆', LANE_MARKER);
            y += MARKER_HEIGHT + MARKER_GAP;
        }
    }
}

fn draw_car(canvas: &mut Canvas, view: &Viewport, car: &Car) {
    for p in &car.particles {
        let fade = p.lifetime.max(0) as f32 / EXPLOSION_DURATION as f32;
        let glyph = if fade > 0.5 { '*' } else { '·' };
        canvas.circle(view.project(p.x, p.y), view.radius(p.size), glyph, p.color);
    }
    if car.health == 0 {
        return;
    }

    let (hw, hh) = (CAR_WIDTH / 2.0, CAR_HEIGHT / 2.0);
    let glyph = if car.is_boss() { '@' } else { '#' };
    let (bottom, top) = (car.y - hh, car.y + hh);
    rect(canvas, view, (car.x - hw, bottom), (car.x + hw, top), glyph, car.color);
    if car.is_boss() {
        let w = hw + BOSS_EXTRA_WIDTH;
        rect(canvas, view, (car.x - w, bottom), (car.x + w, top), glyph, car.color);
    }

    // Health bar below cars heading down, above cars heading up.
    let bar_y = if car.direction < 0.0 { car.y - hh - 8.0 } else { car.y + hh + 5.0 };
    let width = CAR_WIDTH * car.health as f32 / car.max_health() as f32;
    let left = car.x - hw;
    canvas.line(
        view.project(left, bar_y),
        view.project(left + width, bar_y),
        '=',
        HEALTH_BAR,
    );
}

fn draw_bullet(canvas: &mut Canvas, view: &Viewport, bullet: &Bullet) {
    let (glyph, color) = if bullet.is_boss {
        ('o', BOSS_BULLET_COLOR)
    } else {
        match bullet.owner {
            PlayerId::One => ('•', RED),
            PlayerId::Two => ('•', BLUE),
        }
    };
    canvas.circle(view.project(bullet.x, bullet.y), view.radius(BULLET_SIZE), glyph, color);
}
