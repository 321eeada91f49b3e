/// Game entities: cars, bullets and explosion particles.
///
/// Entities own their per-tick update rules; anything that involves more
/// than one entity (collisions, spawning, scoring) lives in `compute`.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

// ── Playfield geometry ───────────────────────────────────────────────────────

pub const WINDOW_WIDTH: f32 = 800.0;
pub const WINDOW_HEIGHT: f32 = 600.0;
pub const ROAD_WIDTH: f32 = 600.0;
/// Lanes per direction.
pub const LANE_COUNT: u32 = 5;
pub const TOTAL_LANES: u32 = LANE_COUNT * 2;
pub const LANE_WIDTH: f32 = ROAD_WIDTH / TOTAL_LANES as f32;
pub const ROAD_LEFT: f32 = (WINDOW_WIDTH - ROAD_WIDTH) / 2.0;

pub const CAR_WIDTH: f32 = 40.0;
pub const CAR_HEIGHT: f32 = 60.0;

// ── Entity constants ─────────────────────────────────────────────────────────

pub const PLAYER_HEALTH: u32 = 3;
pub const BOSS_HEALTH: u32 = 10;
/// Ticks a destroyed boss waits before coming back.
pub const BOSS_RESPAWN_TICKS: u32 = 120;

pub const BULLET_SPEED: f32 = 10.0;
pub const BOSS_BULLET_SPEED: f32 = 8.0;
pub const BULLET_SIZE: u32 = 5;

pub const EXPLOSION_PARTICLES: usize = 15;
pub const EXPLOSION_DURATION: i32 = 15;
pub const PARTICLE_DAMPING: f32 = 0.98;
const PARTICLE_MIN_SPEED: f32 = 3.0;
const PARTICLE_MAX_SPEED: f32 = 8.0;

/// Centre x of `lane` (0 = leftmost traffic lane).
pub fn lane_x(lane: u32) -> f32 {
    ROAD_LEFT + lane as f32 * LANE_WIDTH + LANE_WIDTH / 2.0
}

/// Lane whose span contains `x`, clamped to the road.
pub fn lane_of(x: f32) -> u32 {
    let lane = ((x - ROAD_LEFT) / LANE_WIDTH).floor();
    lane.clamp(0.0, (TOTAL_LANES - 1) as f32) as u32
}

// ── Colour ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const BOSS_BULLET_COLOR: Rgb = Rgb::new(255, 128, 0);

const EXPLOSION_PALETTE: [Rgb; 5] = [
    Rgb::new(255, 77, 0),  // orange
    Rgb::new(255, 0, 0),   // red
    Rgb::new(255, 255, 0), // yellow
    Rgb::new(255, 128, 0), // light orange
    Rgb::new(204, 51, 0),  // dark orange
];

/// Shared per-tick capability of every entity kind.
///
/// `step` is the elapsed time expressed in ticks; continuous motion is
/// scaled by it while discrete counters advance by exactly one.
pub trait Entity {
    fn advance(&mut self, step: f32);
    fn is_alive(&self) -> bool;
    /// Vertical position, used for back-to-front ordering.
    fn depth(&self) -> f32;
}

// ── Explosion particles ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ExplosionParticle {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub lifetime: i32,
    pub color: Rgb,
    pub size: u32,
}

impl ExplosionParticle {
    /// A particle flying out of `(x, y)` at a random angle and speed.
    pub fn burst(x: f32, y: f32, rng: &mut impl Rng) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let speed = rng.gen_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
        ExplosionParticle {
            x,
            y,
            dx: angle.cos() * speed,
            dy: angle.sin() * speed,
            lifetime: EXPLOSION_DURATION,
            color: *EXPLOSION_PALETTE.choose(rng).unwrap_or(&EXPLOSION_PALETTE[0]),
            size: rng.gen_range(2..=4),
        }
    }
}

impl Entity for ExplosionParticle {
    fn advance(&mut self, step: f32) {
        self.x += self.dx * step;
        self.y += self.dy * step;
        self.dx *= PARTICLE_DAMPING;
        self.dy *= PARTICLE_DAMPING;
        self.lifetime -= 1;
    }

    fn is_alive(&self) -> bool {
        self.lifetime > 0
    }

    fn depth(&self) -> f32 {
        self.y
    }
}

// ── Bullets ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerId {
    /// Red player.
    One,
    /// Blue player.
    Two,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// Vertical speed per tick; the sign is the direction of travel.
    pub speed: f32,
    pub owner: PlayerId,
    /// Boss bullets hit players; player bullets hit cars.
    pub is_boss: bool,
}

impl Bullet {
    pub fn player(x: f32, y: f32, owner: PlayerId) -> Self {
        Bullet { x, y, speed: BULLET_SPEED, owner, is_boss: false }
    }

    /// A boss bullet heading up when `upward`, down otherwise.
    pub fn boss(x: f32, y: f32, upward: bool) -> Self {
        let speed = if upward { BOSS_BULLET_SPEED } else { -BOSS_BULLET_SPEED };
        Bullet { x, y, speed, owner: PlayerId::One, is_boss: true }
    }

    pub fn in_bounds(&self) -> bool {
        (0.0..=WINDOW_HEIGHT).contains(&self.y)
    }
}

impl Entity for Bullet {
    fn advance(&mut self, step: f32) {
        self.y += self.speed * step;
    }

    fn is_alive(&self) -> bool {
        self.in_bounds()
    }

    fn depth(&self) -> f32 {
        self.y
    }
}

// ── Cars ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CarKind {
    Player(PlayerId),
    Traffic,
    Boss,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub x: f32,
    pub y: f32,
    pub lane: u32,
    pub color: Rgb,
    pub speed: f32,
    /// Vertical travel direction, +1 or -1.
    pub direction: f32,
    pub health: u32,
    pub kind: CarKind,
    pub exploded: bool,
    pub particles: Vec<ExplosionParticle>,
    // boss only
    pub shoot_cooldown: f32,
    pub respawning: bool,
    pub respawn_timer: u32,
    // players only
    pub score: u32,
}

impl Car {
    fn new(lane: u32, y: f32, color: Rgb, speed: f32, direction: f32, kind: CarKind) -> Self {
        let health = if kind == CarKind::Boss { BOSS_HEALTH } else { PLAYER_HEALTH };
        Car {
            x: lane_x(lane),
            y,
            lane,
            color,
            speed,
            direction,
            health,
            kind,
            exploded: false,
            particles: Vec::new(),
            shoot_cooldown: 0.0,
            respawning: false,
            respawn_timer: 0,
            score: 0,
        }
    }

    pub fn player(id: PlayerId, lane: u32, y: f32) -> Self {
        let color = match id {
            PlayerId::One => RED,
            PlayerId::Two => BLUE,
        };
        Car::new(lane, y, color, 0.0, -1.0, CarKind::Player(id))
    }

    pub fn traffic(lane: u32, y: f32, color: Rgb, speed: f32, direction: f32) -> Self {
        Car::new(lane, y, color, speed, direction, CarKind::Traffic)
    }

    pub fn boss(lane: u32, y: f32, speed: f32, direction: f32) -> Self {
        Car::new(lane, y, RED, speed, direction, CarKind::Boss)
    }

    pub fn is_boss(&self) -> bool {
        self.kind == CarKind::Boss
    }

    pub fn is_player2(&self) -> bool {
        self.kind == CarKind::Player(PlayerId::Two)
    }

    pub fn max_health(&self) -> u32 {
        if self.is_boss() {
            BOSS_HEALTH
        } else {
            PLAYER_HEALTH
        }
    }

    /// Not exploded and still has health: can be hit or collided with.
    pub fn is_live(&self) -> bool {
        !self.exploded && self.health > 0
    }

    /// Move to `lane`, recomputing x.
    pub fn set_lane(&mut self, lane: u32) {
        self.lane = lane.min(TOTAL_LANES - 1);
        self.x = lane_x(self.lane);
    }

    /// Take one hit. Returns `true` only on the hit that destroys the car.
    pub fn apply_damage(&mut self, rng: &mut impl Rng) -> bool {
        if self.exploded {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health > 0 {
            return false;
        }

        self.exploded = true;
        self.particles = (0..EXPLOSION_PARTICLES)
            .map(|_| ExplosionParticle::burst(self.x, self.y, rng))
            .collect();
        if self.is_boss() {
            self.respawning = true;
            self.respawn_timer = BOSS_RESPAWN_TICKS;
        }
        true
    }

    /// Count down a destroyed boss. Returns `true` on the tick it comes back;
    /// the caller is responsible for moving it to its spawn edge.
    pub fn tick_respawn(&mut self) -> bool {
        if !self.is_boss() || !self.respawning {
            return false;
        }
        self.respawn_timer = self.respawn_timer.saturating_sub(1);
        if self.respawn_timer > 0 {
            return false;
        }
        self.health = BOSS_HEALTH;
        self.exploded = false;
        self.respawning = false;
        self.particles.clear();
        true
    }

    /// Advance and drop expired explosion particles.
    pub fn tick_particles(&mut self, step: f32) {
        self.particles = std::mem::take(&mut self.particles)
            .into_iter()
            .filter_map(|mut p| {
                p.advance(step);
                p.is_alive().then_some(p)
            })
            .collect();
    }

    /// Axis-aligned box test against a point, using half the car size.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        (x - self.x).abs() < CAR_WIDTH / 2.0 && (y - self.y).abs() < CAR_HEIGHT / 2.0
    }

    /// Car-to-car overlap with the 0.8 tolerance box.
    pub fn overlaps(&self, other: &Car) -> bool {
        (self.x - other.x).abs() < CAR_WIDTH * 0.8 && (self.y - other.y).abs() < CAR_HEIGHT * 0.8
    }
}

impl Entity for Car {
    fn advance(&mut self, step: f32) {
        self.y += self.direction * self.speed * step;
        self.tick_particles(step);
    }

    /// Still worth keeping in a pool: live, or its explosion is still playing,
    /// or it is a boss waiting to respawn.
    fn is_alive(&self) -> bool {
        self.is_live() || !self.particles.is_empty() || self.respawning
    }

    fn depth(&self) -> f32 {
        self.y
    }
}
