/// World simulation.
///
/// `tick` takes the current `World` (and an RNG handle) and returns the next
/// one. Input helpers follow the same shape. Randomness only ever comes
/// through the injected RNG so tests can seed it.

use rand::Rng;
use tracing::debug;

use crate::config::Tuning;
use crate::entities::{
    lane_of, lane_x, Bullet, Car, Entity, PlayerId, Rgb, CAR_HEIGHT, CAR_WIDTH, LANE_COUNT,
    TOTAL_LANES, WINDOW_HEIGHT,
};

/// Minimum vertical gap between a freshly spawned car and any car in its lane.
pub const SAFE_DISTANCE: f32 = CAR_HEIGHT * 1.2;
/// Vertical step of a player move.
pub const PLAYER_STEP: f32 = 12.0;

/// Longest stretch of time one tick may cover, in ticks. Stays below the
/// distance at which a bullet could pass through a car between two ticks.
pub const MAX_STEP: f32 = 3.0;

pub const KILL_SCORE: u32 = 150;
pub const BOSS_KILL_SCORE: u32 = 1000;

const PLAYER_START_LANE: u32 = LANE_COUNT - 1;
const PLAYER_START_Y: f32 = WINDOW_HEIGHT / 4.0;

const INITIAL_PALETTE: [Rgb; 4] = [
    Rgb::new(255, 255, 0),
    Rgb::new(0, 179, 255),
    Rgb::new(0, 204, 77),
    Rgb::new(204, 0, 204),
];

// ── World ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Single,
    Multi,
}

/// The two car pools, told apart by travel direction and spawn edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pool {
    /// Lanes 0..5, spawning at the top and driving down towards the players.
    Traffic,
    /// Lanes 5..10, spawning at the bottom and driving up.
    Oncoming,
}

impl Pool {
    pub fn direction(self) -> f32 {
        match self {
            Pool::Traffic => -1.0,
            Pool::Oncoming => 1.0,
        }
    }

    pub fn spawn_y(self) -> f32 {
        match self {
            Pool::Traffic => WINDOW_HEIGHT + CAR_HEIGHT,
            Pool::Oncoming => -CAR_HEIGHT,
        }
    }

    fn random_lane(self, rng: &mut impl Rng) -> u32 {
        match self {
            Pool::Traffic => rng.gen_range(0..LANE_COUNT),
            Pool::Oncoming => rng.gen_range(LANE_COUNT..TOTAL_LANES),
        }
    }
}

/// A car has left the field once it is past the far edge for its direction.
fn exited(car: &Car) -> bool {
    if car.direction < 0.0 {
        car.y < -CAR_HEIGHT
    } else {
        car.y > WINDOW_HEIGHT + CAR_HEIGHT
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub mode: Mode,
    pub player: Car,
    pub player2: Option<Car>,
    pub traffic_cars: Vec<Car>,
    pub oncoming_cars: Vec<Car>,
    pub bullets: Vec<Bullet>,
    /// Max score at which the last boss was spawned.
    pub last_boss_spawn: u32,
    pub frame: u64,
    pub tuning: Tuning,
}

impl World {
    /// Fresh players, empty pools, zero scores.
    pub fn new(mode: Mode, tuning: Tuning) -> Self {
        let player2 = match mode {
            Mode::Single => None,
            Mode::Multi => Some(Car::player(
                PlayerId::Two,
                PLAYER_START_LANE,
                PLAYER_START_Y - CAR_HEIGHT * 2.0,
            )),
        };
        World {
            mode,
            player: Car::player(PlayerId::One, PLAYER_START_LANE, PLAYER_START_Y),
            player2,
            traffic_cars: Vec::new(),
            oncoming_cars: Vec::new(),
            bullets: Vec::new(),
            last_boss_spawn: 0,
            frame: 0,
            tuning,
        }
    }

    pub fn max_score(&self) -> u32 {
        self.player
            .score
            .max(self.player2.as_ref().map_or(0, |p| p.score))
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_score(self.max_score(), &self.tuning)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Car> {
        match id {
            PlayerId::One => Some(&self.player),
            PlayerId::Two => self.player2.as_ref(),
        }
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Car> {
        match id {
            PlayerId::One => Some(&mut self.player),
            PlayerId::Two => self.player2.as_mut(),
        }
    }

    pub fn pool(&self, pool: Pool) -> &Vec<Car> {
        match pool {
            Pool::Traffic => &self.traffic_cars,
            Pool::Oncoming => &self.oncoming_cars,
        }
    }

    pub fn pool_mut(&mut self, pool: Pool) -> &mut Vec<Car> {
        match pool {
            Pool::Traffic => &mut self.traffic_cars,
            Pool::Oncoming => &mut self.oncoming_cars,
        }
    }

    /// Players with health left.
    pub fn active_players(&self) -> impl Iterator<Item = &Car> {
        std::iter::once(&self.player)
            .chain(self.player2.as_ref())
            .filter(|p| p.health > 0)
    }

    pub fn all_players_down(&self) -> bool {
        self.active_players().next().is_none()
    }
}

fn active_players_mut<'a>(
    player: &'a mut Car,
    player2: &'a mut Option<Car>,
) -> impl Iterator<Item = &'a mut Car> {
    std::iter::once(player)
        .chain(player2.as_mut())
        .filter(|p| p.health > 0)
}

// ── Difficulty ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    pub level: u32,
    /// Per-tick, per-pool spawn probability.
    pub traffic_density: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub boss_shoot_interval: f32,
}

impl Difficulty {
    pub fn for_score(max_score: u32, t: &Tuning) -> Self {
        let level = max_score / t.difficulty_interval.max(1);
        let lf = level as f32;

        let density = (t.base_traffic_density + lf * t.traffic_density_step)
            .min(t.max_traffic_density);
        let min_speed = (t.base_car_speed + lf * t.car_speed_step).min(t.max_car_speed);
        let max_speed = (min_speed + t.car_speed_spread).min(t.max_car_speed);
        let boss_shoot_interval = (t.boss_shoot_interval - lf * t.boss_shoot_interval_step)
            .max(t.min_boss_shoot_interval);

        Difficulty {
            level,
            traffic_density: density * t.density_scale,
            min_speed,
            max_speed,
            boss_shoot_interval,
        }
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Room for one more car at `y` in `lane` without crowding an existing one.
fn has_clearance(cars: &[Car], lane: u32, y: f32) -> bool {
    let x = lane_x(lane);
    cars.iter()
        .all(|c| (c.x - x).abs() >= CAR_WIDTH || (c.y - y).abs() >= SAFE_DISTANCE)
}

/// Spawn a regular car at the pool's edge. Dropped silently if the pool is
/// full or the chosen lane has no clearance.
pub fn spawn_car(world: &mut World, pool: Pool, difficulty: &Difficulty, rng: &mut impl Rng) {
    if world.pool(pool).len() >= world.tuning.pool_hard_cap {
        return;
    }
    let lane = pool.random_lane(rng);
    let y = pool.spawn_y();
    if !has_clearance(world.pool(pool), lane, y) {
        return;
    }
    let color = Rgb::new(
        rng.gen_range(77..=255),
        rng.gen_range(77..=255),
        rng.gen_range(77..=255),
    );
    let speed = rng.gen_range(difficulty.min_speed..=difficulty.max_speed);
    world
        .pool_mut(pool)
        .push(Car::traffic(lane, y, color, speed, pool.direction()));
}

/// Spawn a boss at the pool's edge, ignoring the soft car limit.
pub fn spawn_boss(world: &mut World, pool: Pool, difficulty: &Difficulty, rng: &mut impl Rng) {
    if world.pool(pool).len() >= world.tuning.pool_hard_cap {
        debug!(?pool, "boss spawn dropped, pool full");
        return;
    }
    let lane = pool.random_lane(rng);
    let speed = difficulty.min_speed * world.tuning.boss_speed_factor;
    debug!(?pool, lane, speed, "boss spawned");
    world
        .pool_mut(pool)
        .push(Car::boss(lane, pool.spawn_y(), speed, pool.direction()));
}

/// Seed each pool with a few cars waiting off-screen.
pub fn seed_initial_traffic(world: &World, rng: &mut impl Rng) -> World {
    let mut next = world.clone();
    for _ in 0..next.tuning.initial_cars_per_pool {
        for pool in [Pool::Traffic, Pool::Oncoming] {
            let lane = pool.random_lane(rng);
            let offset = rng.gen_range(100..=800) as f32;
            let y = match pool {
                Pool::Traffic => WINDOW_HEIGHT + offset,
                Pool::Oncoming => -offset,
            };
            let color = INITIAL_PALETTE[rng.gen_range(0..INITIAL_PALETTE.len())];
            let speed = rng.gen_range(2.0..=5.0);
            next.pool_mut(pool)
                .push(Car::traffic(lane, y, color, speed, pool.direction()));
        }
    }
    next
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

/// Shift a player one lane left (`-1`) or right (`+1`), staying on the road.
pub fn move_player_lane(world: &World, id: PlayerId, delta: i32) -> World {
    let mut next = world.clone();
    if let Some(p) = next.player_mut(id).filter(|p| p.health > 0) {
        let lane = lane_of(p.x) as i32 + delta;
        if (0..TOTAL_LANES as i32).contains(&lane) {
            p.set_lane(lane as u32);
        }
    }
    next
}

pub fn move_player_up(world: &World, id: PlayerId) -> World {
    let mut next = world.clone();
    if let Some(p) = next.player_mut(id).filter(|p| p.health > 0) {
        if p.y < WINDOW_HEIGHT - CAR_HEIGHT {
            p.y += PLAYER_STEP;
        }
    }
    next
}

pub fn move_player_down(world: &World, id: PlayerId) -> World {
    let mut next = world.clone();
    if let Some(p) = next.player_mut(id).filter(|p| p.health > 0) {
        if p.y > 0.0 {
            p.y -= PLAYER_STEP;
        }
    }
    next
}

/// Fire from the front of the player's car. Not capped here; `tick` trims
/// the oldest bullets.
pub fn player_shoot(world: &World, id: PlayerId) -> World {
    let mut next = world.clone();
    let bullet = next
        .player(id)
        .filter(|p| p.health > 0)
        .map(|p| Bullet::player(p.x, p.y + CAR_HEIGHT / 2.0, id));
    if let Some(b) = bullet {
        next.bullets.push(b);
    }
    next
}

// ── Collision helpers ────────────────────────────────────────────────────────

/// Boss bullet against the living players; the first one hit loses a point
/// of health.
fn resolve_boss_bullet(player: &mut Car, player2: &mut Option<Car>, bullet: &Bullet) -> bool {
    for p in active_players_mut(player, player2) {
        if p.contains(bullet.x, bullet.y) {
            p.health -= 1;
            debug!(player = ?p.kind, health = p.health, "player hit by boss");
            return true;
        }
    }
    false
}

/// Player bullet against the first live car it overlaps. Awards the kill
/// score to the bullet's owner when the hit destroys the car.
fn resolve_player_bullet(world: &mut World, bullet: &Bullet, rng: &mut impl Rng) -> bool {
    let Some(car) = world
        .traffic_cars
        .iter_mut()
        .chain(world.oncoming_cars.iter_mut())
        .find(|c| c.is_live() && c.contains(bullet.x, bullet.y))
    else {
        return false;
    };

    if car.apply_damage(rng) {
        let award = if car.is_boss() { BOSS_KILL_SCORE } else { KILL_SCORE };
        debug!(owner = ?bullet.owner, award, boss = car.is_boss(), "car destroyed");
        if let Some(shooter) = world.player_mut(bullet.owner) {
            shooter.score += award;
        }
    }
    true
}

/// Move a pool one step and drop cars that left the field or finished
/// exploding. A boss waiting to respawn is kept wherever it drifted.
fn advance_pool(cars: Vec<Car>, step: f32) -> Vec<Car> {
    cars.into_iter()
        .filter_map(|mut car| {
            car.advance(step);
            ((car.respawning || !exited(&car)) && car.is_alive()).then_some(car)
        })
        .collect()
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by `dt` seconds of wall-clock time.
///
/// Continuous motion scales with `dt`, capped at `MAX_STEP` ticks' worth;
/// counters, collisions, spawns and scoring advance once per call. Game-over and pause handling belong to
/// the caller.
pub fn tick(world: &World, dt: f32, rng: &mut impl Rng) -> World {
    let tuning = world.tuning;
    let step = (dt.max(0.0) * tuning.tick_rate as f32).min(MAX_STEP);
    let mut next = world.clone();
    next.frame += 1;

    // ── 1. Boss milestones ───────────────────────────────────────────────────
    let max_score = next.max_score();
    if max_score.saturating_sub(next.last_boss_spawn) >= tuning.boss_spawn_interval * 100 {
        let pool = if rng.gen_bool(0.5) { Pool::Traffic } else { Pool::Oncoming };
        let difficulty = next.difficulty();
        spawn_boss(&mut next, pool, &difficulty, rng);
        next.last_boss_spawn = max_score;
    }

    // ── 2. Bullets ───────────────────────────────────────────────────────────
    let mut bullets: Vec<Bullet> = std::mem::take(&mut next.bullets)
        .into_iter()
        .filter(Bullet::in_bounds)
        .collect();
    if bullets.len() > tuning.max_bullets {
        let overflow = bullets.len() - tuning.max_bullets;
        bullets.drain(..overflow);
    }

    let mut survivors = Vec::with_capacity(bullets.len());
    for mut bullet in bullets {
        bullet.advance(step);
        let hit = if bullet.is_boss {
            resolve_boss_bullet(&mut next.player, &mut next.player2, &bullet)
        } else {
            resolve_player_bullet(&mut next, &bullet, rng)
        };
        if !hit {
            survivors.push(bullet);
        }
    }
    next.bullets = survivors;

    // ── 3. Cars move; contact with a live car is fatal ───────────────────────
    next.traffic_cars = advance_pool(std::mem::take(&mut next.traffic_cars), step);
    next.oncoming_cars = advance_pool(std::mem::take(&mut next.oncoming_cars), step);
    {
        let World { player, player2, traffic_cars, oncoming_cars, .. } = &mut next;
        for car in traffic_cars.iter().chain(oncoming_cars.iter()) {
            if !car.is_live() {
                continue;
            }
            for p in active_players_mut(player, player2) {
                if p.overlaps(car) {
                    p.health = 0;
                    debug!(player = ?p.kind, "player crashed");
                }
            }
        }
    }

    // ── 4. Bosses shoot at the nearest player ────────────────────────────────
    let difficulty = next.difficulty();
    {
        let World { player, player2, traffic_cars, oncoming_cars, bullets, .. } = &mut next;
        let targets: Vec<(f32, f32)> = std::iter::once(&*player)
            .chain(player2.as_ref())
            .filter(|p| p.health > 0)
            .map(|p| (p.x, p.y))
            .collect();

        for boss in traffic_cars
            .iter_mut()
            .chain(oncoming_cars.iter_mut())
            .filter(|c| c.is_boss() && c.is_live())
        {
            boss.shoot_cooldown -= 1.0;
            if boss.shoot_cooldown > 0.0 {
                continue;
            }
            let nearest = targets.iter().min_by(|a, b| {
                let da = (boss.x - a.0).abs() + (boss.y - a.1).abs();
                let db = (boss.x - b.0).abs() + (boss.y - b.1).abs();
                da.total_cmp(&db)
            });
            if let Some(&(_, ty)) = nearest {
                if bullets.len() < tuning.max_bullets {
                    bullets.push(Bullet::boss(boss.x, boss.y, ty > boss.y));
                    boss.shoot_cooldown = difficulty.boss_shoot_interval;
                }
            }
        }
    }

    // ── 5. Destroyed bosses come back at their spawn edge ────────────────────
    for pool in [Pool::Traffic, Pool::Oncoming] {
        for car in next.pool_mut(pool).iter_mut() {
            if car.tick_respawn() {
                car.y = pool.spawn_y();
                debug!(?pool, lane = car.lane, "boss respawned");
            }
        }
    }

    // ── 6. Random traffic ────────────────────────────────────────────────────
    for pool in [Pool::Traffic, Pool::Oncoming] {
        if next.pool(pool).len() < tuning.max_pool_cars
            && rng.gen::<f32>() < difficulty.traffic_density
        {
            spawn_car(&mut next, pool, &difficulty, rng);
        }
    }

    // ── 7. Survival score ────────────────────────────────────────────────────
    for p in active_players_mut(&mut next.player, &mut next.player2) {
        p.score += 1;
    }

    next
}
