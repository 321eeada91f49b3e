use car_destroyer::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn grey() -> Rgb {
    Rgb::new(128, 128, 128)
}

// ── Lanes ─────────────────────────────────────────────────────────────────────

#[test]
fn lane_centres_follow_the_road() {
    assert_eq!(lane_x(0), 130.0);
    assert_eq!(lane_x(4), 370.0);
    assert_eq!(lane_x(5), 430.0);
    assert_eq!(lane_x(9), 670.0);
}

#[test]
fn lane_of_inverts_lane_x_and_clamps() {
    for lane in 0..TOTAL_LANES {
        assert_eq!(lane_of(lane_x(lane)), lane);
    }
    assert_eq!(lane_of(0.0), 0);
    assert_eq!(lane_of(WINDOW_WIDTH), TOTAL_LANES - 1);
}

#[test]
fn set_lane_moves_the_car_and_clamps() {
    let mut car = Car::player(PlayerId::One, 4, 150.0);
    car.set_lane(7);
    assert_eq!((car.lane, car.x), (7, lane_x(7)));
    car.set_lane(42);
    assert_eq!(car.lane, TOTAL_LANES - 1);
}

// ── Cars ──────────────────────────────────────────────────────────────────────

#[test]
fn constructors_set_health_and_colour() {
    let p1 = Car::player(PlayerId::One, 4, 150.0);
    let p2 = Car::player(PlayerId::Two, 4, 30.0);
    let boss = Car::boss(2, 660.0, 1.5, -1.0);
    let car = Car::traffic(1, 660.0, grey(), 3.0, -1.0);

    assert_eq!((p1.health, p1.color), (PLAYER_HEALTH, RED));
    assert_eq!((p2.health, p2.color), (PLAYER_HEALTH, BLUE));
    assert!(p2.is_player2() && !p1.is_player2());
    assert_eq!(boss.health, BOSS_HEALTH);
    assert!(boss.is_boss());
    assert_eq!(boss.max_health(), BOSS_HEALTH);
    assert_eq!(car.max_health(), PLAYER_HEALTH);
    assert!(car.is_live() && !car.exploded);
}

#[test]
fn damage_destroys_on_the_last_hit_only() {
    let mut rng = rng();
    let mut car = Car::traffic(1, 300.0, grey(), 3.0, -1.0);

    assert!(!car.apply_damage(&mut rng));
    assert!(!car.apply_damage(&mut rng));
    assert_eq!(car.health, 1);
    assert!(car.particles.is_empty());

    assert!(car.apply_damage(&mut rng));
    assert!(car.exploded);
    assert_eq!(car.health, 0);
    assert_eq!(car.particles.len(), EXPLOSION_PARTICLES);
    assert!(!car.respawning);

    // Already destroyed: further hits change nothing.
    let before = car.clone();
    assert!(!car.apply_damage(&mut rng));
    assert_eq!(car, before);
}

#[test]
fn destroyed_boss_waits_before_respawning() {
    let mut rng = rng();
    let mut boss = Car::boss(3, 400.0, 1.5, -1.0);
    for _ in 0..BOSS_HEALTH - 1 {
        assert!(!boss.apply_damage(&mut rng));
    }
    assert!(boss.apply_damage(&mut rng));
    assert!(boss.respawning);
    assert_eq!(boss.respawn_timer, BOSS_RESPAWN_TICKS);

    for _ in 0..BOSS_RESPAWN_TICKS - 1 {
        assert!(!boss.tick_respawn());
        assert!(boss.respawning);
    }
    assert!(boss.tick_respawn());
    assert_eq!(boss.health, BOSS_HEALTH);
    assert!(!boss.exploded && !boss.respawning);
    assert!(boss.particles.is_empty());

    // Nothing pending any more.
    assert!(!boss.tick_respawn());
}

#[test]
fn tick_respawn_ignores_regular_cars() {
    let mut rng = rng();
    let mut car = Car::traffic(0, 300.0, grey(), 2.0, -1.0);
    car.health = 1;
    car.apply_damage(&mut rng);
    for _ in 0..2 * BOSS_RESPAWN_TICKS {
        assert!(!car.tick_respawn());
    }
    assert_eq!(car.health, 0);
}

#[test]
fn car_moves_along_its_direction() {
    let mut down = Car::traffic(0, 300.0, grey(), 4.0, -1.0);
    let mut up = Car::traffic(6, 300.0, grey(), 4.0, 1.0);
    down.advance(1.0);
    up.advance(1.0);
    assert_eq!(down.y, 296.0);
    assert_eq!(up.y, 304.0);

    // Half a tick covers half the distance.
    up.advance(0.5);
    assert_eq!(up.y, 306.0);
}

#[test]
fn exploded_car_stays_alive_until_particles_drain() {
    let mut rng = rng();
    let mut car = Car::traffic(0, 300.0, grey(), 0.0, -1.0);
    car.health = 1;
    car.apply_damage(&mut rng);

    for _ in 0..EXPLOSION_DURATION - 1 {
        car.advance(1.0);
        assert!(car.is_alive());
        assert!(!car.is_live());
    }
    car.advance(1.0);
    assert!(car.particles.is_empty());
    assert!(!car.is_alive());
}

#[test]
fn respawning_boss_is_kept_alive() {
    let mut rng = rng();
    let mut boss = Car::boss(3, 400.0, 0.0, -1.0);
    boss.health = 1;
    boss.apply_damage(&mut rng);
    for _ in 0..EXPLOSION_DURATION + 5 {
        boss.advance(1.0);
    }
    assert!(boss.particles.is_empty());
    assert!(boss.is_alive());
}

#[test]
fn contains_uses_half_extents() {
    let car = Car::traffic(2, 300.0, grey(), 0.0, -1.0);
    let x = lane_x(2);
    assert!(car.contains(x, 300.0));
    assert!(car.contains(x + CAR_WIDTH / 2.0 - 0.5, 300.0 + CAR_HEIGHT / 2.0 - 0.5));
    assert!(!car.contains(x + CAR_WIDTH / 2.0, 300.0));
    assert!(!car.contains(x, 300.0 - CAR_HEIGHT / 2.0));
}

#[test]
fn overlap_is_tolerant_and_lane_bound() {
    let a = Car::traffic(2, 300.0, grey(), 0.0, -1.0);
    let near = Car::traffic(2, 300.0 + CAR_HEIGHT * 0.8 - 1.0, grey(), 0.0, -1.0);
    let touching = Car::traffic(2, 300.0 + CAR_HEIGHT * 0.8, grey(), 0.0, -1.0);
    let next_lane = Car::traffic(3, 300.0, grey(), 0.0, -1.0);
    assert!(a.overlaps(&near));
    assert!(!a.overlaps(&touching));
    assert!(!a.overlaps(&next_lane));
}

// ── Particles ─────────────────────────────────────────────────────────────────

#[test]
fn burst_particles_start_with_bounded_speed() {
    let mut rng = rng();
    for _ in 0..500 {
        let p = ExplosionParticle::burst(10.0, 20.0, &mut rng);
        let speed = (p.dx * p.dx + p.dy * p.dy).sqrt();
        assert!((2.99..8.01).contains(&speed), "speed {speed}");
        assert_eq!((p.x, p.y), (10.0, 20.0));
        assert_eq!(p.lifetime, EXPLOSION_DURATION);
        assert!((2..=4).contains(&p.size));
    }
}

#[test]
fn particle_moves_then_damps() {
    let mut p = ExplosionParticle {
        x: 0.0,
        y: 0.0,
        dx: 5.0,
        dy: -2.0,
        lifetime: EXPLOSION_DURATION,
        color: RED,
        size: 3,
    };
    p.advance(1.0);
    assert_eq!((p.x, p.y), (5.0, -2.0));
    assert!((p.dx - 5.0 * PARTICLE_DAMPING).abs() < 1e-6);
    assert!((p.dy + 2.0 * PARTICLE_DAMPING).abs() < 1e-6);
    assert_eq!(p.lifetime, EXPLOSION_DURATION - 1);
}

#[test]
fn particle_counts_down_even_at_zero_step() {
    let mut p = ExplosionParticle::burst(1.0, 1.0, &mut rng());
    p.advance(0.0);
    assert_eq!((p.x, p.y), (1.0, 1.0));
    assert_eq!(p.lifetime, EXPLOSION_DURATION - 1);

    for _ in 1..EXPLOSION_DURATION {
        assert!(p.is_alive());
        p.advance(0.0);
    }
    assert!(!p.is_alive());
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn bullets_travel_by_speed() {
    let mut shot = Bullet::player(370.0, 180.0, PlayerId::Two);
    shot.advance(1.0);
    assert_eq!(shot.y, 180.0 + BULLET_SPEED);
    assert_eq!(shot.owner, PlayerId::Two);
    assert!(!shot.is_boss);

    let mut down = Bullet::boss(370.0, 400.0, false);
    let mut up = Bullet::boss(370.0, 400.0, true);
    down.advance(2.0);
    up.advance(2.0);
    assert_eq!(down.y, 400.0 - 2.0 * BOSS_BULLET_SPEED);
    assert_eq!(up.y, 400.0 + 2.0 * BOSS_BULLET_SPEED);
    assert!(up.is_boss);
}

#[test]
fn bullet_bounds_are_inclusive() {
    assert!(Bullet::player(0.0, 0.0, PlayerId::One).in_bounds());
    assert!(Bullet::player(0.0, WINDOW_HEIGHT, PlayerId::One).in_bounds());
    assert!(!Bullet::player(0.0, -0.1, PlayerId::One).in_bounds());
    assert!(!Bullet::player(0.0, WINDOW_HEIGHT + 0.1, PlayerId::One).in_bounds());
}
