use std::io::Write;

use car_destroyer::config::{ConfigError, Tuning};

#[test]
fn defaults_are_valid() {
    let t = Tuning::default();
    assert!(t.validate().is_ok());
    assert_eq!(t.tick_rate, 60);
    assert_eq!(t.max_bullets, 20);
    assert_eq!(t.max_pool_cars, 8);
    assert_eq!(t.pool_hard_cap, 10);
    assert_eq!(t.boss_spawn_interval, 2);
}

#[test]
fn empty_file_means_defaults() {
    assert_eq!(Tuning::from_toml_str("").unwrap(), Tuning::default());
}

#[test]
fn partial_override_keeps_the_rest() {
    let t = Tuning::from_toml_str(
        r#"
        tick_rate = 30
        max_bullets = 5
        base_traffic_density = 0.1
        "#,
    )
    .unwrap();
    assert_eq!(t.tick_rate, 30);
    assert_eq!(t.max_bullets, 5);
    assert_eq!(t.base_traffic_density, 0.1);
    assert_eq!(t.max_pool_cars, Tuning::default().max_pool_cars);
}

#[test]
fn unknown_keys_are_rejected() {
    let err = Tuning::from_toml_str("tick_rat = 30").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn wrong_types_are_rejected() {
    let err = Tuning::from_toml_str("max_bullets = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        "tick_rate = 0",
        "difficulty_interval = 0",
        "base_traffic_density = 1.5",
        "density_scale = -0.1",
        "base_traffic_density = 0.5\nmax_traffic_density = 0.4",
        "base_car_speed = 9.0",
        "car_speed_step = -1.0",
        "min_boss_shoot_interval = 0.0",
        "min_boss_shoot_interval = 40.0",
        "max_bullets = 0",
        "max_pool_cars = 0",
        "max_pool_cars = 11",
    ];
    for src in cases {
        let err = Tuning::from_toml_str(src).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{src}: {err}");
    }
}

#[test]
fn load_reads_a_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "controls_overlay_ticks = 60").unwrap();
    let t = Tuning::load(file.path()).unwrap();
    assert_eq!(t.controls_overlay_ticks, 60);
}

#[test]
fn load_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = Tuning::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("cannot read tuning file"));
}
