use rover_config::{Config, load_toml};
use rstest::rstest;

#[rstest]
fn empty_toml_is_a_valid_default_config() {
    let cfg = load_toml("").expect("parse");
    cfg.validate().expect("defaults validate");
    assert_eq!(cfg.pins.in1, 25);
    assert_eq!(cfg.control.manual_duty, 255);
    assert!((cfg.control.target_velocity_mps - 0.1).abs() < f32::EPSILON);
    assert!(!cfg.timer.enabled);
    assert!((cfg.timer.duration_s - 12.0).abs() < f32::EPSILON);
}

#[rstest]
fn partial_toml_overrides_only_named_fields() {
    let cfg = load_toml(
        r#"
        [control]
        target_velocity_mps = 0.25
        tick_rate_hz = 50

        [safety]
        edge_hits_to_stop = 4
        "#,
    )
    .expect("parse");
    cfg.validate().expect("validate");
    assert!((cfg.control.target_velocity_mps - 0.25).abs() < f32::EPSILON);
    assert_eq!(cfg.control.tick_rate_hz, 50);
    assert_eq!(cfg.safety.edge_hits_to_stop, 4);
    // Untouched sections keep defaults.
    assert!((cfg.safety.max_zero_read_s - 0.5).abs() < f32::EPSILON);
    assert_eq!(cfg.pins.encoder, 32);
}

#[rstest]
#[case("[geometry]\nwheel_radius_m = 0.0", "wheel_radius_m")]
#[case("[geometry]\npulses_per_rev = -1.0", "pulses_per_rev")]
#[case("[control]\ntick_rate_hz = 0", "tick_rate_hz")]
#[case("[control]\ngain_p = -2.0", "gain_p")]
#[case("[safety]\nmax_zero_read_s = 0.0", "max_zero_read_s")]
#[case("[pins]\npwm_a = 3\npwm_b = 3", "pwm_a")]
fn invalid_values_are_rejected(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse");
    let err = cfg.validate().expect_err("must fail validation");
    assert!(
        err.to_string().contains(needle),
        "error {err} should mention {needle}"
    );
}

#[rstest]
fn target_above_max_velocity_is_rejected() {
    let cfg = load_toml(
        r#"
        [geometry]
        max_velocity_mps = 0.5

        [control]
        target_velocity_mps = 0.6
        "#,
    )
    .expect("parse");
    assert!(cfg.validate().is_err());
}

#[rstest]
fn config_loads_from_a_file_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rover.toml");
    std::fs::write(
        &path,
        r#"
        [timer]
        enabled = true
        duration_s = 5.0
        "#,
    )
    .expect("write");
    let text = std::fs::read_to_string(&path).expect("read");
    let cfg: Config = load_toml(&text).expect("parse");
    cfg.validate().expect("validate");
    assert!(cfg.timer.enabled);
    assert!((cfg.timer.duration_s - 5.0).abs() < f32::EPSILON);
}
