//! Impulse response integration tests
//!
//! Exercises the full engine through `compute_impulse_response`:
//! - Anechoic reduction to the direct path
//! - Causality of the direct-path pulse
//! - Reflection-order monotonicity
//! - Determinism and reference values
//! - Directional patterns and the DC blocker

use approx::assert_abs_diff_eq;
use rir_core::{
    AccumulationMode, BeamPatternKind, MicrophoneOrientation, ReflectionOrderLimit, RirParams,
    RoomGeometry, Vec3, WallReflectionCoefficients,
};
use rir_dsp::{DcBlocker, compute_impulse_response, tap_count};
use std::f64::consts::PI;

const SAMPLE_RATE: f64 = 16000.0;
const SOUND_SPEED: f64 = 340.0;
const LEN: usize = 4000;

const WALLS: WallReflectionCoefficients =
    WallReflectionCoefficients::new([0.9, 0.8, 0.7, 0.85, 0.6, 0.75]);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 4 x 3 x 2 m room, source 0.5 m in front of the microphone along +x
fn scene() -> RirParams {
    RirParams::new(
        SAMPLE_RATE,
        RoomGeometry::new(4.0, 3.0, 2.0).unwrap(),
        Vec3::new(2.0, 1.5, 1.0),
        Vec3::new(2.5, 1.5, 1.0),
    )
    .with_sound_speed(SOUND_SPEED)
}

fn render(params: &RirParams, len: usize) -> Vec<f64> {
    let mut buffer = vec![0.0; len];
    compute_impulse_response(params, &mut buffer);
    buffer
}

fn peak_index(signal: &[f64]) -> usize {
    signal
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn energy(signal: &[f64]) -> f64 {
    signal.iter().map(|x| x * x).sum()
}

/// First index where two responses differ
fn first_difference(a: &[f64], b: &[f64]) -> Option<usize> {
    a.iter().zip(b).position(|(x, y)| x != y)
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECT PATH
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_anechoic_direct_path_scenario() {
    init_logging();
    let params = scene().with_order(ReflectionOrderLimit::Max(0));
    let rir = render(&params, LEN);

    let tw = tap_count(SAMPLE_RATE);
    let direct = 0.5 / (SOUND_SPEED / SAMPLE_RATE);
    let arrival = direct.floor() as i64;
    assert_eq!(arrival, 23);

    // Support is the kernel window around the arrival
    let first = (arrival - tw as i64 / 2 + 1).max(0) as usize;
    let last = (arrival + tw as i64 / 2) as usize;
    for (i, &s) in rir.iter().enumerate() {
        if i < first || i > last {
            assert_eq!(s, 0.0, "sample {i} should be silent");
        }
    }

    // Peak sits at the rounded arrival sample
    assert_eq!(peak_index(&rir), 24);

    // Peak is the spherical-spreading gain shaped by the kernel
    let spreading = 1.0 / (4.0 * PI * 0.5);
    let peak = rir[24];
    assert!(peak > 0.5 * spreading && peak < spreading, "peak {peak}");
    assert_abs_diff_eq!(peak, 0.1071802263538376, epsilon = 1e-10);
}

#[test]
fn test_anechoic_reduction_ignores_order_limit() {
    // Zero coefficients silence every reflected image, whatever the limit
    let direct_only = render(&scene().with_order(ReflectionOrderLimit::Max(0)), LEN);
    let unlimited = render(&scene().with_order(ReflectionOrderLimit::Unlimited), LEN);
    assert_eq!(direct_only, unlimited);
}

#[test]
fn test_causality() {
    // Source far enough away that the kernel window starts after index 0
    let mut params = scene().with_walls(WALLS);
    params.source = Vec3::new(3.8, 2.8, 1.8);
    let rir = render(&params, LEN);

    let tw = tap_count(SAMPLE_RATE) as i64;
    let direct = params.source.distance_to(&params.mic) / (SOUND_SPEED / SAMPLE_RATE);
    let earliest = direct.floor() as i64 - tw / 2;
    assert!(earliest > 0);

    assert!(rir[..earliest as usize].iter().all(|&s| s == 0.0));
    assert!(rir[earliest as usize..].iter().any(|&s| s != 0.0));
    assert!(rir.iter().all(|s| s.is_finite()));
}

// ═══════════════════════════════════════════════════════════════════════════════
// REFLECTION ORDER
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_reflection_order_monotonicity() {
    let order = |n| render(&scene().with_walls(WALLS).with_order(ReflectionOrderLimit::Max(n)), 800);
    let o0 = order(0);
    let o1 = order(1);
    let o2 = order(2);

    let cts = SOUND_SPEED / SAMPLE_RATE;
    let half = tap_count(SAMPLE_RATE) as f64 / 2.0;

    // Nearest first-order image: floor bounce, 0.5 m across and 2 m down
    let first_order = (0.5f64.powi(2) + 2.0f64.powi(2)).sqrt() / cts;
    let bound1 = (first_order.floor() - half + 1.0) as usize;
    assert_eq!(first_difference(&o0, &o1), Some(bound1));

    // Nearest second-order image: floor plus side wall (2 m and 3 m)
    let second_order = (0.5f64.powi(2) + 2.0f64.powi(2) + 3.0f64.powi(2)).sqrt() / cts;
    let bound2 = (second_order.floor() - half + 1.0) as usize;
    assert_eq!(first_difference(&o1, &o2), Some(bound2));

    assert!(energy(&o0) < energy(&o1));
    assert!(energy(&o1) < energy(&o2));
}

#[test]
fn test_order_limit_admits_more_images() {
    let mut admitted = Vec::new();
    for n in 0..5 {
        let mut buffer = vec![0.0; 800];
        let params = scene().with_walls(WALLS).with_order(ReflectionOrderLimit::Max(n));
        admitted.push(compute_impulse_response(&params, &mut buffer).admitted);
    }
    assert!(admitted.windows(2).all(|w| w[0] < w[1]), "{admitted:?}");
}

// ═══════════════════════════════════════════════════════════════════════════════
// DETERMINISM AND REFERENCE VALUES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_determinism() {
    let params = scene().with_walls(WALLS).with_high_pass(true);
    assert_eq!(render(&params, 1500), render(&params, 1500));

    let parallel = params.with_accumulation(AccumulationMode::Parallel);
    assert_eq!(render(&parallel, 1500), render(&parallel, 1500));
}

#[test]
fn test_reverberant_reference_values() {
    let rir = render(&scene().with_walls(WALLS), 800);
    let expected = [
        (24, 0.1071802263538376),
        (97, 0.05211274877524774),
        (171, 0.0404635347052584),
        (400, 0.029920511349113284),
        (700, -0.0005081817087129228),
    ];
    for (i, value) in expected {
        assert_abs_diff_eq!(rir[i], value, epsilon = 1e-10);
    }
}

#[test]
fn test_cardioid_reference_values() {
    let params = scene()
        .with_walls(WALLS)
        .with_order(ReflectionOrderLimit::Max(3))
        .with_pattern(BeamPatternKind::Cardioid, MicrophoneOrientation::new(0.3, 0.2));
    let rir = render(&params, 800);
    let expected = [
        (24, 0.10376618049819403),
        (97, 0.032530736687416836),
        (171, 0.02388019753572863),
        (400, 0.006645144894604673),
    ];
    for (i, value) in expected {
        assert_abs_diff_eq!(rir[i], value, epsilon = 1e-10);
    }
}

#[test]
fn test_high_pass_reference_values() {
    let rir = render(&scene().with_walls(WALLS).with_high_pass(true), 800);
    let expected = [
        (24, 0.10422949907982122),
        (400, 0.028284143100823167),
        (700, -0.0018727979352400892),
    ];
    for (i, value) in expected {
        assert_abs_diff_eq!(rir[i], value, epsilon = 1e-10);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIRECTIVITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_cardioid_rejects_rear_source() {
    // Source is along +x; a cardioid facing -x has a null towards it
    let params = scene()
        .with_order(ReflectionOrderLimit::Max(0))
        .with_pattern(BeamPatternKind::Cardioid, MicrophoneOrientation::new(PI, 0.0));
    let rir = render(&params, LEN);
    assert!(rir.iter().all(|s| s.abs() < 1e-12));
}

#[test]
fn test_dipole_rear_lobe_inverts_polarity() {
    let front = scene()
        .with_order(ReflectionOrderLimit::Max(0))
        .with_pattern(BeamPatternKind::Dipole, MicrophoneOrientation::new(0.0, 0.0));
    let back = scene()
        .with_order(ReflectionOrderLimit::Max(0))
        .with_pattern(BeamPatternKind::Dipole, MicrophoneOrientation::new(PI, 0.0));
    let omni = scene().with_order(ReflectionOrderLimit::Max(0));

    let front = render(&front, 200);
    let back = render(&back, 200);
    let omni = render(&omni, 200);

    for i in 0..200 {
        assert!((front[i] - omni[i]).abs() < 1e-12);
        assert!((back[i] + omni[i]).abs() < 1e-12);
    }
}

#[test]
fn test_omni_ignores_orientation() {
    let a = scene()
        .with_walls(WALLS)
        .with_pattern(BeamPatternKind::Omni, MicrophoneOrientation::new(1.0, -0.4));
    let b = scene().with_walls(WALLS);
    assert_eq!(render(&a, 600), render(&b, 600));
}

// ═══════════════════════════════════════════════════════════════════════════════
// HIGH-PASS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_dc_blocker_on_silence() {
    let mut silence = vec![0.0; LEN];
    DcBlocker::apply(&mut silence, SAMPLE_RATE);
    assert!(silence.iter().all(|&s| s == 0.0));
}

#[test]
fn test_high_pass_reduces_dc_content() {
    let raw = render(&scene().with_walls(WALLS), LEN);
    let filtered = render(&scene().with_walls(WALLS).with_high_pass(true), LEN);

    let raw_dc: f64 = raw.iter().sum();
    let filtered_dc: f64 = filtered.iter().sum();
    assert!(filtered_dc.abs() < raw_dc.abs());
}

#[test]
fn test_coincident_source_is_singular() {
    let mut params = scene().with_order(ReflectionOrderLimit::Max(0));
    params.source = params.mic;
    let rir = render(&params, 200);
    assert!(rir.iter().any(|s| !s.is_finite()));
}
