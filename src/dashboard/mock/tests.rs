use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

#[test]
fn steady_state_series_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let series = steady_state_series(&mut rng);

    assert_eq!(series.len(), 24);
    for (i, point) in series.iter().enumerate() {
        assert_eq!(point.hour, i as u32);
        assert!((5.0..=12.0).contains(&point.wind_speed_ms));
        assert!((2000.0..5000.0).contains(&point.power_total_mw));
        assert!((498.0..=502.0).contains(&point.dc_voltage_kv));
    }
}

#[test]
fn steady_state_series_is_seed_deterministic() {
    let mut first_rng = StdRng::seed_from_u64(42);
    let mut second_rng = StdRng::seed_from_u64(42);
    assert_eq!(
        steady_state_series(&mut first_rng),
        steady_state_series(&mut second_rng)
    );
}

#[test]
fn grid_forming_is_better_damped_than_grid_following() {
    let gfm = frequency_response_grid_forming();
    let gfl = frequency_response_grid_following();

    assert_eq!(gfm.len(), 100);
    assert_eq!(gfl.len(), 100);

    let max_dev = |curve: &[(f64, f64)]| {
        curve
            .iter()
            .map(|(_, f)| (f - 50.0).abs())
            .fold(0.0_f64, f64::max)
    };
    assert!(max_dev(&gfm) < max_dev(&gfl));

    // Both settle back toward nominal frequency
    let (_, last_gfm) = gfm[99];
    assert!((last_gfm - 50.0).abs() < 0.01);
}

#[test]
fn voltage_recovery_dips_then_recovers() {
    let curve = voltage_recovery_curve();
    assert_eq!(curve.len(), 100);

    assert!((curve[0].1 - 1.0).abs() < f64::EPSILON);
    assert!((curve[25].1 - 0.4).abs() < f64::EPSILON);
    // Ramp is monotonic during recovery and never overshoots
    for pair in curve[40..70].windows(2) {
        assert!(pair[1].1 >= pair[0].1);
        assert!(pair[1].1 <= 1.0);
    }
    assert!((curve[99].1 - 1.0).abs() < f64::EPSILON);
}

#[test]
fn fixed_figures() {
    let kpis = current_kpis();
    assert!((kpis.grid_frequency_hz - 50.02).abs() < f64::EPSILON);

    let health = health_report();
    assert_eq!(health.health_score, 98);
    assert_eq!(health.last_warning, "none");

    let summary = simulation_summary();
    assert!((summary.vsg_damping_ratio - 0.707).abs() < f64::EPSILON);

    assert_eq!(FAULT_TYPES.len(), 4);
}
