#[cfg(test)]
mod tests;

use rand::Rng;

/// One hourly sample of the simulated steady-state run
#[derive(Debug, Clone, PartialEq)]
pub struct SteadyStatePoint {
    pub hour: u32,
    pub wind_speed_ms: f64,
    pub power_total_mw: f64,
    pub dc_voltage_kv: f64,
}

/// Headline values shown on the live monitoring page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSnapshot {
    pub wind_speed_ms: f64,
    pub active_power_mw: f64,
    pub reactive_power_mvar: f64,
    pub dc_bus_kv: f64,
    pub grid_frequency_hz: f64,
}

/// Static health figures for the fault detection page
#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub health_score: u8,
    pub last_warning: &'static str,
    pub dc_ripple_pct: f64,
    pub thd_pct: f64,
}

/// Historical simulation summary for the documents page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub avg_voltage_dip_pct: f64,
    pub recovery_time_s: f64,
    pub vsg_damping_ratio: f64,
}

/// Fault types offered by the fault trigger panel
pub const FAULT_TYPES: [&str; 4] = [
    "No fault",
    "Three-phase short circuit",
    "DC-side breaker open",
    "Wind gust drop",
];

/// Simulated 24-hour steady-state series: wind speed between 5 and 12 m/s,
/// total power between 2000 and 5000 MW, DC bus voltage jittering around
/// 500 kV.
#[inline]
pub fn steady_state_series<R: Rng>(rng: &mut R) -> Vec<SteadyStatePoint> {
    (0..24)
        .map(|hour| SteadyStatePoint {
            hour,
            wind_speed_ms: (rng.gen_range(5.0..12.0) * 10.0).round() / 10.0,
            power_total_mw: rng.gen_range(2000..5000) as f64,
            dc_voltage_kv: ((500.0 + rng.gen_range(-2.0..2.0)) * 100.0).round() / 100.0,
        })
        .collect()
}

#[inline]
pub fn current_kpis() -> KpiSnapshot {
    KpiSnapshot {
        wind_speed_ms: 12.5,
        active_power_mw: 50.0,
        reactive_power_mvar: 8.0,
        dc_bus_kv: 30.0,
        grid_frequency_hz: 50.02,
    }
}

#[inline]
pub fn health_report() -> HealthReport {
    HealthReport {
        health_score: 98,
        last_warning: "none",
        dc_ripple_pct: 0.02,
        thd_pct: 1.2,
    }
}

#[inline]
pub fn simulation_summary() -> SimulationSummary {
    SimulationSummary {
        avg_voltage_dip_pct: 12.4,
        recovery_time_s: 0.42,
        vsg_damping_ratio: 0.707,
    }
}

/// Frequency response under grid-forming control: a tightly damped
/// oscillation around 50 Hz.
#[inline]
pub fn frequency_response_grid_forming() -> Vec<(f64, f64)> {
    frequency_response(0.02, 1.0)
}

/// Frequency response under conventional grid-following control: larger
/// swings, slower decay.
#[inline]
pub fn frequency_response_grid_following() -> Vec<(f64, f64)> {
    frequency_response(0.08, 0.3)
}

fn frequency_response(amplitude: f64, decay: f64) -> Vec<(f64, f64)> {
    (0..100)
        .map(|i| {
            let t = f64::from(i) * 0.1;
            (t, 50.0 + amplitude * (-decay * t).exp() * (2.0 * t).sin())
        })
        .collect()
}

/// Per-unit voltage over a simulated fault: nominal, a dip to 0.4 pu, then
/// a ramped recovery back to nominal.
#[inline]
pub fn voltage_recovery_curve() -> Vec<(f64, f64)> {
    (0..100)
        .map(|i| {
            let t = f64::from(i) * 5.0 / 99.0;
            let v = match i {
                20..=39 => 0.4,
                40..=69 => (0.4 + 0.6 * (f64::from(i) - 40.0) / 30.0).min(1.0),
                _ => 1.0,
            };
            (t, v)
        })
        .collect()
}
