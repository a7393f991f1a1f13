
use console::style;

use super::geomap::BoundaryData;
use super::mock::{
    HealthReport, KpiSnapshot, SimulationSummary, SteadyStatePoint,
};
use crate::config::Config;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a numeric series as a one-line terminal sparkline
#[inline]
pub fn sparkline(values: &[f64]) -> String {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return String::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    let span = (max - min).max(f64::EPSILON);

    values
        .iter()
        .map(|value| {
            let level = ((value - min) / span * 7.0).round() as usize;
            SPARK_LEVELS[level.min(7)]
        })
        .collect()
}

fn kpi_card(title: &str, value: &str) {
    println!("  {} {}", style(format!("{title}:")).dim(), style(value).bold().cyan());
}

#[inline]
pub fn render_overview(refresh_ticks: u64) {
    println!();
    println!(
        "{}",
        style("Deep-Sea Offshore Wind Grid-Forming Monitoring Platform")
            .bold()
            .cyan()
    );
    println!(
        "Research demo for grid-forming control stability under weak-grid conditions."
    );
    println!("{}", style(format!("Session refresh #{refresh_ticks}")).dim());
    println!();
}

#[inline]
pub fn render_monitoring(
    kpis: &KpiSnapshot,
    series: &[SteadyStatePoint],
    grid_forming: &[(f64, f64)],
    grid_following: &[(f64, f64)],
) {
    println!();
    println!("{}", style("Live Monitoring").bold().cyan());

    println!("{}", style("Source side (wind farm):").yellow());
    kpi_card("Wind speed", &format!("{:.1} m/s", kpis.wind_speed_ms));
    kpi_card("Active power P", &format!("{:.0} MW", kpis.active_power_mw));
    kpi_card(
        "Reactive power Q",
        &format!("{:.0} MVar", kpis.reactive_power_mvar),
    );

    println!("{}", style("Grid side (HVDC export):").yellow());
    kpi_card("DC bus voltage", &format!("{:.1} kV", kpis.dc_bus_kv));
    kpi_card(
        "Grid frequency",
        &format!("{:.2} Hz", kpis.grid_frequency_hz),
    );

    println!();
    println!("{}", style("24h steady-state run:").yellow());
    let wind: Vec<f64> = series.iter().map(|p| p.wind_speed_ms).collect();
    let power: Vec<f64> = series.iter().map(|p| p.power_total_mw).collect();
    println!("  Wind speed  {}", sparkline(&wind));
    println!("  Total power {}", sparkline(&power));

    println!();
    println!("{}", style("Control strategy comparison (frequency response):").yellow());
    let gfm: Vec<f64> = grid_forming.iter().map(|(_, f)| *f).collect();
    let gfl: Vec<f64> = grid_following.iter().map(|(_, f)| *f).collect();
    println!("  Grid-forming   {}", sparkline(&gfm));
    println!("  Grid-following {}", sparkline(&gfl));
    println!();
}

#[inline]
pub fn render_topology(boundary: &BoundaryData) {
    println!();
    println!("{}", style("Multi-Terminal HVDC Topology").bold().cyan());
    println!(
        "{}",
        style("● Cluster status: grid-connected, stable").green()
    );
    println!();
    println!("  Wind Farm I   ─┐");
    println!("  Wind Farm II  ─┼─▶ Offshore DRU ─▶ Landing Point ─▶ Multi-Port Hub");
    println!("  Wind Farm III ─┘");
    println!();

    match boundary {
        BoundaryData::Available { regions } => {
            println!(
                "  Coastal map: {} boundary regions loaded",
                style(regions).cyan()
            );
        }
        BoundaryData::Unavailable { reason } => {
            println!(
                "  {}",
                style(format!("Coastal map unavailable ({reason})")).yellow()
            );
        }
    }
    println!();
}

#[inline]
pub fn render_documents(config: &Config, summary: &SimulationSummary) {
    println!();
    println!("{}", style("Document Management & Analysis").bold().cyan());

    println!("{}", style("Historical simulation summary:").yellow());
    kpi_card(
        "Avg voltage dip depth",
        &format!("{:.1}%", summary.avg_voltage_dip_pct),
    );
    kpi_card(
        "Frequency recovery time",
        &format!("{:.2} s", summary.recovery_time_s),
    );
    kpi_card(
        "VSG damping ratio",
        &format!("{:.3}", summary.vsg_damping_ratio),
    );

    println!();
    println!(
        "  Knowledge sources directory: {}",
        style(config.paths.docs_dir.display()).cyan()
    );
    println!(
        "  Vector index directory: {}",
        style(config.paths.index_dir.display()).cyan()
    );
    println!("  Rebuild with `gridwatch build` after adding documents.");
    println!();
}

#[inline]
pub fn render_fault_detection(report: &HealthReport) {
    println!();
    println!("{}", style("Fault Detection").bold().cyan());
    println!(
        "{}",
        style("System status: normal operation. Grid-forming algorithm providing inertia support.")
            .green()
    );
    kpi_card("Health score", &report.health_score.to_string());
    kpi_card("Last fault warning", report.last_warning);
    kpi_card("DC voltage ripple", &format!("{:.2}%", report.dc_ripple_pct));
    kpi_card("Harmonic distortion", &format!("{:.1}%", report.thd_pct));
    println!();
}

#[inline]
pub fn render_fault_trigger(fault_type: &str, recovery: &[(f64, f64)]) {
    println!();
    println!("{}", style("Fault Trigger Simulation").bold().cyan());
    println!(
        "{}",
        style(format!(
            "Detected {fault_type}! System entering low-voltage ride-through mode."
        ))
        .red()
    );
    println!();
    println!("{}", style("Voltage recovery (per-unit):").yellow());
    let voltages: Vec<f64> = recovery.iter().map(|(_, v)| *v).collect();
    println!("  {}", sparkline(&voltages));
    println!();
}

#[inline]
pub fn render_manual() {
    println!();
    println!("{}", style("Technical Principles & User Manual").bold().cyan());
    println!();
    println!("  1. Grid-forming converters set voltage and frequency themselves,");
    println!("     emulating synchronous machine inertia in weak grids.");
    println!("  2. The monitoring pages render a simulated steady-state run; no");
    println!("     live acquisition is connected in this demo.");
    println!("  3. The assistant answers from the local document index built with");
    println!("     `gridwatch build`; it declines questions outside its sources.");
    println!();
}
