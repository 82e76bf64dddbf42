//! Configuration types for schedule projection.

use pyo3::prelude::*;

/// Days searched ahead for the first usable shift.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 14;
/// Upper bound of simulated days for a single completion-time calculation.
pub const DEFAULT_MAX_SIMULATION_DAYS: u32 = 365;

/// Per-machine projection settings.
#[pyclass]
#[derive(Clone, Debug)]
pub struct PlannerConfig {
    /// Machine efficiency in percent (clamped to 1..=100 before use)
    #[pyo3(get, set)]
    pub efficiency_percent: f64,
    /// Attribute key configured as "this column holds the order duration"
    #[pyo3(get, set)]
    pub duration_field: Option<String>,
    /// Look-ahead window (days) when searching for the next shift start
    #[pyo3(get, set)]
    pub lookahead_days: u32,
    /// Safety cap (days of simulated time) for completion-time calculation
    #[pyo3(get, set)]
    pub max_simulation_days: u32,
    /// Logging verbosity (0-3), see `logging`
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            efficiency_percent: 100.0,
            duration_field: None,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            max_simulation_days: DEFAULT_MAX_SIMULATION_DAYS,
            verbosity: 0,
        }
    }
}

impl PlannerConfig {
    /// Efficiency as a factor in `[0.01, 1.0]`.
    ///
    /// Out-of-range percentages are clamped, non-finite ones fall back to 100%.
    pub fn efficiency_factor(&self) -> f64 {
        let percent = if self.efficiency_percent.is_finite() {
            self.efficiency_percent.clamp(1.0, 100.0)
        } else {
            100.0
        };
        percent / 100.0
    }
}

#[pymethods]
impl PlannerConfig {
    #[new]
    #[pyo3(signature = (
        efficiency_percent=None,
        duration_field=None,
        lookahead_days=None,
        max_simulation_days=None,
        verbosity=None
    ))]
    fn new(
        efficiency_percent: Option<f64>,
        duration_field: Option<String>,
        lookahead_days: Option<u32>,
        max_simulation_days: Option<u32>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            efficiency_percent: efficiency_percent.unwrap_or(defaults.efficiency_percent),
            duration_field,
            lookahead_days: lookahead_days.unwrap_or(defaults.lookahead_days),
            max_simulation_days: max_simulation_days.unwrap_or(defaults.max_simulation_days),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "PlannerConfig(efficiency_percent={}, duration_field={:?}, lookahead_days={})",
            self.efficiency_percent, self.duration_field, self.lookahead_days
        )
    }
}
