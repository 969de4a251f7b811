use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SIMULATIONS: usize = 5000;
pub const DEFAULT_MIN_PER_MOVE: usize = 1000;
pub const DEFAULT_EXPLORATION: f64 = 1.4;
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Budget and tuning knobs shared by the simulation strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub num_simulations: usize,
    pub min_simulations_per_move: usize,
    pub parallel: bool,
    pub time_cap_ms: Option<u64>,
    pub exploration: f64,
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_SIMULATIONS,
            min_simulations_per_move: DEFAULT_MIN_PER_MOVE,
            parallel: true,
            time_cap_ms: None,
            exploration: DEFAULT_EXPLORATION,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn time_cap(&self) -> Option<Duration> {
        self.time_cap_ms.map(Duration::from_millis)
    }

    /// Applies `HEARTS_SIM_*` values from `read`; malformed values are ignored.
    pub fn with_overrides<F>(mut self, mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(value) = read("HEARTS_SIM_SIMULATIONS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
        {
            self.num_simulations = value;
        }

        if let Some(value) = read("HEARTS_SIM_MIN_PER_MOVE")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
        {
            self.min_simulations_per_move = value;
        }

        if let Some(raw) = read("HEARTS_SIM_PARALLEL") {
            self.parallel = matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON");
        }

        if let Some(raw) = read("HEARTS_SIM_TIME_CAP_MS") {
            self.time_cap_ms = raw.trim().parse::<u64>().ok().filter(|ms| *ms > 0);
        }

        if let Some(value) = read("HEARTS_SIM_EXPLORATION")
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
        {
            self.exploration = value;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::SearchConfig;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn defaults_match_documented_budget() {
        let config = SearchConfig::default().with_overrides(|_| None);
        assert_eq!(config.num_simulations, 5000);
        assert_eq!(config.min_simulations_per_move, 1000);
        assert!(config.parallel);
        assert_eq!(config.time_cap(), None);
        assert!((config.exploration - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn reader_overrides_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("HEARTS_SIM_SIMULATIONS", "200"),
            ("HEARTS_SIM_MIN_PER_MOVE", "20"),
            ("HEARTS_SIM_PARALLEL", "off"),
            ("HEARTS_SIM_TIME_CAP_MS", "250"),
            ("HEARTS_SIM_EXPLORATION", "0.7"),
        ]);
        let config =
            SearchConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.num_simulations, 200);
        assert_eq!(config.min_simulations_per_move, 20);
        assert!(!config.parallel);
        assert_eq!(config.time_cap(), Some(Duration::from_millis(250)));
        assert!((config.exploration - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = SearchConfig::default().with_overrides(|key| match key {
            "HEARTS_SIM_SIMULATIONS" => Some("lots".to_string()),
            "HEARTS_SIM_EXPLORATION" => Some("-3".to_string()),
            _ => None,
        });
        assert_eq!(config.num_simulations, 5000);
        assert!((config.exploration - 1.4).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_params_keep_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"num_simulations": 64}"#).unwrap();
        assert_eq!(config.num_simulations, 64);
        assert_eq!(config.min_simulations_per_move, 1000);
    }
}
