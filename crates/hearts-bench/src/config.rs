use hearts_bot::policy::StrategyKind;
use hearts_bot::search::SearchConfig;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub const SEAT_COUNT: usize = 4;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub agents: Vec<AgentConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate(&self.run_id)?;
        validate_agents(&mut self.agents)?;
        self.metrics.validate(&self.agents)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (`{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    /// Baseline agent used for paired comparisons; the first agent when unset.
    pub fn baseline(&self) -> Option<&str> {
        self.metrics
            .baseline
            .as_deref()
            .or_else(|| self.agents.first().map(|agent| agent.name.as_str()))
    }
}

/// Deal generation block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub deals: usize,
    #[serde(default = "default_rotate_seats")]
    pub rotate_seats: bool,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.deals == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.deals".to_string(),
                message: "number of deals must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Games played from each deal.
    pub fn rotations(&self) -> usize {
        if self.rotate_seats { SEAT_COUNT } else { 1 }
    }
}

fn default_rotate_seats() -> bool {
    true
}

/// A tournament participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: StrategyKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl AgentConfig {
    /// Search parameters: `HEARTS_SIM_*` environment values first, then
    /// whatever the `params` block sets.
    pub fn search_config(&self) -> Result<SearchConfig, ValidationError> {
        self.search_config_from(SearchConfig::from_env())
    }

    pub fn search_config_from(&self, base: SearchConfig) -> Result<SearchConfig, ValidationError> {
        let invalid = |message: String| ValidationError::InvalidField {
            field: format!("agents[{}].params", self.name),
            message,
        };
        let overrides = match &self.params {
            serde_yaml::Value::Null => return Ok(base),
            serde_yaml::Value::Mapping(mapping) => mapping,
            _ => return Err(invalid("expected a mapping".to_string())),
        };

        let mut merged = match serde_yaml::to_value(&base) {
            Ok(serde_yaml::Value::Mapping(mapping)) => mapping,
            Ok(_) => return Err(invalid("search defaults are not a mapping".to_string())),
            Err(err) => return Err(invalid(err.to_string())),
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        serde_yaml::from_value(serde_yaml::Value::Mapping(merged))
            .map_err(|err| invalid(err.to_string()))
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub baseline: Option<String>,
}

impl MetricsConfig {
    fn validate(&self, agents: &[AgentConfig]) -> Result<(), ValidationError> {
        if let Some(baseline) = self.baseline.as_ref()
            && !agents.iter().any(|a| &a.name == baseline)
        {
            return Err(ValidationError::InvalidField {
                field: "metrics.baseline".to_string(),
                message: format!("baseline agent '{baseline}' is not defined in agents list"),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to plain logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_agents(agents: &mut [AgentConfig]) -> Result<(), ValidationError> {
    if agents.len() != SEAT_COUNT {
        return Err(ValidationError::InvalidField {
            field: "agents".to_string(),
            message: format!("exactly {SEAT_COUNT} agents are required, found {}", agents.len()),
        });
    }

    let mut seen = HashSet::new();
    for agent in agents.iter_mut() {
        if agent.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "agents.name".to_string(),
                message: "agent name must not be empty".to_string(),
            });
        }

        if !agent.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("agents[{}].name", agent.name),
                message: "agent name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(agent.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "agents".to_string(),
                message: format!("agent name '{}' defined more than once", agent.name),
            });
        }

        if agent.params.is_null() {
            agent.params = serde_yaml::Value::Mapping(Default::default());
        }
        if agent.kind.uses_search() {
            agent.search_config_from(SearchConfig::default())?;
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the summary, also used for the telemetry log.
    pub fn summary_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
games:
  seed: 123
  deals: 16
agents:
  - name: "mc"
    kind: "simulation"
    params:
      num_simulations: 400
      parallel: false
  - name: "uct"
    kind: "tree_search"
  - name: "random"
    kind: "random"
  - name: "cautious"
    kind: "avoid_points"
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
metrics:
  baseline: "random"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    fn basic() -> BenchmarkConfig {
        serde_yaml::from_str(BASIC_YAML).expect("parse yaml")
    }

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg = basic();
        cfg.validate().expect("validate");

        assert!(cfg.games.rotate_seats);
        assert_eq!(cfg.games.rotations(), 4);
        assert_eq!(cfg.agents[0].kind, StrategyKind::Simulation);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.baseline(), Some("random"));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/games.jsonl")
        );
        assert_eq!(outputs.summary_dir(), PathBuf::from("bench/out/stage0_smoke"));
    }

    #[test]
    fn params_override_search_defaults() {
        let cfg = basic();
        let search = cfg.agents[0]
            .search_config_from(SearchConfig::default())
            .expect("search params");
        assert_eq!(search.num_simulations, 400);
        assert!(!search.parallel);
        assert_eq!(search.min_simulations_per_move, 1000);

        let tuned = SearchConfig {
            exploration: 0.5,
            ..SearchConfig::default()
        };
        let uct = cfg.agents[1].search_config_from(tuned.clone()).expect("defaults");
        assert_eq!(uct, tuned);
    }

    #[test]
    fn rejects_wrong_agent_count() {
        let mut cfg = basic();
        cfg.agents.pop();
        assert_eq!(field_of(cfg.validate().unwrap_err()), "agents");
    }

    #[test]
    fn rejects_duplicate_agents_and_unknown_baseline() {
        let mut cfg = basic();
        cfg.agents[1].name = "mc".to_string();
        assert_eq!(field_of(cfg.validate().unwrap_err()), "agents");

        let mut cfg = basic();
        cfg.metrics.baseline = Some("nobody".to_string());
        assert_eq!(field_of(cfg.validate().unwrap_err()), "metrics.baseline");
    }

    #[test]
    fn rejects_zero_deals_and_bad_run_id() {
        let mut cfg = basic();
        cfg.games.deals = 0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "games.deals");

        let mut cfg = basic();
        cfg.run_id = "has spaces".to_string();
        assert_eq!(field_of(cfg.validate().unwrap_err()), "run_id");
    }

    #[test]
    fn rejects_malformed_search_params() {
        let mut cfg = basic();
        cfg.agents[0].params =
            serde_yaml::from_str("num_simulations: many").expect("yaml value");
        assert_eq!(field_of(cfg.validate().unwrap_err()), "agents[mc].params");
    }

    #[test]
    fn unknown_strategy_kind_fails_to_parse() {
        let yaml = BASIC_YAML.replace("kind: \"random\"", "kind: \"minimax\"");
        assert!(serde_yaml::from_str::<BenchmarkConfig>(&yaml).is_err());
    }

    #[test]
    fn baseline_defaults_to_first_agent() {
        let mut cfg = basic();
        cfg.metrics.baseline = None;
        cfg.validate().expect("validate");
        assert_eq!(cfg.baseline(), Some("mc"));
    }
}
