//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autoclick.toml` in the working directory, or at the path in
//! `AUTOCLICK_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use autoclick_domain::error::AutoclickError;
use autoclick_domain::id::RuleId;
use autoclick_domain::region::SearchRegion;
use autoclick_domain::rule::{DEFAULT_CONFIDENCE, Rule, RuleKind, validate_rule_set};
use autoclick_domain::template::{ColorMode, TemplateSet};

const DEFAULT_PATH: &str = "autoclick.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Polling loop settings.
    pub scheduler: SchedulerConfig,
    /// Where template images live.
    pub templates: TemplatesConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Mouse settings.
    pub pointer: PointerConfig,
    /// Rules in evaluation order. Empty means the built-in rule set.
    pub rules: Vec<Rule>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Wait between passes, in milliseconds.
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory template ids are resolved against.
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Log clicks instead of moving the mouse.
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from `autoclick.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("AUTOCLICK_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AUTOCLICK_INTERVAL_MS") {
            if let Ok(interval) = val.parse() {
                self.scheduler.interval_ms = interval;
            }
        }
        if let Some(val) = var("AUTOCLICK_TEMPLATE_DIR") {
            self.templates.dir = PathBuf::from(val);
        }
        if let Some(val) = var("AUTOCLICK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("AUTOCLICK_DRY_RUN") {
            self.pointer.dry_run = matches!(val.trim(), "1" | "true" | "yes" | "on");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "scheduler interval must be non-zero".to_string(),
            ));
        }
        if self.templates.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "template directory must not be empty".to_string(),
            ));
        }
        validate_rule_set(&self.effective_rules()).map_err(|err| match err {
            AutoclickError::Validation(err) => ConfigError::Validation(err.to_string()),
            other => ConfigError::Validation(other.to_string()),
        })
    }

    /// Wait between two passes.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.scheduler.interval_ms)
    }

    /// The configured rules, or the built-in rule set when none are configured.
    #[must_use]
    pub fn effective_rules(&self) -> Vec<Rule> {
        if self.rules.is_empty() {
            default_rules()
        } else {
            self.rules.clone()
        }
    }
}

/// Click the equip button whenever it shows up in the right half of the screen.
fn default_rules() -> Vec<Rule> {
    vec![Rule {
        id: RuleId::new("equip"),
        kind: RuleKind::SimpleClick {
            target: TemplateSet::single("btn.png"),
        },
        search_region: SearchRegion::RightHalf,
        fallback_region: None,
        confidence: DEFAULT_CONFIDENCE,
        color_mode: ColorMode::Color,
    }]
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autoclickd=info,autoclick=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.scheduler.interval_ms, 100);
        assert_eq!(config.templates.dir, PathBuf::from("."));
        assert_eq!(config.logging.filter, "autoclickd=info,autoclick=info");
        assert!(!config.pointer.dry_run);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn should_fall_back_to_equip_button_rule() {
        let rules = Config::default().effective_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id.as_str(), "equip");
        assert_eq!(rules[0].search_region, SearchRegion::RightHalf);
        assert_eq!(
            rules[0].kind,
            RuleKind::SimpleClick {
                target: TemplateSet::single("btn.png")
            }
        );
        assert!(rules[0].validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.interval(), Duration::from_millis(100));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [scheduler]
            interval_ms = 250

            [templates]
            dir = 'assets'

            [logging]
            filter = 'debug'

            [pointer]
            dry_run = true

            [[rules]]
            id = 'confirm'
            kind = 'edge_triggered_click'
            trigger = 't3.png'
            target = 't4.png'

            [[rules]]
            id = 'claim'
            kind = 'rate_limited_click'
            target = ['claim.png', 'claim_alt.png']
            rate_limit_secs = 30
            region = 'right_half'
            fallback_region = 'full_screen'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.interval(), Duration::from_millis(250));
        assert_eq!(config.templates.dir, PathBuf::from("assets"));
        assert_eq!(config.logging.filter, "debug");
        assert!(config.pointer.dry_run);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].fallback_region, Some(SearchRegion::FullScreen));
        assert_eq!(config.effective_rules().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.scheduler.interval_ms, 100);
    }

    #[test]
    fn should_reject_zero_interval() {
        let mut config = Config::default();
        config.scheduler.interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_empty_template_dir() {
        let mut config = Config::default();
        config.templates.dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_duplicate_rule_ids() {
        let toml = "
            [[rules]]
            id = 'a'
            kind = 'simple_click'
            target = 'x.png'

            [[rules]]
            id = 'a'
            kind = 'simple_click'
            target = 'y.png'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: rule id a is used more than once"
        );
    }

    #[test]
    fn should_reject_single_step_sequence() {
        let toml = "
            [[rules]]
            id = 'loot'
            kind = 'edge_triggered_sequence'
            trigger = 'chest.png'
            steps = ['open.png']
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[
            ("AUTOCLICK_INTERVAL_MS", "50"),
            ("AUTOCLICK_TEMPLATE_DIR", "/opt/templates"),
            ("AUTOCLICK_DRY_RUN", "true"),
        ]));
        assert_eq!(config.interval(), Duration::from_millis(50));
        assert_eq!(config.templates.dir, PathBuf::from("/opt/templates"));
        assert!(config.pointer.dry_run);
    }

    #[test]
    fn should_prefer_rust_log_over_autoclick_log() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AUTOCLICK_LOG", "warn"), ("RUST_LOG", "trace")]));
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_ignore_unparsable_interval_override() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("AUTOCLICK_INTERVAL_MS", "fast")]));
        assert_eq!(config.scheduler.interval_ms, 100);
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
