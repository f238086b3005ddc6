use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    pub timeout_secs: Option<u64>,
    /// Rows requested per PostgREST page, at most the project's `max_rows`
    pub page_size: Option<usize>,
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,
    #[serde(default = "default_skills_teach_table")]
    pub skills_teach_table: String,
    #[serde(default = "default_skills_learn_table")]
    pub skills_learn_table: String,
    #[serde(default = "default_skills_order_column")]
    pub skills_order_column: String,
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_skills_teach_table() -> String { "user_skills_teach".to_string() }
fn default_skills_learn_table() -> String { "user_skills_learn".to_string() }
fn default_skills_order_column() -> String { "id".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Match list cache, off unless `enabled` is set
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub local_capacity: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_mutual_exchange_weight")]
    pub mutual_exchange: u32,
    #[serde(default = "default_can_teach_me_weight")]
    pub can_teach_me: u32,
    #[serde(default = "default_can_learn_from_me_weight")]
    pub can_learn_from_me: u32,
    #[serde(default = "default_common_teaching_weight")]
    pub common_teaching: u32,
    #[serde(default = "default_common_learning_weight")]
    pub common_learning: u32,
    #[serde(default = "default_bio_bonus")]
    pub bio_bonus: u32,
    #[serde(default = "default_bio_min_chars")]
    pub bio_min_chars: usize,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            mutual_exchange: default_mutual_exchange_weight(),
            can_teach_me: default_can_teach_me_weight(),
            can_learn_from_me: default_can_learn_from_me_weight(),
            common_teaching: default_common_teaching_weight(),
            common_learning: default_common_learning_weight(),
            bio_bonus: default_bio_bonus(),
            bio_min_chars: default_bio_min_chars(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            mutual_exchange: config.mutual_exchange,
            can_teach_me: config.can_teach_me,
            can_learn_from_me: config.can_learn_from_me,
            common_teaching: config.common_teaching,
            common_learning: config.common_learning,
            bio_bonus: config.bio_bonus,
            bio_min_chars: config.bio_min_chars,
        }
    }
}

fn default_mutual_exchange_weight() -> u32 { 40 }
fn default_can_teach_me_weight() -> u32 { 25 }
fn default_can_learn_from_me_weight() -> u32 { 25 }
fn default_common_teaching_weight() -> u32 { 10 }
fn default_common_learning_weight() -> u32 { 15 }
fn default_bio_bonus() -> u32 { 5 }
fn default_bio_min_chars() -> usize { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "full".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SKILLSWAP__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SKILLSWAP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SKILLSWAP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SKILLSWAP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Scoring weights as used by the matcher
    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply the conventional unprefixed variables on top of the loaded config
///
/// `DATABASE_URL`, `SUPABASE_URL` and `SUPABASE_KEY` win over file values.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(supabase_url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", supabase_url)?;
    }
    if let Ok(supabase_key) = env::var("SUPABASE_KEY") {
        builder = builder.set_override("supabase.api_key", supabase_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_scoring_defaults() {
        let weights = WeightsConfig::default();
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_matching_limits() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_limit, 20);
        assert_eq!(matching.max_limit, 100);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "full");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("skillswap-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [supabase]
            url = "http://localhost:54321"
            api_key = "anon"

            [database]
            url = "postgres://localhost/skillswap"

            [scoring.weights]
            bio_bonus = 7
            "#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.supabase.profiles_table, "profiles");
        assert_eq!(settings.matching.default_limit, 20);
        assert!(!settings.cache.enabled);
        assert!(settings.supabase.page_size.is_none());

        let weights = settings.scoring_weights();
        assert_eq!(weights.bio_bonus, 7);
        assert_eq!(weights.mutual_exchange, 40);
    }
}
