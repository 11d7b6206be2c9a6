use parlor_engine::hand::ScoringMode;
use serde::{Deserialize, Serialize};
use std::fs;

/// Settings shared by `play` and `sim`, resolved from defaults, then the
/// TOML file named by `PARLOR_CONFIG`, then `PARLOR_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// External points balance the session starts from
    pub balance: u64,
    pub buy_in: u32,
    pub seed: Option<u64>,
    /// Pause before each opponent decision, display only
    pub ai_delay_ms: u64,
    pub scoring: ScoringMode,
    /// Opponent policy name, see `parlor_ai::create_opponent`
    pub opponent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub balance: ValueSource,
    pub buy_in: ValueSource,
    pub seed: ValueSource,
    pub ai_delay_ms: ValueSource,
    pub scoring: ValueSource,
    pub opponent: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            balance: ValueSource::Default,
            buy_in: ValueSource::Default,
            seed: ValueSource::Default,
            ai_delay_ms: ValueSource::Default,
            scoring: ValueSource::Default,
            opponent: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            balance: 1_000,
            buy_in: 100,
            seed: None,
            ai_delay_ms: 0,
            scoring: ScoringMode::Simplified,
            opponent: "house".into(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("PARLOR_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.balance {
            cfg.balance = v;
            sources.balance = ValueSource::File;
        }
        if let Some(v) = f.buy_in {
            cfg.buy_in = v;
            sources.buy_in = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.ai_delay_ms {
            cfg.ai_delay_ms = v;
            sources.ai_delay_ms = ValueSource::File;
        }
        if let Some(v) = f.scoring {
            cfg.scoring = v;
            sources.scoring = ValueSource::File;
        }
        if let Some(v) = f.opponent {
            cfg.opponent = v;
            sources.opponent = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("PARLOR_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(balance) = std::env::var("PARLOR_BALANCE")
        && !balance.is_empty()
    {
        cfg.balance = balance
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid balance".into()))?;
        sources.balance = ValueSource::Env;
    }
    if let Ok(buy_in) = std::env::var("PARLOR_BUY_IN")
        && !buy_in.is_empty()
    {
        cfg.buy_in = buy_in
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid buy_in".into()))?;
        sources.buy_in = ValueSource::Env;
    }
    if let Ok(delay) = std::env::var("PARLOR_AI_DELAY_MS")
        && !delay.is_empty()
    {
        cfg.ai_delay_ms = delay
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid ai_delay_ms".into()))?;
        sources.ai_delay_ms = ValueSource::Env;
    }
    if let Ok(scoring) = std::env::var("PARLOR_SCORING")
        && !scoring.is_empty()
    {
        cfg.scoring = scoring.parse().map_err(ConfigError::Invalid)?;
        sources.scoring = ValueSource::Env;
    }
    if let Ok(opponent) = std::env::var("PARLOR_OPPONENT")
        && !opponent.is_empty()
    {
        cfg.opponent = opponent;
        sources.opponent = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    balance: Option<u64>,
    #[serde(default)]
    buy_in: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    ai_delay_ms: Option<u64>,
    #[serde(default)]
    scoring: Option<ScoringMode>,
    #[serde(default)]
    opponent: Option<String>,
}

pub(crate) fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.balance == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: balance must be >0".into(),
        ));
    }
    if cfg.buy_in == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: buy_in must be >0".into(),
        ));
    }
    if u64::from(cfg.buy_in) > cfg.balance {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: buy_in {} exceeds balance {}",
            cfg.buy_in, cfg.balance
        )));
    }
    if let Err(e) = parlor_ai::create_opponent(&cfg.opponent) {
        return Err(ConfigError::Invalid(format!("Invalid configuration: {e}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    const VARS: [&str; 7] = [
        "PARLOR_CONFIG",
        "PARLOR_SEED",
        "PARLOR_BALANCE",
        "PARLOR_BUY_IN",
        "PARLOR_AI_DELAY_MS",
        "PARLOR_SCORING",
        "PARLOR_OPPONENT",
    ];

    fn clear_env() {
        for v in VARS {
            // SAFETY: tests touching the environment are serialized
            unsafe { std::env::remove_var(v) };
        }
    }

    #[test]
    #[serial]
    fn defaults_when_nothing_is_set() {
        clear_env();
        let resolved = load_with_sources().unwrap();
        assert_eq!(resolved.config, Config::default());
        assert_eq!(resolved.sources.buy_in, ValueSource::Default);
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "buy_in = 250\nseed = 9\nscoring = \"canonical\"").unwrap();
        unsafe {
            std::env::set_var("PARLOR_CONFIG", file.path());
            std::env::set_var("PARLOR_SEED", "77");
        }
        let resolved = load_with_sources().unwrap();
        clear_env();

        assert_eq!(resolved.config.buy_in, 250);
        assert_eq!(resolved.sources.buy_in, ValueSource::File);
        assert_eq!(resolved.config.seed, Some(77));
        assert_eq!(resolved.sources.seed, ValueSource::Env);
        assert_eq!(resolved.config.scoring, ScoringMode::Canonical);
    }

    #[test]
    #[serial]
    fn buy_in_above_balance_is_invalid() {
        clear_env();
        unsafe {
            std::env::set_var("PARLOR_BALANCE", "50");
            std::env::set_var("PARLOR_BUY_IN", "80");
        }
        let result = load();
        clear_env();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    #[serial]
    fn unknown_opponent_is_invalid() {
        clear_env();
        unsafe { std::env::set_var("PARLOR_OPPONENT", "shark") };
        let result = load();
        clear_env();
        assert!(matches!(result, Err(ConfigError::Invalid(ref m)) if m.contains("shark")));
    }
}
