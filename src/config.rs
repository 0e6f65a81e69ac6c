//! Application-level configuration loading: match tunables, ticket signing and the seed catalog.

use std::{
    env,
    fmt::Display,
    fs,
    io::ErrorKind,
    ops::RangeInclusive,
    path::PathBuf,
    time::Duration,
};

use rand::Rng;
use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use tracing::{info, warn};

use crate::{
    dao::models::NewWordEntity,
    state::{
        room::{MatchSettings, ROUND_COUNT_RANGE, ROUND_DURATION_RANGE, SCORE_STEP_RANGE},
        words::Complexity,
    },
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "WORDROOMS_CONFIG_PATH";
/// Environment variable that overrides the configured ticket secret.
const TICKET_SECRET_ENV: &str = "TICKET_SECRET";
const DEFAULT_TICKET_VALIDITY: Duration = Duration::from_secs(60);
const GENERATED_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    match_settings: MatchSettings,
    ticket_validity: Duration,
    ticket_secret: Option<String>,
    admin_token: Option<String>,
    seed_words: Vec<NewWordEntity>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        words = app_config.seed_words.len(),
                        rounds = app_config.match_settings.total_round_count,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Settings copied into every new match.
    pub fn match_settings(&self) -> MatchSettings {
        self.match_settings
    }

    /// How long a realtime admission ticket stays valid.
    pub fn ticket_validity(&self) -> Duration {
        self.ticket_validity
    }

    /// Token expected in `X-Admin-Token`; catalog management is closed when unset.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Words inserted into an empty catalog at startup.
    pub fn seed_words(&self) -> &[NewWordEntity] {
        &self.seed_words
    }

    /// Key used to sign tickets.
    ///
    /// `TICKET_SECRET` wins over the configured secret. Without either, a random key is
    /// generated, so tickets do not survive a restart.
    pub fn resolve_ticket_secret(&self) -> Vec<u8> {
        let from_env = env::var(TICKET_SECRET_ENV)
            .ok()
            .filter(|secret| !secret.is_empty());
        if let Some(secret) = from_env.or_else(|| self.ticket_secret.clone()) {
            return secret.into_bytes();
        }

        warn!("no ticket secret configured; generating an ephemeral one");
        let mut key = [0u8; GENERATED_SECRET_LENGTH];
        rand::rng().fill(&mut key);
        key.to_vec()
    }

    /// Replace the match settings, mostly useful for tests and tooling.
    pub fn with_match_settings(mut self, settings: MatchSettings) -> Self {
        self.match_settings = settings;
        self
    }

    /// Replace the admin token.
    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    /// Replace the seed catalog.
    pub fn with_seed_words(mut self, words: Vec<NewWordEntity>) -> Self {
        self.seed_words = words;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            match_settings: MatchSettings::default(),
            ticket_validity: DEFAULT_TICKET_VALIDITY,
            ticket_secret: None,
            admin_token: None,
            seed_words: default_words(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(rename = "match")]
    match_settings: RawMatchSettings,
    ticket: RawTicket,
    admin_token: Option<String>,
    words: Option<Vec<RawWord>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMatchSettings {
    total_round_count: Option<u32>,
    round_duration_seconds: Option<u64>,
    correct_guess_score: Option<i32>,
    skip_penalty: Option<i32>,
}

impl From<RawMatchSettings> for MatchSettings {
    fn from(value: RawMatchSettings) -> Self {
        let defaults = MatchSettings::default();
        Self {
            total_round_count: bounded(
                "total_round_count",
                value.total_round_count,
                ROUND_COUNT_RANGE,
                defaults.total_round_count,
            ),
            round_duration_seconds: bounded(
                "round_duration_seconds",
                value.round_duration_seconds,
                ROUND_DURATION_RANGE,
                defaults.round_duration_seconds,
            ),
            correct_guess_score: bounded(
                "correct_guess_score",
                value.correct_guess_score,
                SCORE_STEP_RANGE,
                defaults.correct_guess_score,
            ),
            skip_penalty: bounded(
                "skip_penalty",
                value.skip_penalty,
                SCORE_STEP_RANGE,
                defaults.skip_penalty,
            ),
        }
    }
}

/// `value` when it lies in `range`, `default` otherwise.
fn bounded<T>(field: &str, value: Option<T>, range: RangeInclusive<T>, default: T) -> T
where
    T: PartialOrd + Display,
{
    match value {
        Some(value) if range.contains(&value) => value,
        Some(value) => {
            warn!(
                field,
                %value,
                min = %range.start(),
                max = %range.end(),
                "match setting out of range; using default"
            );
            default
        }
        None => default,
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTicket {
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    validity_seconds: Option<Duration>,
    secret: Option<String>,
}

#[derive(Debug, Deserialize)]
/// JSON representation of a seed catalog entry.
struct RawWord {
    text: String,
    complexity: Complexity,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let seed_words = match value.words {
            Some(words) => words
                .into_iter()
                .map(|word| NewWordEntity {
                    text: word.text,
                    complexity: word.complexity,
                })
                .collect(),
            None => default_words(),
        };

        Self {
            match_settings: value.match_settings.into(),
            ticket_validity: value
                .ticket
                .validity_seconds
                .filter(|validity| !validity.is_zero())
                .unwrap_or(DEFAULT_TICKET_VALIDITY),
            ticket_secret: value.ticket.secret.filter(|secret| !secret.is_empty()),
            admin_token: value.admin_token.filter(|token| !token.is_empty()),
            seed_words,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in catalog shipped with the binary.
fn default_words() -> Vec<NewWordEntity> {
    const EASY: &[&str] = &[
        "apple", "house", "river", "guitar", "pillow", "bicycle", "candle", "garden", "window",
        "rabbit", "pizza", "ladder",
    ];
    const INTERMEDIATE: &[&str] = &[
        "lighthouse", "volcano", "passport", "orchestra", "submarine", "telescope",
        "scarecrow", "avalanche",
    ];
    const HARD: &[&str] = &[
        "nostalgia", "bureaucracy", "photosynthesis", "democracy", "procrastination",
        "serendipity",
    ];

    [
        (Complexity::Easy, EASY),
        (Complexity::Intermediate, INTERMEDIATE),
        (Complexity::Hard, HARD),
    ]
    .into_iter()
    .flat_map(|(complexity, words)| {
        words.iter().map(move |text| NewWordEntity {
            text: (*text).to_string(),
            complexity,
        })
    })
    .collect()
}
