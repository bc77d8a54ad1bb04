//! Runtime settings read from the environment.
//!
//! `HOST`, `PORT`, `LEAGUE_SEASON`, `PAIRING_MAX_ATTEMPTS`. Missing or
//! unparseable values fall back to the defaults below.

use crate::logic::{RunOptions, DEFAULT_MAX_ATTEMPTS};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Season stamped on newly generated matches; rolled over by whoever runs the league.
    pub season: u32,
    pub max_attempts: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            season: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            season: parse_or(lookup("LEAGUE_SEASON"), defaults.season),
            max_attempts: parse_or(lookup("PAIRING_MAX_ATTEMPTS"), defaults.max_attempts),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            season: self.season,
            max_attempts: self.max_attempts,
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
