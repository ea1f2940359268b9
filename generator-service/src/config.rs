use sentry::types::Dsn;
use std::env::var;
use tracing::{error, warn};

#[derive(Clone, Debug)]
pub struct EnvVars {
    pub environment: Environment,
    pub question_table: String,
    pub sentry_dsn: Option<String>,
    pub supabase_key: String,
    pub supabase_url: String,
}

#[derive(Clone, Debug)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" => Environment::Development,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                warn!(
                    "ENVIRONMENT value '{}' is not valid. Defaulting to 'production'.",
                    other
                );
                Environment::Production
            }
        }
    }
}

impl ToString for Environment {
    fn to_string(&self) -> String {
        match self {
            Environment::Development => "development".to_string(),
            Environment::Staging => "staging".to_string(),
            Environment::Production => "production".to_string(),
        }
    }
}

impl EnvVars {
    pub fn new() -> Self {
        let Ok(supabase_url) = var("SUPABASE_URL") else {
            error!("SUPABASE_URL not set");
            panic!("SUPABASE_URL required");
        };
        assert!(!supabase_url.is_empty(), "SUPABASE_URL must not be empty");
        let Ok(supabase_key) = var("SUPABASE_KEY") else {
            error!("SUPABASE_KEY not set");
            panic!("SUPABASE_KEY required");
        };

        let sentry_dsn = match var("SENTRY_DSN") {
            Ok(dsn_string) => {
                assert!(
                    valid_sentry_dsn(&dsn_string),
                    "SENTRY_DSN is not valid DSN."
                );
                Some(dsn_string)
            }
            Err(_e) => {
                if cfg!(not(debug_assertions)) {
                    panic!("SENTRY_DSN is not allowed to be unset outside of a debug build");
                }
                warn!("SENTRY_DSN not set.");
                None
            }
        };

        let question_table = match var("QUESTION_TABLE") {
            Ok(table) => {
                assert!(!table.is_empty(), "QUESTION_TABLE must not be empty");
                table
            }
            Err(_e) => "class12".to_string(),
        };

        let environment = match var("ENVIRONMENT") {
            Ok(v) => v.into(),
            Err(_e) => {
                warn!("ENVIRONMENT not set. Defaulting to 'production'.");
                Environment::Production
            }
        };

        let env_vars = Self {
            environment,
            question_table,
            sentry_dsn,
            supabase_key,
            supabase_url,
        };

        env_vars
    }
}

fn valid_sentry_dsn(url: &str) -> bool {
    url.parse::<Dsn>().is_ok()
}
