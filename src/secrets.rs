use anyhow::{anyhow, Result};
use std::env::var;

#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub database_url: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub global_url: Option<String>,
}

impl Secrets {
    /// Reads every secret from the environment. Which ones are actually
    /// required depends on the configured store, see [`require`].
    pub fn from_env() -> Self {
        Self {
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_key: non_empty_var("SUPABASE_KEY"),
            database_url: non_empty_var("DATABASE_URL"),
            twilio_auth_token: non_empty_var("TWILIO_AUTH_TOKEN"),
            global_url: non_empty_var("GLOBAL_URL"),
        }
    }
}

/// Fails with `"{name} must be set"` when a needed secret is absent.
pub fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value.ok_or_else(|| anyhow!("{name} must be set"))
}

fn non_empty_var(name: &str) -> Option<String> {
    var(name).ok().filter(|v| !v.is_empty())
}
