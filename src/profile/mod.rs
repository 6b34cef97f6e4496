mod postgres;
mod supabase;

pub use postgres::PostgresStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A family member's profile, keyed by the phone number the parent calls from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub parent_name: Option<String>,
    pub current_prompt: Option<String>,
}

impl UserProfile {
    /// The parent's name, or `default` when it is missing or empty.
    pub fn parent_name_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(self.parent_name.as_deref()).unwrap_or(default)
    }

    /// This week's topic, or `default` when it is missing or empty.
    pub fn topic_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty(self.current_prompt.as_deref()).unwrap_or(default)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read-only access to the profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Finds at most one profile whose caller phone exactly equals `phone`.
    /// When several rows match, the store's own ordering decides which one.
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<UserProfile>, StoreError>;
}

/// The lookup could not be completed.
#[derive(Debug)]
pub enum StoreError {
    ReqwestError(reqwest::Error),
    HTTPError(reqwest::StatusCode, String),
    SqlxError(sqlx::Error),
    ParsingError(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            StoreError::ReqwestError(ref e) => e.fmt(f),
            StoreError::HTTPError(ref s, ref body) => {
                write!(f, "Invalid HTTP status code: {}: {}", s, body)
            }
            StoreError::SqlxError(ref e) => e.fmt(f),
            StoreError::ParsingError(ref e) => write!(f, "Parsing error: {}", e),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            StoreError::ReqwestError(ref e) => Some(e),
            StoreError::SqlxError(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::ReqwestError(e)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::SqlxError(e)
    }
}
