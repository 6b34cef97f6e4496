use super::{ProfileStore, StoreError, UserProfile};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;

const PROFILE_COLUMNS: &str = "full_name,parent_name,current_prompt";

/// Profile lookups through the Supabase REST interface (PostgREST).
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    endpoint: String,
    api_key: String,
    client: ReqwestClient,
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Self {
        Self {
            endpoint: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
            api_key: api_key.to_owned(),
            client: ReqwestClient::new(),
        }
    }
}

#[async_trait]
impl ProfileStore for SupabaseStore {
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<UserProfile>, StoreError> {
        let filter = format!("eq.{phone}");
        let response = self
            .client
            .get(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", PROFILE_COLUMNS),
                ("parent_phone", filter.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::HTTPError(status, body));
        }

        let rows = response
            .json::<Vec<UserProfile>>()
            .await
            .map_err(|e| StoreError::ParsingError(e.to_string()))?;

        Ok(rows.into_iter().next())
    }
}
