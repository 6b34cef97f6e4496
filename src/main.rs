use anyhow::{anyhow, Result};
use axum::{
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use call::incoming::{incoming_call_handler, VoiceProfile};
use profile::{PostgresStore, ProfileStore, SupabaseStore};
use secrets::Secrets;
use signature::SignatureValidator;
use static_toml::static_toml;
use std::sync::Arc;
use tokio::net::TcpListener;

static_toml! { static CONFIG = include_toml!("Config.toml"); }

mod call;
mod profile;
mod secrets;
mod signature;
mod twiml;

#[tokio::main]
async fn main() {
    // Initialize environment and logger
    dotenv::dotenv().ok();
    env_logger::init();

    // Load the secrets
    let secrets = Secrets::from_env();

    // Initialize the profile store
    log::info!("Connecting to the {} profile store", CONFIG.settings.store);
    let store = connect_store(&secrets)
        .await
        .expect("Failed to connect to the profile store");

    // Initialize the webhook signature check
    let validator = signature_validator(&secrets);

    let voice = VoiceProfile::from_config();
    log::info!(
        "Answering calls with voice {} ({})",
        voice.voice,
        voice.language
    );

    // Initialize the TCP listener
    log::info!(
        "Connecting to the server at {}",
        CONFIG.settings.local_address
    );
    let tcp = TcpListener::bind(CONFIG.settings.local_address)
        .await
        .expect("Failed to connect to the server");

    // Start the webserver
    log::info!("Starting the webserver");
    axum::serve(tcp, app(store, voice, validator).into_make_service())
        .await
        .expect("Failed to start the server");
}

/// Builds the store selected by `settings.store`.
async fn connect_store(secrets: &Secrets) -> Result<Arc<dyn ProfileStore>> {
    let table = CONFIG.settings.profile_table;

    match CONFIG.settings.store {
        "supabase" => {
            let url = secrets::require(secrets.supabase_url.as_deref(), "SUPABASE_URL")?;
            let key = secrets::require(secrets.supabase_key.as_deref(), "SUPABASE_KEY")?;
            Ok(Arc::new(SupabaseStore::new(url, key, table)))
        }
        "postgres" => {
            let database_url = secrets::require(secrets.database_url.as_deref(), "DATABASE_URL")?;
            Ok(Arc::new(PostgresStore::connect(database_url, table).await?))
        }
        other => Err(anyhow!("Unknown profile store `{}`", other)),
    }
}

fn signature_validator(secrets: &Secrets) -> Option<SignatureValidator> {
    if !CONFIG.settings.validate_signature {
        log::info!("Webhook signature validation is disabled");
        return None;
    }

    match secrets.twilio_auth_token {
        Some(ref token) => Some(SignatureValidator::new(
            token,
            secrets.global_url.as_deref(),
        )),
        None => {
            log::warn!("TWILIO_AUTH_TOKEN is not set, webhook signatures will not be checked");
            None
        }
    }
}

fn app(
    store: Arc<dyn ProfileStore>,
    voice: VoiceProfile,
    validator: Option<SignatureValidator>,
) -> Router {
    let mut router = Router::new().route("/incoming-call", post(incoming_call_handler));

    if let Some(validator) = validator {
        router = router
            .route_layer(middleware::from_fn(signature::verify))
            .layer(Extension(validator));
    }

    router
        .route("/health_check", get(health_check))
        .fallback(error_handler)
        .layer(Extension(store))
        .layer(Extension(voice))
}

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn error_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not Found" })),
    )
}
