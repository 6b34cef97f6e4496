use super::event::CallEvent;
use crate::{
    profile::{ProfileStore, UserProfile},
    twiml::{Pause, Record, Say, Voice, VoiceResponse},
    CONFIG,
};
use axum::{extract::rejection::FormRejection, Extension, Form};
use std::sync::Arc;

/// The voice and locale every spoken line of a call is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceProfile {
    pub voice: String,
    pub language: String,
}

impl VoiceProfile {
    pub fn from_config() -> Self {
        Self {
            voice: CONFIG.settings.voice.to_owned(),
            language: CONFIG.settings.language.to_owned(),
        }
    }

    fn say(&self, txt: impl Into<String>) -> Say {
        Say {
            txt: txt.into(),
            voice: Voice::from(self.voice.as_str()),
            language: self.language.to_owned(),
        }
    }
}

pub async fn incoming_call_handler(
    store: Extension<Arc<dyn ProfileStore>>,
    voice: Extension<VoiceProfile>,
    form: Result<Form<CallEvent>, FormRejection>,
) -> VoiceResponse {
    let call = match form {
        Ok(Form(call)) => call,
        Err(rejection) => {
            log::warn!("Unreadable call event, answering as unknown caller: {}", rejection);
            CallEvent::default()
        }
    };

    respond_to_call(store.0.as_ref(), &voice.0, &call).await
}

/// Looks up the caller and picks the script to answer with. Always produces
/// a response: a failed lookup only changes what is said.
pub async fn respond_to_call(
    store: &dyn ProfileStore,
    voice: &VoiceProfile,
    call: &CallEvent,
) -> VoiceResponse {
    log::info!(
        "Incoming call from: {}",
        call.from.as_deref().unwrap_or_default()
    );
    log::debug!(
        "Call {} to {} is {} ({} more parameters)",
        call.sid.as_deref().unwrap_or("-"),
        call.to.as_deref().unwrap_or("-"),
        call.status.as_deref().unwrap_or("-"),
        call.metadata.len()
    );

    let profile = match call.caller() {
        Some(phone) => store.lookup_by_phone(phone).await,
        None => Ok(None),
    };

    match profile {
        Ok(Some(profile)) => {
            log::debug!("Recognized caller {:?}", profile.full_name);
            generate_known_caller_twiml(voice, &profile)
        }
        Ok(None) => {
            log::debug!("No profile for caller");
            generate_unknown_caller_twiml(voice)
        }
        Err(e) => {
            log::error!("Failed to look up caller: {:?}", e);
            generate_database_error_twiml(voice)
        }
    }
}

/// Generate the TwiML for a caller with a profile.
/// 1. Greet the parent by name
/// 2. Announce this week's topic
/// 3. Explain how to record, then record
fn generate_known_caller_twiml(voice: &VoiceProfile, profile: &UserProfile) -> VoiceResponse {
    let parent = profile.parent_name_or(CONFIG.texts.default_parent_name);
    let topic = profile.topic_or(CONFIG.texts.default_topic);
    let pause = Pause {
        length: CONFIG.settings.pause_seconds as u32,
    };

    VoiceResponse::new()
        .say(voice.say(CONFIG.texts.greeting.replace("$parent", parent)))
        .pause(pause)
        .say(voice.say(CONFIG.texts.topic.replace("$topic", topic)))
        .pause(pause)
        .say(voice.say(CONFIG.texts.instructions))
        .record(recording())
}

/// Generate the TwiML for a number without a profile, which may still record.
fn generate_unknown_caller_twiml(voice: &VoiceProfile) -> VoiceResponse {
    VoiceResponse::new()
        .say(voice.say(CONFIG.texts.unknown_caller))
        .record(recording())
}

/// Generate the TwiML for a failed lookup. The call ends without recording.
fn generate_database_error_twiml(voice: &VoiceProfile) -> VoiceResponse {
    VoiceResponse::new().say(voice.say(CONFIG.texts.database_error))
}

fn recording() -> Record {
    Record {
        max_length: CONFIG.settings.max_recording_seconds as u32,
        finish_on_key: CONFIG.settings.finish_on_key.chars().next().unwrap_or('#'),
    }
}
