use serde::Deserialize;
use std::collections::BTreeMap;

/// The form-encoded body the telephony platform posts for an incoming call.
///
/// Every field is optional: a request without a caller number is still a
/// call to answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallEvent {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
    #[serde(rename = "CallSid")]
    pub sid: Option<String>,
    #[serde(rename = "CallStatus")]
    pub status: Option<String>,
    /// Remaining platform parameters, kept but not used.
    #[serde(flatten)]
    pub metadata: BTreeMap<String, String>,
}

impl CallEvent {
    /// The caller's number as sent, or `None` when absent or empty.
    pub fn caller(&self) -> Option<&str> {
        self.from.as_deref().filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request, Form};

    async fn parse(body: &str) -> CallEvent {
        let request = Request::post("/incoming-call")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap();

        Form::<CallEvent>::from_request(request, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn parses_platform_fields() {
        let event = parse(
            "CallSid=CA123&From=%2B15550001111&To=%2B15550009999&CallStatus=ringing&Direction=inbound",
        )
        .await;

        assert_eq!(event.caller(), Some("+15550001111"));
        assert_eq!(event.to.as_deref(), Some("+15550009999"));
        assert_eq!(event.sid.as_deref(), Some("CA123"));
        assert_eq!(event.status.as_deref(), Some("ringing"));
        assert_eq!(
            event.metadata.get("Direction").map(String::as_str),
            Some("inbound")
        );
    }

    #[tokio::test]
    async fn missing_caller_is_none() {
        assert_eq!(parse("CallSid=CA123").await.caller(), None);
        assert_eq!(parse("From=").await.caller(), None);
    }
}
