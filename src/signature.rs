use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Checks the `X-Twilio-Signature` header the platform attaches to every webhook.
#[derive(Debug, Clone)]
pub struct SignatureValidator {
    auth_token: String,
    global_url: Option<String>,
}

impl SignatureValidator {
    pub fn new(auth_token: &str, global_url: Option<&str>) -> Self {
        Self {
            auth_token: auth_token.to_owned(),
            global_url: global_url.map(|u| u.trim_end_matches('/').to_owned()),
        }
    }

    /// The signed payload is the full url followed by every POST parameter
    /// as `key` + `value`, sorted by key.
    pub fn is_valid(&self, url: &str, params: &[(String, String)], signature: &str) -> bool {
        let Ok(expected) = BASE64_STANDARD.decode(signature.as_bytes()) else {
            return false;
        };

        let mut params = params.to_vec();
        params.sort();
        let payload: String = params
            .iter()
            .fold(url.to_owned(), |acc, (k, v)| acc + k + v);

        let Ok(mut hasher) = Hmac::<Sha1>::new_from_slice(self.auth_token.as_bytes()) else {
            return false;
        };
        hasher.update(payload.as_bytes());
        hasher.verify_slice(&expected).is_ok()
    }

    /// The url the platform called, as it saw it.
    fn effective_url(&self, request: &Request<Body>) -> Option<String> {
        let path = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        match self.global_url {
            Some(ref base) => Some(format!("{base}{path}")),
            None => {
                let host = request.headers().get(header::HOST)?.to_str().ok()?;
                Some(format!("https://{host}{path}"))
            }
        }
    }
}

/// Middleware that rejects webhook requests whose signature does not match.
pub async fn verify(
    validator: Extension<SignatureValidator>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let signature = match request.headers().get("X-Twilio-Signature") {
        Some(s) => s.to_str().map_err(|_| StatusCode::BAD_REQUEST)?.to_owned(),
        None => {
            log::warn!("Rejecting webhook without signature");
            return Err(StatusCode::FORBIDDEN);
        }
    };

    let url = validator
        .effective_url(&request)
        .ok_or(StatusCode::BAD_REQUEST)?;

    // The body is consumed to read the form, then put back for the handler
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    let params: Vec<(String, String)> = if parts.method == Method::POST {
        url::form_urlencoded::parse(&body).into_owned().collect()
    } else {
        Vec::new()
    };

    if !validator.is_valid(&url, &params, &signature) {
        log::warn!("Rejecting webhook with invalid signature for {}", url);
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next
        .run(Request::from_parts(parts, Body::from(body)))
        .await)
}
