mod pause;
mod record;
mod say;

pub use pause::Pause;
pub use record::Record;
pub use say::{Say, Voice};

use std::borrow::Cow;

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

/// A single TwiML verb that knows how to render itself.
pub trait Action {
    fn as_twiml(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Say(Say),
    Pause(Pause),
    Record(Record),
}

impl Action for Verb {
    fn as_twiml(&self) -> String {
        match self {
            Verb::Say(s) => s.as_twiml(),
            Verb::Pause(p) => p.as_twiml(),
            Verb::Record(r) => r.as_twiml(),
        }
    }
}

/// The response document returned to the telephony platform.
///
/// Built by value: every builder method consumes the response and returns it
/// with one more verb appended, so a finished response is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, say: Say) -> Self {
        self.verbs.push(Verb::Say(say));
        self
    }

    pub fn pause(mut self, pause: Pause) -> Self {
        self.verbs.push(Verb::Pause(pause));
        self
    }

    pub fn record(mut self, record: Record) -> Self {
        self.verbs.push(Verb::Record(record));
        self
    }

    pub fn as_twiml(&self) -> String {
        let inner: String = self.verbs.iter().map(Action::as_twiml).collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>{}",
            format_xml_string("Response", &[], &inner)
        )
    }
}

#[cfg(test)]
impl VoiceResponse {
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    /// The text of every `Say` verb, in order.
    pub fn spoken_lines(&self) -> Vec<&str> {
        self.verbs
            .iter()
            .filter_map(|v| match v {
                Verb::Say(s) => Some(s.txt.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/xml")], self.as_twiml()).into_response()
    }
}

/// Renders an element. Attribute values are escaped, `inner` is
/// expected to be already rendered markup.
fn format_xml_string(tag: &str, attrs: &[(&str, &str)], inner: &str) -> String {
    let attrs: String = attrs
        .iter()
        .map(|(k, v)| format!(" {}=\"{}\"", k, escape(v)))
        .collect();

    if inner.is_empty() {
        format!("<{tag}{attrs}/>")
    } else {
        format!("<{tag}{attrs}>{inner}</{tag}>")
    }
}

fn escape(s: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joanna(txt: &str) -> Say {
        Say {
            txt: txt.to_owned(),
            voice: Voice::Custom("Polly.Joanna-Neural".to_owned()),
            language: "en-US".to_owned(),
        }
    }

    #[test]
    fn empty_response() {
        assert_eq!(
            VoiceResponse::new().as_twiml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response/>"
        );
    }

    #[test]
    fn renders_verbs_in_order() {
        let twiml = VoiceResponse::new()
            .say(joanna("Hello"))
            .pause(Pause { length: 1 })
            .record(Record {
                max_length: 3600,
                finish_on_key: '#',
            })
            .as_twiml();

        assert_eq!(
            twiml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>\
             <Say voice=\"Polly.Joanna-Neural\" language=\"en-US\">Hello</Say>\
             <Pause length=\"1\"/>\
             <Record maxLength=\"3600\" finishOnKey=\"#\"/>\
             </Response>"
        );
    }

    #[test]
    fn escapes_text() {
        let twiml = VoiceResponse::new().say(joanna("Tom & <Jerry>")).as_twiml();
        assert!(twiml.contains(">Tom &amp; &lt;Jerry&gt;</Say>"));
    }

    #[test]
    fn escapes_attributes() {
        assert_eq!(
            format_xml_string("Say", &[("voice", "a\"b")], "x"),
            "<Say voice=\"a&quot;b\">x</Say>"
        );
    }

    #[test]
    fn spoken_lines_skip_other_verbs() {
        let response = VoiceResponse::new()
            .say(joanna("one"))
            .pause(Pause { length: 1 })
            .say(joanna("two"));

        assert_eq!(response.spoken_lines(), vec!["one", "two"]);
        assert_eq!(response.verbs().len(), 3);
    }

    #[test]
    fn into_response_sets_xml_content_type() {
        let response = VoiceResponse::new().into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml"
        );
    }
}
