use super::{format_xml_string, Action};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voice {
    Man,
    Woman,
    Custom(String),
}

impl From<&str> for Voice {
    /// `man` and `woman` are the platform's built-in voices, anything else
    /// names a provider voice such as `Polly.Joanna-Neural`.
    fn from(name: &str) -> Self {
        match name {
            "man" => Voice::Man,
            "woman" => Voice::Woman,
            other => Voice::Custom(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Say {
    pub txt: String,
    pub voice: Voice,
    pub language: String,
}

impl Action for Say {
    fn as_twiml(&self) -> String {
        let voice_str = match self.voice {
            Voice::Man => "man",
            Voice::Woman => "woman",
            Voice::Custom(ref s) => s.as_str(),
        };
        format_xml_string(
            "Say",
            &[("voice", voice_str), ("language", self.language.as_str())],
            &super::escape(&self.txt),
        )
    }
}
