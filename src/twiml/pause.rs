use super::{format_xml_string, Action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pause {
    /// Seconds of silence.
    pub length: u32,
}

impl Action for Pause {
    fn as_twiml(&self) -> String {
        format_xml_string("Pause", &[("length", self.length.to_string().as_str())], "")
    }
}
