use super::{format_xml_string, Action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Upper bound on the recording, in seconds.
    pub max_length: u32,
    /// Key that ends the recording early.
    pub finish_on_key: char,
}

impl Action for Record {
    fn as_twiml(&self) -> String {
        let max_length = self.max_length.to_string();
        let finish_on_key = self.finish_on_key.to_string();
        format_xml_string(
            "Record",
            &[
                ("maxLength", max_length.as_str()),
                ("finishOnKey", finish_on_key.as_str()),
            ],
            "",
        )
    }
}
