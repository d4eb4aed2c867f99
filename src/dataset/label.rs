use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Class names in encoded order.
    pub const NAMES: [&'static str; 2] = ["ham", "spam"];

    /// `ham` = 0, `spam` = 1.
    pub fn as_index(self) -> usize {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        Self::NAMES[self.as_index()]
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ham" => Ok(Label::Ham),
            "spam" => Ok(Label::Spam),
            other => Err(format!("unknown label '{}'", other)),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw dataset row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledMessage {
    pub label: Label,
    pub text: String,
}

impl LabeledMessage {
    pub fn new<S: Into<String>>(label: Label, text: S) -> Self {
        LabeledMessage {
            label,
            text: text.into(),
        }
    }
}

/// Encode labels as class ids (`spam` = 1, `ham` = 0), keeping row order.
pub fn encode_labels(messages: &[LabeledMessage]) -> Vec<usize> {
    messages.iter().map(|m| m.label.as_index()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("spam".parse::<Label>().unwrap(), Label::Spam);
        assert_eq!("ham".parse::<Label>().unwrap(), Label::Ham);
        assert!("Spam".parse::<Label>().is_err());
        assert_eq!(Label::Spam.to_string(), "spam");
    }

    #[test]
    fn test_encode_labels() {
        let messages = vec![
            LabeledMessage::new(Label::Ham, "Hello how are you"),
            LabeledMessage::new(Label::Spam, "WIN CASH NOW click here"),
        ];
        assert_eq!(encode_labels(&messages), vec![0, 1]);
    }
}
