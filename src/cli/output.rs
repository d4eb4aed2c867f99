//! Output formatting for CLI commands.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SpamkitArgs};
use crate::error::Result;

/// One message and its cleaned form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedText {
    pub input: String,
    pub cleaned: String,
}

/// Result structure for the clean command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanResult {
    pub documents: Vec<CleanedText>,
}

impl Display for CleanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<&str> = self.documents.iter().map(|d| d.cleaned.as_str()).collect();
        write!(f, "{}", lines.join("\n"))
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + Display>(result: &T, args: &SpamkitArgs) -> Result<()> {
    println!("{}", render(result, args)?);
    Ok(())
}

/// Render a result in the specified format without printing it.
pub fn render<T: Serialize + Display>(result: &T, args: &SpamkitArgs) -> Result<String> {
    match args.output_format {
        OutputFormat::Human => Ok(result.to_string()),
        OutputFormat::Json => render_json(result, args.pretty),
    }
}

/// Serialize to JSON, optionally pretty-printed.
pub fn render_json<T: Serialize>(result: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn sample() -> CleanResult {
        CleanResult {
            documents: vec![
                CleanedText {
                    input: "Hello how are you".to_string(),
                    cleaned: "hello".to_string(),
                },
                CleanedText {
                    input: "WIN CASH NOW click here".to_string(),
                    cleaned: "win cash click".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_human_output() {
        let args = SpamkitArgs::try_parse_from(["spamkit", "config"]).unwrap();
        assert_eq!(render(&sample(), &args).unwrap(), "hello\nwin cash click");
    }

    #[test]
    fn test_json_output() {
        let args = SpamkitArgs::try_parse_from(["spamkit", "-f", "json", "config"]).unwrap();
        let json = render(&sample(), &args).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["documents"][1]["cleaned"], "win cash click");
        assert_eq!(value["documents"][0]["input"], "Hello how are you");
    }

    #[test]
    fn test_pretty_json_output() {
        let json = render_json(&sample(), true).unwrap();
        assert!(json.contains("\n  \"documents\""));
    }
}
