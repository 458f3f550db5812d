use crate::errors::{Error, Result};
use std::str::FromStr;

/// Output mode a log stream was produced in
///
/// Only the two machine-readable modes can be decoded. `Pretty` stands for
/// any human-oriented `--pretty=<name>` output and is refused before any
/// stream is opened, since its free-form text cannot be decoded losslessly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `commit <id> <parents>... (key=value)...` headers, annotation lines allowed
    #[default]
    Default,
    /// Plain `--pretty=raw` records: metadata only
    Raw,
    Pretty(String),
}

impl LogFormat {
    /// Reject modes the stream parser cannot decode
    pub fn ensure_parsable(&self) -> Result<()> {
        match self {
            LogFormat::Pretty(name) => Err(Error::InvalidMode(format!(
                "pretty format {name:?} cannot be parsed back into commits"
            ))),
            LogFormat::Default | LogFormat::Raw => Ok(()),
        }
    }

    pub fn allows_annotations(&self) -> bool {
        matches!(self, LogFormat::Default)
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Ok(match value {
            "" | "default" => LogFormat::Default,
            "raw" => LogFormat::Raw,
            other => LogFormat::Pretty(other.to_string()),
        })
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Default => write!(f, "default"),
            LogFormat::Raw => write!(f, "raw"),
            LogFormat::Pretty(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", LogFormat::Default)]
    #[case("raw", LogFormat::Raw)]
    #[case("oneline", LogFormat::Pretty("oneline".to_string()))]
    fn parses_mode_names(#[case] name: &str, #[case] expected: LogFormat) {
        assert_eq!(name.parse::<LogFormat>().unwrap(), expected);
    }

    #[test]
    fn pretty_is_not_parsable() {
        let err = LogFormat::Pretty("medium".to_string())
            .ensure_parsable()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMode(_)));
        assert!(LogFormat::Raw.ensure_parsable().is_ok());
        assert!(LogFormat::Default.ensure_parsable().is_ok());
    }
}
