//! Option values as they appear in manifests and scripts.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A scalar option value: boolean, integer, or text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum ManifestValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FromStr for ManifestValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => s
                .parse()
                .map_or_else(|_| Self::Text(s.to_string()), Self::Int),
        })
    }
}

impl fmt::Display for ManifestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
