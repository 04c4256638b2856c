//! Removal method selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// How the overlay region is repaired in the output video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemovalMethod {
    /// Neighbor-fill repair (FFmpeg `delogo`-style in-painting).
    #[default]
    InPaint,
    /// Strong blur confined to the region.
    Blur,
}

impl RemovalMethod {
    /// All available methods.
    pub const ALL: &'static [RemovalMethod] = &[RemovalMethod::InPaint, RemovalMethod::Blur];

    /// Method name as used in filenames and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            RemovalMethod::InPaint => "inpaint",
            RemovalMethod::Blur => "blur",
        }
    }
}

impl fmt::Display for RemovalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RemovalMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inpaint" | "in_paint" | "delogo" => Ok(RemovalMethod::InPaint),
            "blur" => Ok(RemovalMethod::Blur),
            other => Err(ModelError::UnknownMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("inpaint".parse::<RemovalMethod>().unwrap(), RemovalMethod::InPaint);
        assert_eq!("BLUR".parse::<RemovalMethod>().unwrap(), RemovalMethod::Blur);
        assert!("sharpen".parse::<RemovalMethod>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for m in RemovalMethod::ALL {
            assert_eq!(m.as_str().parse::<RemovalMethod>().unwrap(), *m);
        }
    }
}
