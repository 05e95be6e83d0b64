use serde::{Deserialize, Serialize};
use std::fmt;

/// The two timed phases of a full test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Listening,
    Reading,
}

impl Section {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Listening => "listening",
            Section::Reading => "reading",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
