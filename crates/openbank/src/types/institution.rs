use std::fmt;

use serde::{Deserialize, Serialize};

/// A financial institution known to the payment system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub ispb_code: String,
    pub number_code: String,
    pub name: String,
    pub short_name: String,
    pub spi_participant: bool,
}

/// Filter for institution listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstitutionContext {
    #[default]
    All,
    /// Instant payment (PIX) participants
    Spi,
    /// Reserve transfer system participants
    Str,
}

impl InstitutionContext {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Spi => "spi",
            Self::Str => "str",
        }
    }
}

impl fmt::Display for InstitutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
