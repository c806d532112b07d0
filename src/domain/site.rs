//! Site identity and network addressing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TillrollError;

/// Identifier of a retail site: exactly 5 ASCII digits.
///
/// Validated at construction; every other part of the pipeline can rely on the
/// shape without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteId(String);

impl SiteId {
    /// Parse a token into a site id.
    ///
    /// A token is accepted iff it is exactly 5 ASCII digits after trimming
    /// surrounding whitespace.
    pub fn parse(token: &str) -> Result<Self, TillrollError> {
        let trimmed = token.trim();
        if trimmed.len() == 5 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(TillrollError::Validation(format!(
                "site id must be exactly 5 ASCII digits, got {token:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host fragment a candidate address is built from: the first three digits,
    /// a dot, and the integer value of the remaining digits (leading zeros are
    /// dropped): `"10234"` becomes `"102.34"`, `"10203"` becomes `"102.3"`.
    pub fn host_fragment(&self) -> String {
        let (head, tail) = self.0.split_at(3);
        let tail_value = tail
            .bytes()
            .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        format!("{head}.{tail_value}")
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SiteId {
    type Err = TillrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SiteId {
    type Error = TillrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SiteId> for String {
    fn from(value: SiteId) -> Self {
        value.0
    }
}

/// Addressing-series selector.
///
/// Each series maps to a list of network prefixes candidate endpoints are
/// built from. Both series carry a single prefix today; `prefixes` returns a
/// slice so a series can grow to N prefixes without touching the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Series {
    /// The `10.16.` network.
    Sixteen,
    /// The `10.28.` network.
    TwentyEight,
}

impl Series {
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Series::Sixteen => &["10.16."],
            Series::TwentyEight => &["10.28."],
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Sixteen => f.write_str("16"),
            Series::TwentyEight => f.write_str("28"),
        }
    }
}

impl FromStr for Series {
    type Err = TillrollError;

    /// Parses the legacy front-end tokens `"16"` and `"28"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16" => Ok(Series::Sixteen),
            "28" => Ok(Series::TwentyEight),
            other => Err(TillrollError::Validation(format!(
                "unknown server series {other:?}, expected \"16\" or \"28\""
            ))),
        }
    }
}

/// One endpoint a connection attempt is made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCandidate {
    /// The series prefix this candidate was built from.
    pub prefix: &'static str,
    /// The full host, prefix + site host fragment.
    pub host: String,
}

impl ConnectionCandidate {
    /// Build one candidate per prefix of the chosen series.
    pub fn for_site(site_id: &SiteId, series: Series) -> Vec<Self> {
        let fragment = site_id.host_fragment();
        series
            .prefixes()
            .iter()
            .map(|prefix| Self {
                prefix,
                host: format!("{prefix}{fragment}"),
            })
            .collect()
    }
}
