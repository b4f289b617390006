//! Charm references and origins

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a charm URL points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Schema {
    /// Charm uploaded from the local filesystem (`local:`)
    Local,
    /// Legacy charm store (`cs:`)
    CharmStore,
    /// Charm hub (`ch:`)
    CharmHub,
}

impl Schema {
    /// URL prefix without the colon
    pub fn prefix(self) -> &'static str {
        match self {
            Schema::Local => "local",
            Schema::CharmStore => "cs",
            Schema::CharmHub => "ch",
        }
    }
}

/// A charm URL such as `cs:focal/mysql-5`, `local:meshuggah` or `ch:postgresql`.
///
/// A reference without a schema is a charm hub reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharmUrl {
    /// URL schema
    pub schema: Schema,
    /// Series, for series-qualified URLs
    pub series: Option<String>,
    /// Charm name
    pub name: String,
    /// Revision, if pinned
    pub revision: Option<i64>,
}

impl CharmUrl {
    /// A charm hub URL for `name`
    pub fn charm_hub(name: impl Into<String>) -> Self {
        Self {
            schema: Schema::CharmHub,
            series: None,
            name: name.into(),
            revision: None,
        }
    }

    /// Same URL with a different revision
    pub fn with_revision(&self, revision: Option<i64>) -> Self {
        Self {
            revision,
            ..self.clone()
        }
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && name.starts_with(|c: char| c.is_ascii_lowercase())
}

impl FromStr for CharmUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (schema, rest) = match s.split_once(':') {
            Some(("local", rest)) => (Schema::Local, rest),
            Some(("cs", rest)) => (Schema::CharmStore, rest),
            Some(("ch", rest)) => (Schema::CharmHub, rest),
            Some((other, _)) => {
                return Err(Error::invalid(
                    "charm URL",
                    format!("unsupported schema {other:?} in {s:?}"),
                ));
            }
            None => (Schema::CharmHub, s),
        };

        let (series, name_rev) = match rest.rsplit_once('/') {
            Some((series, name_rev)) => (Some(series.to_string()), name_rev),
            None => (None, rest),
        };

        let (name, revision) = match name_rev.rsplit_once('-') {
            Some((name, rev)) if !rev.is_empty() && rev.chars().all(|c| c.is_ascii_digit()) => {
                let revision = rev
                    .parse()
                    .map_err(|_| Error::invalid("charm URL", format!("bad revision in {s:?}")))?;
                (name, Some(revision))
            }
            _ => (name_rev, None),
        };

        if !valid_name(name) {
            return Err(Error::invalid(
                "charm URL",
                format!("invalid charm name {name:?} in {s:?}"),
            ));
        }

        Ok(Self {
            schema,
            series,
            name: name.to_string(),
            revision,
        })
    }
}

impl fmt::Display for CharmUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.schema.prefix())?;
        if let Some(series) = &self.series {
            write!(f, "{series}/")?;
        }
        f.write_str(&self.name)?;
        if let Some(rev) = self.revision {
            write!(f, "-{rev}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for CharmUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CharmUrl> for String {
    fn from(url: CharmUrl) -> Self {
        url.to_string()
    }
}

/// Where a deployed charm came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginSource {
    /// Local upload
    Local,
    /// Legacy charm store
    CharmStore,
    /// Charm hub
    CharmHub,
}

/// A charm channel: `[track/]risk[/branch]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Track, e.g. `2.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    /// Risk: `stable`, `candidate`, `beta` or `edge` (empty when unset)
    #[serde(default)]
    pub risk: String,
    /// Branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl Channel {
    /// The default risk level
    pub const STABLE: &'static str = "stable";

    /// A channel with only a risk
    pub fn risk(risk: impl Into<String>) -> Self {
        Self {
            risk: risk.into(),
            ..Self::default()
        }
    }

    /// Whether no part of the channel is set
    pub fn is_empty(&self) -> bool {
        self.track.is_none() && self.risk.is_empty() && self.branch.is_none()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(track) = &self.track {
            parts.push(track);
        }
        parts.push(&self.risk);
        if let Some(branch) = &self.branch {
            parts.push(branch);
        }
        f.write_str(&parts.join("/"))
    }
}

/// Platform a charm runs on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Architecture
    #[serde(default)]
    pub architecture: String,
    /// Operating system
    #[serde(default)]
    pub os: String,
    /// Series
    #[serde(default)]
    pub series: String,
}

/// Provenance of an application's charm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharmOrigin {
    /// Store the charm came from
    pub source: OriginSource,
    /// Store-assigned charm id
    #[serde(default)]
    pub id: String,
    /// Content hash
    #[serde(default)]
    pub hash: String,
    /// Revision, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    /// Channel the charm tracks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    /// Target platform
    #[serde(default)]
    pub platform: Platform,
}

impl CharmOrigin {
    /// An origin with only a source set
    pub fn new(source: OriginSource) -> Self {
        Self {
            source,
            id: String::new(),
            hash: String::new(),
            revision: None,
            channel: None,
            platform: Platform::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_charm_store_url() {
        let url: CharmUrl = "cs:focal/mysql-5".parse().unwrap();
        assert_eq!(url.schema, Schema::CharmStore);
        assert_eq!(url.series.as_deref(), Some("focal"));
        assert_eq!(url.name, "mysql");
        assert_eq!(url.revision, Some(5));
        assert_eq!(url.to_string(), "cs:focal/mysql-5");
    }

    #[test]
    fn test_bare_name_is_charm_hub() {
        let url: CharmUrl = "meshuggah".parse().unwrap();
        assert_eq!(url.schema, Schema::CharmHub);
        assert_eq!(url.to_string(), "ch:meshuggah");
    }

    #[test]
    fn test_hyphenated_name_without_revision() {
        let url: CharmUrl = "local:mysql-router".parse().unwrap();
        assert_eq!(url.name, "mysql-router");
        assert_eq!(url.revision, None);
    }

    #[test]
    fn test_rejects_unknown_schema() {
        assert!("http:meshuggah".parse::<CharmUrl>().is_err());
    }

    #[test]
    fn test_channel_display() {
        let channel = Channel {
            track: Some("2.0".to_string()),
            risk: "edge".to_string(),
            branch: None,
        };
        assert_eq!(channel.to_string(), "2.0/edge");
    }
}
