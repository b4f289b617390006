//! Machine and application constraints

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware and placement constraints.
///
/// The textual form is a space separated list of `key=value` pairs, for
/// example `arch=amd64 mem=8G tags=db,ssd`. Sizes are held in MiB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// CPU architecture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// Container type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Number of CPU cores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,
    /// CPU power
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_power: Option<u64>,
    /// Memory in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem: Option<u64>,
    /// Root disk size in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_disk: Option<u64>,
    /// Where the root disk comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_disk_source: Option<String>,
    /// Provider tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Provider instance type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    /// Network spaces (a `^` prefix excludes a space)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spaces: Option<Vec<String>>,
    /// Virtualisation type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virt_type: Option<String>,
    /// Availability zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    /// Whether to allocate a public IP
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocate_public_ip: Option<bool>,
}

impl Constraints {
    /// Whether no constraint is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_size(key: &str, value: &str) -> Result<u64> {
    let (digits, multiplier) = match value.chars().last() {
        Some('M') => (&value[..value.len() - 1], 1),
        Some('G') => (&value[..value.len() - 1], 1024),
        Some('T') => (&value[..value.len() - 1], 1024 * 1024),
        Some('P') => (&value[..value.len() - 1], 1024 * 1024 * 1024),
        _ => (value, 1),
    };
    digits
        .parse::<u64>()
        .map(|n| n * multiplier)
        .map_err(|_| Error::invalid("constraints", format!("bad {key} value {value:?}")))
}

fn parse_count(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::invalid("constraints", format!("bad {key} value {value:?}")))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn format_size(mib: u64) -> String {
    if mib > 0 && mib % (1024 * 1024) == 0 {
        format!("{}T", mib / (1024 * 1024))
    } else if mib > 0 && mib % 1024 == 0 {
        format!("{}G", mib / 1024)
    } else {
        format!("{mib}M")
    }
}

impl FromStr for Constraints {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut cons = Constraints::default();
        for pair in s.split_whitespace() {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                Error::invalid("constraints", format!("malformed constraint {pair:?}"))
            })?;
            match key {
                "arch" => cons.arch = Some(value.to_string()),
                "container" => cons.container = Some(value.to_string()),
                "cores" | "cpu-cores" => cons.cores = Some(parse_count(key, value)?),
                "cpu-power" => cons.cpu_power = Some(parse_count(key, value)?),
                "mem" => cons.mem = Some(parse_size(key, value)?),
                "root-disk" => cons.root_disk = Some(parse_size(key, value)?),
                "root-disk-source" => cons.root_disk_source = Some(value.to_string()),
                "tags" => cons.tags = Some(parse_list(value)),
                "instance-type" => cons.instance_type = Some(value.to_string()),
                "spaces" => cons.spaces = Some(parse_list(value)),
                "virt-type" => cons.virt_type = Some(value.to_string()),
                "zones" => cons.zones = Some(parse_list(value)),
                "allocate-public-ip" => {
                    cons.allocate_public_ip = Some(value.parse().map_err(|_| {
                        Error::invalid("constraints", format!("bad {key} value {value:?}"))
                    })?)
                }
                other => {
                    return Err(Error::invalid(
                        "constraints",
                        format!("unknown constraint {other:?}"),
                    ));
                }
            }
        }
        Ok(cons)
    }
}

impl fmt::Display for Constraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = &self.arch {
            parts.push(format!("arch={v}"));
        }
        if let Some(v) = &self.container {
            parts.push(format!("container={v}"));
        }
        if let Some(v) = self.cores {
            parts.push(format!("cores={v}"));
        }
        if let Some(v) = self.cpu_power {
            parts.push(format!("cpu-power={v}"));
        }
        if let Some(v) = self.mem {
            parts.push(format!("mem={}", format_size(v)));
        }
        if let Some(v) = self.root_disk {
            parts.push(format!("root-disk={}", format_size(v)));
        }
        if let Some(v) = &self.root_disk_source {
            parts.push(format!("root-disk-source={v}"));
        }
        if let Some(v) = &self.tags {
            parts.push(format!("tags={}", v.join(",")));
        }
        if let Some(v) = &self.instance_type {
            parts.push(format!("instance-type={v}"));
        }
        if let Some(v) = &self.spaces {
            parts.push(format!("spaces={}", v.join(",")));
        }
        if let Some(v) = &self.virt_type {
            parts.push(format!("virt-type={v}"));
        }
        if let Some(v) = &self.zones {
            parts.push(format!("zones={}", v.join(",")));
        }
        if let Some(v) = self.allocate_public_ip {
            parts.push(format!("allocate-public-ip={v}"));
        }
        f.write_str(&parts.join(" "))
    }
}
