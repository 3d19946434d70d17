//! Requests handed to the configuration workflows

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Which side of the platform a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PortType {
    /// Host-facing port
    Host,
    /// SOC-facing port
    #[serde(rename = "SOC")]
    Soc,
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortType::Host => f.write_str("Host"),
            PortType::Soc => f.write_str("SOC"),
        }
    }
}

/// Whether to flip the IMT status of SOC ports after setting their MTU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImtToggle {
    /// Leave IMT untouched
    #[default]
    Off,
    /// Toggle IMT on every configured SOC port
    On,
}

/// MTU settings for a set of ports of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortConfigRequest {
    /// Port type the request applies to
    pub port_type: PortType,
    /// Port number to MTU, applied in this order
    pub ports: IndexMap<u32, u32>,
    /// IMT toggle; only honoured for SOC ports
    pub imt: ImtToggle,
}

impl PortConfigRequest {
    /// Request without an IMT toggle
    pub fn new(port_type: PortType, ports: IndexMap<u32, u32>) -> Self {
        Self {
            port_type,
            ports,
            imt: ImtToggle::Off,
        }
    }

    /// Set the IMT toggle
    pub fn with_imt(mut self, imt: ImtToggle) -> Self {
        self.imt = imt;
        self
    }

    /// Whether each port traversal includes the IMT toggle step
    pub fn toggles_imt(&self) -> bool {
        self.port_type == PortType::Soc && self.imt == ImtToggle::On
    }
}

/// Mapping type whose only endpoint is the source port.
const SOURCE_ONLY_MAPPING: &str = "SOC PF to Line";

/// Port mappings keyed by the tool's mapping-type label.
///
/// Each mapping type carries `source -> destination` pairs; the destination
/// is absent for mapping types that take only a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct PortMappingRequest {
    mappings: IndexMap<String, IndexMap<u32, Option<u32>>>,
}

impl PortMappingRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `source -> destination` pair under `mapping_type`
    pub fn insert(&mut self, mapping_type: impl Into<String>, source: u32, destination: Option<u32>) {
        self.mappings
            .entry(mapping_type.into())
            .or_default()
            .insert(source, destination);
    }

    /// Iterate `(mapping_type, source, destination)` in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32, Option<u32>)> {
        self.mappings.iter().flat_map(|(kind, pairs)| {
            pairs
                .iter()
                .map(move |(src, dst)| (kind.as_str(), *src, *dst))
        })
    }

    /// Total number of pairs
    pub fn len(&self) -> usize {
        self.mappings.values().map(IndexMap::len).sum()
    }

    /// True when there are no pairs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pairs whose mapping type needs a destination but has none.
    pub fn missing_destinations(&self) -> Vec<(String, u32)> {
        self.iter()
            .filter(|(kind, _, dst)| needs_destination(kind) && dst.is_none())
            .map(|(kind, src, _)| (kind.to_string(), src))
            .collect()
    }
}

/// Whether the tool asks for a destination port for `mapping_type`.
///
/// The tool pads some labels with double spaces, so the comparison ignores
/// whitespace runs.
pub fn needs_destination(mapping_type: &str) -> bool {
    !mapping_type
        .split_whitespace()
        .eq(SOURCE_ONLY_MAPPING.split_whitespace())
}
