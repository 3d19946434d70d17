//! Parameter and error-message documents read by the command-line driver

use crate::driver::{ImtToggle, PortConfigRequest, PortMappingRequest, PortType, ToolCommand};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading a JSON document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid document
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Offending file, or `<inline>` for in-memory input
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

fn default_interpreter() -> String {
    "python3".to_string()
}

/// Bitstream selector; documents carry it as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Bitstream {
    /// Numeric selector, e.g. `1`
    Number(u64),
    /// Selector given as text
    Text(String),
}

impl fmt::Display for Bitstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bitstream::Number(n) => write!(f, "{}", n),
            Bitstream::Text(s) => f.write_str(s),
        }
    }
}

/// How to start the configuration tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LaunchParameters {
    /// Root of the LEK installation
    pub lek_path: String,
    /// Bitstream to load
    pub bitstream: Bitstream,
    /// Interpreter running the tool
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Per-wait timeout in seconds; the caller's default applies when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// MTU values for host and SOC ports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MtuParameters {
    /// Host port number to MTU
    pub port_list_host: IndexMap<u32, u32>,
    /// Port type of `port_list_host`
    pub port_type1: PortType,
    /// SOC port number to MTU
    pub port_list_soc: IndexMap<u32, u32>,
    /// Port type of `port_list_soc`
    pub port_type2: PortType,
    /// IMT toggle applied to the SOC ports
    #[serde(default)]
    pub imt: ImtToggle,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Document {
    sample_json: ToolParameters,
}

/// Everything one run of the driver needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolParameters {
    /// Launch settings
    #[serde(rename = "pytool_parameteres")]
    pub launch: LaunchParameters,
    /// MTU settings
    #[serde(rename = "MTU")]
    pub mtu: MtuParameters,
    /// Port mappings
    #[serde(default)]
    pub port_mapping: PortMappingRequest,
}

impl ToolParameters {
    /// Read the parameter document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse a parameter document held in memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::config::ToolParameters;
    ///
    /// let params = ToolParameters::from_json_str(r#"{
    ///     "sample_json": {
    ///         "pytool_parameteres": {"lek_path": "/opt/lek/", "bitstream": 1},
    ///         "MTU": {
    ///             "port_list_host": {"1": 2000},
    ///             "port_type1": "Host",
    ///             "port_list_soc": {},
    ///             "port_type2": "SOC"
    ///         }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert_eq!(params.tool_command().program, "python3");
    /// assert_eq!(params.host_request().ports[&1], 2000);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let document: Document = serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(document.sample_json)
    }

    /// Command that starts the tool.
    pub fn tool_command(&self) -> ToolCommand {
        ToolCommand::pytool(
            &self.launch.interpreter,
            &self.launch.lek_path,
            &self.launch.bitstream.to_string(),
        )
    }

    /// Timeout from the document, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.launch.timeout_secs.map(Duration::from_secs)
    }

    /// MTU request for the first port list.
    pub fn host_request(&self) -> PortConfigRequest {
        PortConfigRequest::new(self.mtu.port_type1, self.mtu.port_list_host.clone())
    }

    /// MTU request for the second port list, carrying the IMT toggle.
    pub fn soc_request(&self) -> PortConfigRequest {
        PortConfigRequest::new(self.mtu.port_type2, self.mtu.port_list_soc.clone())
            .with_imt(self.mtu.imt)
    }
}

/// User-facing messages keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorMessages {
    error_info: HashMap<String, String>,
}

impl ErrorMessages {
    /// Read the message document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Message for `id`, or the id itself when the document has none.
    pub fn message<'a>(&'a self, id: &'a str) -> &'a str {
        self.error_info.get(id).map(String::as_str).unwrap_or(id)
    }
}
