//! # JSON Configuration System
//!
//! Describes a logic block and its test bench in a JSON file: where the netlist lives,
//! how many relaxation passes to run, which NOR policy to use, any sub-blocks to make
//! available as element types, and a sequence of input vectors.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rusty_fpga::system_config::BlockFactory;
//!
//! let factory = BlockFactory::new();
//! let mut block = factory
//!     .create_from_json("configs/full_adder.json")
//!     .expect("Could not create block!");
//!
//! for outcome in block.run_vectors() {
//!     println!("{:?} -> {:?}", outcome.inputs, outcome.outputs);
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```json
//! {
//!   "name": "half_adder_pair",
//!   "description": "Two half adders built from a library block",
//!   "limits": 6,
//!   "nor_policy": "legacy",
//!   "netlist": { "path": "../netlists/pair.net" },
//!   "library": {
//!     "HALF": { "netlist": { "path": "../netlists/half_adder.net" }, "limits": 3 }
//!   },
//!   "vectors": [
//!     { "inputs": { "NORTH": "HIGH", "SOUTH": "LOW" }, "expect": { "EAST": "HIGH" } }
//!   ]
//! }
//! ```
//!
//! Relative netlist paths are resolved against the directory of the configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::block::CircuitBlock;
use crate::components::gates::NorPolicy;
use crate::components::{ElementFactory, FactoryError};
use crate::netlist::Netlist;
use crate::parser::{parse, FormatError};
use crate::pin::PinMap;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON config '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid netlist for {context}: {source}")]
    Format {
        context: String,
        #[source]
        source: FormatError,
    },
    #[error(transparent)]
    Factory(#[from] FactoryError),
    #[error("'{name}' needs at least one relaxation pass")]
    InvalidLimits { name: String },
}

fn default_limits() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_limits")]
    pub limits: usize,
    #[serde(default)]
    pub nor_policy: NorPolicy,
    pub netlist: NetlistSource,
    /// Sub-blocks registered as element types, compiled in name order.
    #[serde(default)]
    pub library: BTreeMap<String, LibraryEntry>,
    #[serde(default)]
    pub vectors: Vec<TestVector>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetlistSource {
    Path(PathBuf),
    Inline(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub netlist: NetlistSource,
    #[serde(default = "default_limits")]
    pub limits: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestVector {
    pub inputs: PinMap,
    #[serde(default)]
    pub expect: Option<PinMap>,
}

/// Result of applying one test vector.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorOutcome {
    pub inputs: PinMap,
    pub outputs: PinMap,
    pub expected: Option<PinMap>,
}

impl VectorOutcome {
    /// True when every expected pin matches. Vectors without expectations always pass.
    pub fn passed(&self) -> bool {
        match &self.expected {
            Some(expected) => expected
                .iter()
                .all(|(pin, value)| self.outputs.get(pin) == Some(value)),
            None => true,
        }
    }
}

/// Builds blocks from JSON configuration.
#[derive(Debug, Default)]
pub struct BlockFactory {}

impl BlockFactory {
    pub fn new() -> Self {
        BlockFactory {}
    }

    pub fn create_from_json(
        &self,
        json_path: impl AsRef<Path>,
    ) -> Result<ConfiguredBlock, ConfigError> {
        let json_path = json_path.as_ref();
        let config = self.load_json_config(json_path)?;
        let base_dir = json_path.parent().unwrap_or_else(|| Path::new(""));
        self.create(config, base_dir)
    }

    /// Builds from JSON text. Relative netlist paths resolve against `base_dir`.
    pub fn create_from_str(
        &self,
        json: &str,
        base_dir: impl AsRef<Path>,
    ) -> Result<ConfiguredBlock, ConfigError> {
        let config: BlockConfig = serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        self.create(config, base_dir.as_ref())
    }

    /// Builds from JSON text with the top-level netlist given as `netlist` text, whatever
    /// the configuration names as its source. Library entries must be inline.
    pub fn create_embedded(
        &self,
        json: &str,
        netlist: &str,
    ) -> Result<ConfiguredBlock, ConfigError> {
        let mut config: BlockConfig =
            serde_json::from_str(json).map_err(|source| ConfigError::Json {
                path: PathBuf::from("<embedded>"),
                source,
            })?;
        config.netlist = NetlistSource::Inline(netlist.to_string());
        self.create(config, Path::new(""))
    }

    fn load_json_config(&self, path: &Path) -> Result<BlockConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn create(
        &self,
        config: BlockConfig,
        base_dir: &Path,
    ) -> Result<ConfiguredBlock, ConfigError> {
        let mut elements = ElementFactory::with_nor_policy(config.nor_policy);

        for (type_name, entry) in &config.library {
            if entry.limits == 0 {
                return Err(ConfigError::InvalidLimits {
                    name: type_name.clone(),
                });
            }
            let netlist = self.load_netlist(&entry.netlist, base_dir, type_name)?;
            elements.register_block(type_name.clone(), netlist, entry.limits)?;
        }

        if config.limits == 0 {
            return Err(ConfigError::InvalidLimits {
                name: config.name.clone(),
            });
        }
        let netlist = self.load_netlist(&config.netlist, base_dir, &config.name)?;
        let block = CircuitBlock::with_factory(netlist, config.limits, &elements)
            .named(config.name.as_str());

        tracing::info!(
            name = %config.name,
            elements = block.elements().len(),
            vectors = config.vectors.len(),
            "created block from configuration"
        );

        Ok(ConfiguredBlock::new(config, block))
    }

    fn load_netlist(
        &self,
        source: &NetlistSource,
        base_dir: &Path,
        context: &str,
    ) -> Result<Netlist, ConfigError> {
        let text = match source {
            NetlistSource::Inline(text) => text.clone(),
            NetlistSource::Path(path) => {
                let path = base_dir.join(path);
                std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?
            }
        };

        parse(&text).map_err(|source| ConfigError::Format {
            context: context.to_string(),
            source,
        })
    }
}

/// A block created from configuration, together with its test vectors.
#[derive(Debug, Clone)]
pub struct ConfiguredBlock {
    config: BlockConfig,
    block: CircuitBlock,
}

impl ConfiguredBlock {
    pub fn new(config: BlockConfig, block: CircuitBlock) -> Self {
        ConfiguredBlock { config, block }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn block(&self) -> &CircuitBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut CircuitBlock {
        &mut self.block
    }

    /// Applies every vector in order against the same block, so state carries over.
    pub fn run_vectors(&mut self) -> Vec<VectorOutcome> {
        let vectors = self.config.vectors.clone();
        vectors
            .into_iter()
            .map(|vector| {
                let outputs = self.block.settle(&vector.inputs);
                let outcome = VectorOutcome {
                    inputs: vector.inputs,
                    outputs,
                    expected: vector.expect,
                };
                if !outcome.passed() {
                    tracing::warn!(
                        block = %self.config.name,
                        inputs = ?outcome.inputs,
                        outputs = ?outcome.outputs,
                        expected = ?outcome.expected,
                        "vector mismatch"
                    );
                }
                outcome
            })
            .collect()
    }
}
