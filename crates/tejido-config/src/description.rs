//! TOML graph descriptions and the two-phase description → container build.
//!
//! A description carries exactly what the compiler core needs from any
//! source format: proc class names, proc instance names, per-proc parameter
//! key/values, and pipe source/destination path strings — plus the published
//! parameter/input/output aliases and engine rates.
//!
//! ```toml
//! name = "tone"
//! vector_size = 64
//! sample_rate = 48000.0
//!
//! [[procs]]
//! class = "onepole"
//! name = "lp"
//! params = { frequency = 2000.0 }
//!
//! [[procs]]
//! class = "gain"
//! name = "level"
//!
//! [[pipes]]
//! from = "lp/out"
//! to = "level/in"
//!
//! [[publish.params]]
//! proc = "lp"
//! param = "frequency"
//! alias = "cutoff"
//!
//! [[publish.inputs]]
//! proc = "lp"
//! port = "in"
//! alias = "main_in"
//!
//! [[publish.outputs]]
//! proc = "level"
//! port = "out"
//! alias = "main_out"
//! ```
//!
//! The parse phase is pure; [`GraphDescription::build`] resolves classes
//! against a [`ProcRegistry`] and returns a prepared [`Container`].

use std::collections::BTreeMap;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};
use tejido_core::{Container, DspContext, Packing, Path, Ratio, Symbol, TrigMode};
use tejido_registry::ProcRegistry;

use crate::error::BuildError;

/// One proc declaration: class, unique instance name, parameter overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDecl {
    /// Registered class name (e.g. `"onepole"`).
    pub class: String,
    /// Instance name, unique within the graph.
    pub name: String,
    /// Parameter overrides applied before the graph is prepared.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f32>,
}

/// One pipe declaration, with `proc/port` endpoint paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeDecl {
    /// Source endpoint, `"proc/output"`.
    pub from: String,
    /// Destination endpoint, `"proc/input"`.
    pub to: String,
}

/// A published parameter declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamPublishDecl {
    /// Target proc instance name.
    pub proc: String,
    /// Target parameter name.
    pub param: String,
    /// Alias exposed at the graph boundary.
    pub alias: String,
}

/// A published input or output declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoPublishDecl {
    /// Target proc instance name.
    pub proc: String,
    /// Target port name.
    pub port: String,
    /// Alias exposed at the graph boundary.
    pub alias: String,
    /// Optional block-rate ratio, `"up/down"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
}

/// The published surface of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishDecl {
    /// Published parameters, in index order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamPublishDecl>,
    /// Published inputs, in index order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<IoPublishDecl>,
    /// Published outputs, in index order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<IoPublishDecl>,
}

/// A signal tap declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TapDecl {
    /// Source proc instance name.
    pub proc: String,
    /// Source output port name.
    pub port: String,
    /// Tap name; also the alias for claiming the reader.
    pub alias: String,
    /// Ring capacity in frames (0 for the default).
    #[serde(default)]
    pub length: usize,
    /// Trash policy: `"no-trash"` (default) or `"most-recent"`.
    #[serde(default)]
    pub mode: Option<String>,
    /// Samples per frame.
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,
}

fn default_frame_size() -> usize {
    1
}

/// A complete graph description document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    /// Graph name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Block size in frames; the engine default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_size: Option<usize>,
    /// Sample rate in Hz; 48000 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f32>,
    /// Packing strategy: `"first-fit"` (default) or `"wasteful"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packing: Option<String>,
    /// Proc declarations, in execution order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procs: Vec<ProcDecl>,
    /// Pipe declarations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pipes: Vec<PipeDecl>,
    /// Published parameters and I/O.
    #[serde(default, skip_serializing_if = "is_default_publish")]
    pub publish: PublishDecl,
    /// Signal taps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taps: Vec<TapDecl>,
}

fn is_default_publish(p: &PublishDecl) -> bool {
    *p == PublishDecl::default()
}

impl GraphDescription {
    /// Parses a description from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, BuildError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a description file.
    pub fn from_path(path: impl AsRef<FsPath>) -> Result<Self, BuildError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| BuildError::read_file(path, e))?;
        Self::from_toml(&text)
    }

    /// Serializes the description to TOML text.
    pub fn to_toml(&self) -> Result<String, BuildError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds and prepares a container, resolving classes against the
    /// registry.
    ///
    /// Errors abort the build and return — a half-built container is never
    /// handed back.
    pub fn build(&self, registry: &ProcRegistry) -> Result<Container, BuildError> {
        let ctx = DspContext::new(
            self.vector_size
                .unwrap_or(tejido_core::DEFAULT_VECTOR_SIZE),
            self.sample_rate.unwrap_or(48_000.0),
        );
        let mut container = Container::with_context(self.name.as_deref().unwrap_or("graph"), ctx);
        container.set_packing(parse_packing(self.packing.as_deref())?);

        for decl in &self.procs {
            let mut proc = registry
                .create(&decl.class)
                .ok_or_else(|| BuildError::UnknownClass(decl.class.clone()))?;
            for (param, value) in &decl.params {
                proc.set_param(Symbol::new(param), *value).map_err(|e| {
                    BuildError::graph(format!("param '{param}' of proc '{}'", decl.name), e)
                })?;
            }
            container
                .add_proc(decl.name.as_str(), proc)
                .map_err(|e| BuildError::graph(format!("proc '{}'", decl.name), e))?;
        }

        for decl in &self.pipes {
            let (src, output) = endpoint(&decl.from)?;
            let (dest, input) = endpoint(&decl.to)?;
            container
                .add_pipe(src, output, dest, input)
                .map_err(|e| {
                    BuildError::graph(format!("pipe '{}' -> '{}'", decl.from, decl.to), e)
                })?;
        }

        for decl in &self.publish.params {
            container
                .publish_param(decl.proc.as_str(), decl.param.as_str(), decl.alias.as_str())
                .map_err(|e| BuildError::graph(format!("published param '{}'", decl.alias), e))?;
        }
        for decl in &self.publish.inputs {
            let ratio = parse_rate(decl.rate.as_deref())?;
            container
                .publish_input_rated(
                    decl.proc.as_str(),
                    decl.port.as_str(),
                    decl.alias.as_str(),
                    ratio,
                )
                .map_err(|e| BuildError::graph(format!("published input '{}'", decl.alias), e))?;
        }
        for decl in &self.publish.outputs {
            let ratio = parse_rate(decl.rate.as_deref())?;
            container
                .publish_output_rated(
                    decl.proc.as_str(),
                    decl.port.as_str(),
                    decl.alias.as_str(),
                    ratio,
                )
                .map_err(|e| BuildError::graph(format!("published output '{}'", decl.alias), e))?;
        }

        for decl in &self.taps {
            let mode = parse_mode(decl.mode.as_deref())?;
            container
                .add_signal_tap(
                    decl.proc.as_str(),
                    decl.port.as_str(),
                    decl.alias.as_str(),
                    decl.length,
                    mode,
                    decl.frame_size,
                )
                .map_err(|e| BuildError::graph(format!("tap '{}'", decl.alias), e))?;
        }

        container
            .prepare()
            .map_err(|e| BuildError::graph("prepare".to_string(), e))?;
        Ok(container)
    }
}

/// Splits a `proc/port` endpoint string.
fn endpoint(text: &str) -> Result<(Symbol, Symbol), BuildError> {
    let path = Path::parse(text);
    if path.len() != 2 {
        return Err(BuildError::BadEndpoint(text.to_owned()));
    }
    Ok((path.head(), path.get(1).expect("checked length")))
}

/// Parses an optional `up/down` rate string.
fn parse_rate(text: Option<&str>) -> Result<Ratio, BuildError> {
    let Some(text) = text else {
        return Ok(Ratio::UNITY);
    };
    let bad = || BuildError::BadRate(text.to_owned());
    let (up, down) = text.split_once('/').ok_or_else(bad)?;
    let up: u32 = up.trim().parse().map_err(|_| bad())?;
    let down: u32 = down.trim().parse().map_err(|_| bad())?;
    if up == 0 || down == 0 {
        return Err(bad());
    }
    Ok(Ratio::new(up, down))
}

/// Parses an optional tap trigger mode.
fn parse_mode(text: Option<&str>) -> Result<TrigMode, BuildError> {
    match text {
        None | Some("no-trash") => Ok(TrigMode::NoTrash),
        Some("most-recent") => Ok(TrigMode::MostRecent),
        Some(other) => Err(BuildError::UnknownMode(other.to_owned())),
    }
}

/// Parses an optional packing strategy name.
fn parse_packing(text: Option<&str>) -> Result<Packing, BuildError> {
    match text {
        None | Some("first-fit") => Ok(Packing::FirstFit),
        Some("wasteful") => Ok(Packing::Wasteful),
        Some(other) => Err(BuildError::UnknownPacking(other.to_owned())),
    }
}
