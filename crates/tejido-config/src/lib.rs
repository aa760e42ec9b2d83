//! Tejido Config — graph description documents.
//!
//! Graphs can be declared in TOML and built against a
//! [`ProcRegistry`](tejido_registry::ProcRegistry): proc class and instance
//! names, parameter values, pipe endpoints, the published boundary
//! (params/inputs/outputs with optional block rates), and signal taps.
//!
//! ```no_run
//! use tejido_config::GraphDescription;
//! use tejido_registry::ProcRegistry;
//!
//! let registry = ProcRegistry::new();
//! let desc = GraphDescription::from_path("patches/tone.toml")?;
//! let mut graph = desc.build(&registry)?;
//! graph.process();
//! # Ok::<(), tejido_config::BuildError>(())
//! ```

mod description;
mod error;

pub use description::{
    GraphDescription, IoPublishDecl, ParamPublishDecl, PipeDecl, ProcDecl, PublishDecl, TapDecl,
};
pub use error::BuildError;
