//! Tejido Core — a real-time audio signal-graph engine.
//!
//! This crate provides the engine's two tightly coupled subsystems: a graph
//! of processing nodes compiled into a fixed execution order over a minimal
//! pool of shared signal buffers, and a lock-free SPSC ring transport for
//! moving signal data between the audio thread and non-real-time threads.
//!
//! # Core Abstractions
//!
//! ## Signals and Names
//!
//! - [`Signal`] - 2D sample buffer: frames × channels, constant fill/clear
//! - [`Symbol`] - interned, comparison-cheap name identifier
//! - [`Path`] - bounded slash-delimited name path (`"filter1/in"`)
//!
//! ## Transport
//!
//! - [`RingBuffer`] - lock-free SPSC ring split into unique
//!   [`RingProducer`]/[`RingConsumer`] endpoints
//! - [`TrigMode`] - trash policy for frame-mode reads
//!
//! ## Procs
//!
//! - [`Proc`] - the processing-node trait: named params and ports,
//!   `resize`/`clear`/`process` lifecycle
//! - [`procs`] - the built-in nodes (`onepole`, `dc_blocker`, `gain`, `add`,
//!   `multiply`, `delay_input`, `ringbuffer`, `resample`)
//!
//! ## Graph
//!
//! - [`Container`] - owns named procs and pipes, publishes params and I/O
//! - [`CompiledPlan`] - the flat op list + shared-buffer pool layout
//! - [`Packing`] - wasteful or first-fit buffer sharing
//!
//! # Threading Model
//!
//! Two execution contexts: the audio thread (never blocks, never allocates,
//! never locks) and control threads. Graph mutation and compilation happen
//! on the control thread; `process()` runs the compiled plan. The ring is
//! the sole channel between them, one producer and one consumer each by
//! construction. Parameter writes are lazy — consumed at the top of the next
//! `process()` — giving at-least-one-block latency with no locking.
//!
//! # Example
//!
//! ```
//! use tejido_core::{Container, Signal, procs::Gain};
//!
//! let mut graph = Container::new("demo");
//! graph.add_proc("boost", Box::new(Gain::new())).unwrap();
//! graph.publish_input("boost", "in", "main_in").unwrap();
//! graph.publish_output("boost", "out", "main_out").unwrap();
//! graph.publish_param("boost", "gain", "level").unwrap();
//! graph.prepare().unwrap();
//!
//! graph.set_published_param(0, 2.0).unwrap();
//! let mut input = Signal::new(graph.context().vector_size());
//! input.set_to_constant(0.5);
//! graph.set_input(0, &input);
//! graph.process();
//! assert_eq!(graph.output(0).unwrap().row(0)[0], 1.0);
//! ```

pub mod context;
pub mod error;
pub mod graph;
pub mod path;
pub mod proc;
pub mod procs;
pub mod ring;
pub mod signal;
pub mod symbol;

// Re-export main types at crate root
pub use context::DspContext;
pub use error::ProcError;
pub use graph::{BufferSpec, CompiledPlan, Container, Packing, PlanOp, Ratio};
pub use path::{PATH_MAX_SYMBOLS, Path};
pub use proc::{MAX_PROC_PORTS, ParamBag, Proc, ProcInfo, ProcIo};
pub use ring::{RingBuffer, RingConsumer, RingProducer, RingWord, TrigMode};
pub use signal::{DEFAULT_VECTOR_SIZE, Signal};
pub use symbol::Symbol;
