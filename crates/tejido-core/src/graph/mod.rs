//! Graph container and compiler.
//!
//! The graph module turns a declared network of procs and pipes into a flat
//! execution plan:
//!
//! - [`Container`] — owned by the control thread. Holds procs (in execution
//!   order), pipes, and published parameter/input/output tables; performs
//!   mutations and runs [`prepare()`](Container::prepare).
//! - [`CompiledPlan`] — the compiled snapshot: an ordered op list with every
//!   port bound to a slot in a minimal pool of shared signal buffers. The
//!   container discards it on any mutation, so `process()` either runs a
//!   complete plan or nothing.
//!
//! # Buffer sharing
//!
//! Each signal's lifetime window spans the op indices during which some
//! consumer still needs it. Signals whose windows are provably
//! non-overlapping can share one pooled buffer; the first-fit packer
//! ([`Packing::FirstFit`]) reuses the first buffer that fits, so a long
//! chain runs in two buffers. Signals are never moved in time to improve
//! packing — only storage is shared.

pub mod compile;
pub mod container;

pub use compile::{BufferSpec, CompiledPlan, Packing, PlanOp};
pub use container::{Container, Ratio};
