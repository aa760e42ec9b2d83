//! The processing-node interface.
//!
//! A [`Proc`] is a polymorphic audio-processing unit with named parameters,
//! named input ports, and named output ports. Its lifecycle is:
//!
//! ```text
//! created --resize()*--> ready --process()*--> ...
//!                          ^  \
//!                          +---clear()   (zero history, keep params)
//! ```
//!
//! `resize()` runs off the audio thread whenever the block size or sample
//! rate changes and is the only place a proc may allocate; it reports
//! [`ProcError::Memory`] on failure without corrupting existing state.
//! `process()` runs once per audio block, must not allocate, and has no error
//! path: a proc that has never been successfully resized writes silence.
//!
//! Parameter changes apply lazily: writes flip the [`ParamBag`]'s changed
//! flag, and the next `process()` consumes the flag by recomputing derived
//! coefficients once per block, not per sample. This gives parameter writes
//! from the control thread at-least-one-block latency with no locking.

use std::collections::BTreeMap;

use crate::context::DspContext;
use crate::error::ProcError;
use crate::signal::Signal;
use crate::symbol::Symbol;

/// Maximum number of input or output ports on one proc.
pub const MAX_PROC_PORTS: usize = 8;

/// Construction-time description of a proc: class name plus the declared
/// parameter, input, and output name tables.
///
/// Port order is significant — it is the port index used by pipes and the
/// compiled plan.
#[derive(Debug, Clone)]
pub struct ProcInfo {
    class: Symbol,
    params: Vec<Symbol>,
    inputs: Vec<Symbol>,
    outputs: Vec<Symbol>,
}

impl ProcInfo {
    /// Builds a descriptor from name lists.
    pub fn new(class: &str, params: &[&str], inputs: &[&str], outputs: &[&str]) -> Self {
        debug_assert!(inputs.len() <= MAX_PROC_PORTS);
        debug_assert!(outputs.len() <= MAX_PROC_PORTS);
        Self {
            class: Symbol::new(class),
            params: params.iter().map(|n| Symbol::new(n)).collect(),
            inputs: inputs.iter().map(|n| Symbol::new(n)).collect(),
            outputs: outputs.iter().map(|n| Symbol::new(n)).collect(),
        }
    }

    /// The class name this proc was registered under.
    pub fn class(&self) -> Symbol {
        self.class
    }

    /// Declared parameter names.
    pub fn param_names(&self) -> &[Symbol] {
        &self.params
    }

    /// Declared input port names, in port order.
    pub fn input_names(&self) -> &[Symbol] {
        &self.inputs
    }

    /// Declared output port names, in port order.
    pub fn output_names(&self) -> &[Symbol] {
        &self.outputs
    }

    /// Resolves an input port name to its index.
    pub fn input_index(&self, name: Symbol) -> Option<usize> {
        self.inputs.iter().position(|&n| n == name)
    }

    /// Resolves an output port name to its index.
    pub fn output_index(&self, name: Symbol) -> Option<usize> {
        self.outputs.iter().position(|&n| n == name)
    }

    /// Returns true if `name` is a declared parameter.
    pub fn has_param(&self, name: Symbol) -> bool {
        self.params.contains(&name)
    }
}

/// Parameter storage shared by the built-in procs: declared names mapped to
/// scalar values, plus the lazily-consumed changed flag.
#[derive(Debug, Clone, Default)]
pub struct ParamBag {
    values: BTreeMap<Symbol, f32>,
    changed: bool,
}

impl ParamBag {
    /// Creates a bag holding the given defaults.
    ///
    /// The changed flag starts set so the first `process()` computes
    /// coefficients from the defaults.
    pub fn new(defaults: &[(&str, f32)]) -> Self {
        Self {
            values: defaults
                .iter()
                .map(|&(name, value)| (Symbol::new(name), value))
                .collect(),
            changed: true,
        }
    }

    /// Writes a declared parameter, flagging the change.
    ///
    /// Undeclared names are rejected with [`ProcError::NotFound`].
    pub fn set(&mut self, name: Symbol, value: f32) -> Result<(), ProcError> {
        match self.values.get_mut(&name) {
            Some(slot) => {
                *slot = value;
                self.changed = true;
                Ok(())
            }
            None => Err(ProcError::NotFound),
        }
    }

    /// Reads a parameter, 0.0 for undeclared names.
    pub fn get(&self, name: Symbol) -> f32 {
        self.values.get(&name).copied().unwrap_or(0.0)
    }

    /// Returns the changed flag and clears it.
    pub fn take_changed(&mut self) -> bool {
        core::mem::replace(&mut self.changed, false)
    }

    /// Returns the changed flag without clearing it.
    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Per-block I/O lent to a proc by the container's compiled plan.
///
/// Inputs are shared borrows of pool buffers (disconnected inputs alias the
/// container's constant-zero null signal); outputs are pool buffers lent by
/// value for the duration of the call (disconnected outputs are scratch).
pub struct ProcIo<'a> {
    inputs: [&'a Signal; MAX_PROC_PORTS],
    outputs: &'a mut [Signal; MAX_PROC_PORTS],
    vector_size: usize,
}

impl<'a> ProcIo<'a> {
    /// Assembles the I/O view for one op. Called by the container.
    pub fn new(
        inputs: [&'a Signal; MAX_PROC_PORTS],
        outputs: &'a mut [Signal; MAX_PROC_PORTS],
        vector_size: usize,
    ) -> Self {
        Self {
            inputs,
            outputs,
            vector_size,
        }
    }

    /// The input signal bound to port `index`.
    #[inline]
    pub fn input(&self, index: usize) -> &'a Signal {
        self.inputs[index]
    }

    /// The output signal bound to port `index`.
    #[inline]
    pub fn output(&mut self, index: usize) -> &mut Signal {
        &mut self.outputs[index]
    }

    /// One input and one output borrowed together, for in/out processing
    /// loops.
    #[inline]
    pub fn in_out(&mut self, input: usize, output: usize) -> (&'a Signal, &mut Signal) {
        (self.inputs[input], &mut self.outputs[output])
    }

    /// Frames to process this block.
    #[inline]
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }
}

/// A single audio-processing node.
///
/// Implementations are owned exclusively by their container and driven in
/// compiled-plan order. See the module docs for the lifecycle contract.
pub trait Proc: Send {
    /// The proc's class and name tables.
    fn info(&self) -> &ProcInfo;

    /// Writes a parameter by name, flagging lazy recomputation.
    fn set_param(&mut self, name: Symbol, value: f32) -> Result<(), ProcError>;

    /// Reads a parameter by name, 0.0 for unknown names.
    fn param(&self, name: Symbol) -> f32;

    /// Reallocates internal state for a new block size or sample rate.
    ///
    /// Must be callable repeatedly; on `Err` the proc's previous state must
    /// remain intact and the proc stays (or becomes) unready.
    fn resize(&mut self, ctx: &DspContext) -> Result<(), ProcError> {
        let _ = ctx;
        Ok(())
    }

    /// Zeroes DSP history without touching parameters.
    fn clear(&mut self) {}

    /// Processes one block. Never allocates, never fails.
    fn process(&mut self, io: &mut ProcIo<'_>);
}
