//! The graph container: owns procs and pipes, compiles them, runs the plan.
//!
//! A [`Container`] is mutated on the control thread (add procs, add pipes,
//! publish params and I/O), compiled by [`prepare()`](Container::prepare)
//! into an immutable [`CompiledPlan`], and executed per audio block by
//! [`process()`](Container::process). Every mutation discards the current
//! plan, so the audio thread can never execute a stale or partially-updated
//! schedule; an unready container's `process()` is a silent no-op.
//!
//! Procs execute in the order they were added. Graph construction is
//! expected to add procs in dependency order — the compiler does not sort.

use std::collections::BTreeMap;

use crate::context::DspContext;
use crate::error::ProcError;
use crate::path::Path;
use crate::proc::{MAX_PROC_PORTS, Proc, ProcIo};
use crate::procs::{Resample, SignalTap, TapReader};
use crate::ring::TrigMode;
use crate::signal::Signal;
use crate::symbol::Symbol;

use super::compile::{self, CompileRequest, CompiledPlan, Packing, ProcPorts};

/// An integer block-rate ratio for published inputs and outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    /// Numerator: external frames per `up/down` internal frames.
    pub up: u32,
    /// Denominator.
    pub down: u32,
}

impl Ratio {
    /// The 1:1 ratio.
    pub const UNITY: Self = Self { up: 1, down: 1 };

    /// Creates a ratio.
    pub fn new(up: u32, down: u32) -> Self {
        Self { up, down }
    }

    /// Returns true for a 1:1 ratio.
    pub fn is_unity(&self) -> bool {
        self.up == self.down
    }
}

/// External block length for a rated boundary, validated against the vector
/// size.
fn rated_width(vector: usize, ratio: Ratio) -> Result<usize, ProcError> {
    if ratio.up == 0 || ratio.down == 0 {
        return Err(ProcError::SizeMismatch);
    }
    let scaled = vector * ratio.up as usize;
    if scaled % ratio.down as usize != 0 {
        return Err(ProcError::SizeMismatch);
    }
    let width = scaled / ratio.down as usize;
    if width == 0 {
        return Err(ProcError::SizeMismatch);
    }
    Ok(width)
}

struct ProcEntry {
    name: Symbol,
    proc: Box<dyn Proc>,
}

/// A directed edge, stored by proc name so auto-inserted procs can be
/// positioned without invalidating existing entries.
struct PipeEntry {
    src: Symbol,
    src_out: usize,
    dest: Symbol,
    dest_in: usize,
}

struct PublishedParam {
    alias: Symbol,
    /// `(proc name, param name)` targets; one published param may drive
    /// several procs.
    setters: Vec<(Symbol, Symbol)>,
}

struct PublishedInput {
    alias: Symbol,
    /// The proc and input the signal ultimately feeds.
    #[allow(dead_code)]
    proc: Symbol,
    #[allow(dead_code)]
    input: usize,
    /// Where the host's data actually lands: the target itself, or the
    /// resampler inserted in front of it.
    dest: Symbol,
    dest_input: usize,
}

struct PublishedOutput {
    alias: Symbol,
    /// The proc and output the signal originally comes from.
    #[allow(dead_code)]
    proc: Symbol,
    #[allow(dead_code)]
    output: usize,
    /// Where the host actually reads: the source itself, or the resampler
    /// appended after it.
    src: Symbol,
    src_output: usize,
}

#[derive(Clone, Copy)]
enum PortKind {
    Input,
    Output,
}

struct RatedPort {
    proc: Symbol,
    kind: PortKind,
    port: usize,
    ratio: Ratio,
}

/// A connected graph of procs with published parameters and I/O.
pub struct Container {
    name: Symbol,
    ctx: DspContext,
    packing: Packing,
    procs: Vec<ProcEntry>,
    proc_index: BTreeMap<Symbol, usize>,
    pipes: Vec<PipeEntry>,
    published_params: Vec<PublishedParam>,
    param_index: BTreeMap<Symbol, usize>,
    published_inputs: Vec<PublishedInput>,
    input_index: BTreeMap<Symbol, usize>,
    published_outputs: Vec<PublishedOutput>,
    output_index: BTreeMap<Symbol, usize>,
    rated: Vec<RatedPort>,
    tap_readers: BTreeMap<Symbol, TapReader>,
    plan: Option<CompiledPlan>,
    pool: Vec<Signal>,
    null_input: Signal,
    trash: Vec<Signal>,
}

impl Container {
    /// Creates an empty container with the default context.
    pub fn new(name: impl Into<Symbol>) -> Self {
        Self::with_context(name, DspContext::default())
    }

    /// Creates an empty container with an explicit context.
    pub fn with_context(name: impl Into<Symbol>, ctx: DspContext) -> Self {
        Self {
            name: name.into(),
            ctx,
            packing: Packing::default(),
            procs: Vec::new(),
            proc_index: BTreeMap::new(),
            pipes: Vec::new(),
            published_params: Vec::new(),
            param_index: BTreeMap::new(),
            published_inputs: Vec::new(),
            input_index: BTreeMap::new(),
            published_outputs: Vec::new(),
            output_index: BTreeMap::new(),
            rated: Vec::new(),
            tap_readers: BTreeMap::new(),
            plan: None,
            pool: Vec::new(),
            null_input: Signal::default(),
            trash: Vec::new(),
        }
    }

    /// The container's name.
    pub fn name(&self) -> Symbol {
        self.name
    }

    /// The current processing context.
    pub fn context(&self) -> &DspContext {
        &self.ctx
    }

    /// The shared-buffer packing strategy used at compile time.
    pub fn packing(&self) -> Packing {
        self.packing
    }

    /// Selects the packing strategy. Takes effect at the next `prepare()`.
    pub fn set_packing(&mut self, packing: Packing) {
        self.packing = packing;
        self.plan = None;
    }

    /// Changes the block size, invalidating the compiled plan.
    pub fn set_vector_size(&mut self, vector_size: usize) {
        self.ctx.set_vector_size(vector_size);
        self.plan = None;
    }

    /// Changes the sample rate, invalidating the compiled plan.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.ctx.set_sample_rate(sample_rate);
        self.plan = None;
    }

    // --- graph creation ---

    /// Adds a proc under a unique name, at the end of the execution order.
    pub fn add_proc(&mut self, name: impl Into<Symbol>, proc: Box<dyn Proc>) -> Result<(), ProcError> {
        let name = name.into();
        if self.proc_index.contains_key(&name) {
            return Err(ProcError::NameInUse);
        }
        self.proc_index.insert(name, self.procs.len());
        self.procs.push(ProcEntry { name, proc });
        self.plan = None;
        Ok(())
    }

    /// Inserts a proc immediately before an existing one in the execution
    /// order. Used for boundary procs that must run before their consumer.
    fn insert_proc_before(
        &mut self,
        before: Symbol,
        name: Symbol,
        proc: Box<dyn Proc>,
    ) -> Result<(), ProcError> {
        if self.proc_index.contains_key(&name) {
            return Err(ProcError::NameInUse);
        }
        let pos = self.slot(before)?;
        self.procs.insert(pos, ProcEntry { name, proc });
        self.proc_index = self
            .procs
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name, i))
            .collect();
        self.plan = None;
        Ok(())
    }

    /// Connects one proc's output port to another's input port.
    ///
    /// Both endpoints must already exist; port names resolve against the
    /// procs' declared tables. The graph is unmodified on error.
    pub fn add_pipe(
        &mut self,
        src: impl Into<Path>,
        output: impl Into<Symbol>,
        dest: impl Into<Path>,
        input: impl Into<Symbol>,
    ) -> Result<(), ProcError> {
        let (src_name, src_idx) = self.resolve(&src.into())?;
        let src_out = self.procs[src_idx]
            .proc
            .info()
            .output_index(output.into())
            .ok_or(ProcError::NotFound)?;
        let (dest_name, dest_idx) = self.resolve(&dest.into())?;
        let dest_in = self.procs[dest_idx]
            .proc
            .info()
            .input_index(input.into())
            .ok_or(ProcError::NotFound)?;
        self.pipes.push(PipeEntry {
            src: src_name,
            src_out,
            dest: dest_name,
            dest_in,
        });
        self.plan = None;
        Ok(())
    }

    /// Looks up a proc by path.
    pub fn proc(&self, path: impl Into<Path>) -> Option<&dyn Proc> {
        let idx = *self.proc_index.get(&path.into().head())?;
        Some(self.procs[idx].proc.as_ref())
    }

    /// Looks up a proc mutably by path.
    pub fn proc_mut(&mut self, path: impl Into<Path>) -> Option<&mut dyn Proc> {
        let idx = *self.proc_index.get(&path.into().head())?;
        Some(self.procs[idx].proc.as_mut())
    }

    /// Number of procs.
    pub fn proc_count(&self) -> usize {
        self.procs.len()
    }

    /// Number of pipes.
    pub fn pipe_count(&self) -> usize {
        self.pipes.len()
    }

    // --- published I/O ---

    /// Publishes a proc input under an alias at the container boundary.
    pub fn publish_input(
        &mut self,
        path: impl Into<Path>,
        input: impl Into<Symbol>,
        alias: impl Into<Symbol>,
    ) -> Result<usize, ProcError> {
        self.publish_input_rated(path, input, alias, Ratio::UNITY)
    }

    /// Publishes a proc input that receives data at a different block rate.
    ///
    /// A non-unity ratio inserts a `resample` proc ahead of the target; the
    /// host then writes `vector_size * up / down` frames per block.
    pub fn publish_input_rated(
        &mut self,
        path: impl Into<Path>,
        input: impl Into<Symbol>,
        alias: impl Into<Symbol>,
        ratio: Ratio,
    ) -> Result<usize, ProcError> {
        if ratio.up == 0 || ratio.down == 0 {
            return Err(ProcError::SizeMismatch);
        }
        let alias = alias.into();
        if self.input_index.contains_key(&alias) {
            return Err(ProcError::NameInUse);
        }
        let (dest_name, dest_idx) = self.resolve(&path.into())?;
        let input_idx = self.procs[dest_idx]
            .proc
            .info()
            .input_index(input.into())
            .ok_or(ProcError::NotFound)?;

        let entry = if ratio.is_unity() {
            PublishedInput {
                alias,
                proc: dest_name,
                input: input_idx,
                dest: dest_name,
                dest_input: input_idx,
            }
        } else {
            let rs_name = Symbol::new(&format!("{alias}_resample"));
            let mut rs = Resample::new();
            rs.set_param(Symbol::new("up"), ratio.up as f32)?;
            rs.set_param(Symbol::new("down"), ratio.down as f32)?;
            self.insert_proc_before(dest_name, rs_name, Box::new(rs))?;
            self.pipes.push(PipeEntry {
                src: rs_name,
                src_out: 0,
                dest: dest_name,
                dest_in: input_idx,
            });
            self.rated.push(RatedPort {
                proc: rs_name,
                kind: PortKind::Input,
                port: 0,
                ratio,
            });
            PublishedInput {
                alias,
                proc: dest_name,
                input: input_idx,
                dest: rs_name,
                dest_input: 0,
            }
        };

        let index = self.published_inputs.len();
        self.published_inputs.push(entry);
        self.input_index.insert(alias, index);
        self.plan = None;
        Ok(index)
    }

    /// Publishes a proc output under an alias at the container boundary.
    pub fn publish_output(
        &mut self,
        path: impl Into<Path>,
        output: impl Into<Symbol>,
        alias: impl Into<Symbol>,
    ) -> Result<usize, ProcError> {
        self.publish_output_rated(path, output, alias, Ratio::UNITY)
    }

    /// Publishes a proc output read at a different block rate.
    ///
    /// A non-unity ratio appends a `resample` proc after the source; the
    /// host then reads `vector_size * up / down` frames per block.
    pub fn publish_output_rated(
        &mut self,
        path: impl Into<Path>,
        output: impl Into<Symbol>,
        alias: impl Into<Symbol>,
        ratio: Ratio,
    ) -> Result<usize, ProcError> {
        if ratio.up == 0 || ratio.down == 0 {
            return Err(ProcError::SizeMismatch);
        }
        let alias = alias.into();
        if self.output_index.contains_key(&alias) {
            return Err(ProcError::NameInUse);
        }
        let (src_name, src_idx) = self.resolve(&path.into())?;
        let output_idx = self.procs[src_idx]
            .proc
            .info()
            .output_index(output.into())
            .ok_or(ProcError::NotFound)?;

        let entry = if ratio.is_unity() {
            PublishedOutput {
                alias,
                proc: src_name,
                output: output_idx,
                src: src_name,
                src_output: output_idx,
            }
        } else {
            let rs_name = Symbol::new(&format!("{alias}_resample"));
            let mut rs = Resample::new();
            rs.set_param(Symbol::new("up"), ratio.up as f32)?;
            rs.set_param(Symbol::new("down"), ratio.down as f32)?;
            self.add_proc(rs_name, Box::new(rs))?;
            self.pipes.push(PipeEntry {
                src: src_name,
                src_out: output_idx,
                dest: rs_name,
                dest_in: 0,
            });
            self.rated.push(RatedPort {
                proc: rs_name,
                kind: PortKind::Output,
                port: 0,
                ratio,
            });
            PublishedOutput {
                alias,
                proc: src_name,
                output: output_idx,
                src: rs_name,
                src_output: 0,
            }
        };

        let index = self.published_outputs.len();
        self.published_outputs.push(entry);
        self.output_index.insert(alias, index);
        self.plan = None;
        Ok(index)
    }

    /// Published input index for an alias.
    pub fn published_input_index(&self, alias: impl Into<Symbol>) -> Option<usize> {
        self.input_index.get(&alias.into()).copied()
    }

    /// Alias of a published input, by index.
    pub fn published_input_alias(&self, index: usize) -> Option<Symbol> {
        self.published_inputs.get(index).map(|e| e.alias)
    }

    /// Alias of a published output, by index.
    pub fn published_output_alias(&self, index: usize) -> Option<Symbol> {
        self.published_outputs.get(index).map(|e| e.alias)
    }

    /// Published output index for an alias.
    pub fn published_output_index(&self, alias: impl Into<Symbol>) -> Option<usize> {
        self.output_index.get(&alias.into()).copied()
    }

    /// Number of published inputs.
    pub fn published_input_count(&self) -> usize {
        self.published_inputs.len()
    }

    /// Number of published outputs.
    pub fn published_output_count(&self) -> usize {
        self.published_outputs.len()
    }

    // --- parameters ---

    /// Publishes one proc's parameter under an alias, returning its index.
    ///
    /// Index-based access is O(1); alias lookup goes through
    /// [`published_param_index`](Self::published_param_index).
    pub fn publish_param(
        &mut self,
        path: impl Into<Path>,
        param: impl Into<Symbol>,
        alias: impl Into<Symbol>,
    ) -> Result<usize, ProcError> {
        let alias = alias.into();
        if self.param_index.contains_key(&alias) {
            return Err(ProcError::NameInUse);
        }
        let (proc_name, proc_idx) = self.resolve(&path.into())?;
        let param = param.into();
        if !self.procs[proc_idx].proc.info().has_param(param) {
            return Err(ProcError::NotFound);
        }
        let index = self.published_params.len();
        self.published_params.push(PublishedParam {
            alias,
            setters: vec![(proc_name, param)],
        });
        self.param_index.insert(alias, index);
        Ok(index)
    }

    /// Attaches another setter target to a published parameter, so one
    /// published value drives several procs.
    pub fn add_param_setter(
        &mut self,
        index: usize,
        path: impl Into<Path>,
        param: impl Into<Symbol>,
    ) -> Result<(), ProcError> {
        let (proc_name, proc_idx) = self.resolve(&path.into())?;
        let param = param.into();
        if !self.procs[proc_idx].proc.info().has_param(param) {
            return Err(ProcError::NotFound);
        }
        self.published_params
            .get_mut(index)
            .ok_or(ProcError::NotFound)?
            .setters
            .push((proc_name, param));
        Ok(())
    }

    /// Writes a published parameter by index, fanning out to every setter.
    ///
    /// The write is lazy on the proc side: values land in the param bags and
    /// take effect at the top of the next `process()`.
    pub fn set_published_param(&mut self, index: usize, value: f32) -> Result<(), ProcError> {
        let count = self
            .published_params
            .get(index)
            .ok_or(ProcError::NotFound)?
            .setters
            .len();
        for k in 0..count {
            let (proc_name, param) = self.published_params[index].setters[k];
            let slot = self.slot(proc_name)?;
            self.procs[slot].proc.set_param(param, value)?;
        }
        Ok(())
    }

    /// Reads a published parameter's current value by index.
    pub fn published_param(&self, index: usize) -> Option<f32> {
        let (proc_name, param) = *self.published_params.get(index)?.setters.first()?;
        let slot = *self.proc_index.get(&proc_name)?;
        Some(self.procs[slot].proc.param(param))
    }

    /// Published parameter index for an alias.
    pub fn published_param_index(&self, alias: impl Into<Symbol>) -> Option<usize> {
        self.param_index.get(&alias.into()).copied()
    }

    /// Alias of a published parameter, by index.
    pub fn published_param_alias(&self, index: usize) -> Option<Symbol> {
        self.published_params.get(index).map(|p| p.alias)
    }

    /// Number of published parameters.
    pub fn published_param_count(&self) -> usize {
        self.published_params.len()
    }

    /// Routes a parameter write to one proc by path.
    pub fn set_param(
        &mut self,
        path: impl Into<Path>,
        param: impl Into<Symbol>,
        value: f32,
    ) -> Result<(), ProcError> {
        let (_, idx) = self.resolve(&path.into())?;
        self.procs[idx].proc.set_param(param.into(), value)
    }

    /// Reads a parameter from one proc by path.
    pub fn param(&self, path: impl Into<Path>, param: impl Into<Symbol>) -> Option<f32> {
        self.proc(path).map(|p| p.param(param.into()))
    }

    // --- signal taps ---

    /// Attaches a ring-buffer tap to a proc output.
    ///
    /// The tap proc is named `alias` and piped from the given output; its
    /// read side is held by the container until claimed with
    /// [`take_tap_reader`](Self::take_tap_reader). `length` is the ring
    /// capacity in frames (0 for the default), `frame_size` the samples per
    /// frame.
    pub fn add_signal_tap(
        &mut self,
        path: impl Into<Path>,
        output: impl Into<Symbol>,
        alias: impl Into<Symbol>,
        length: usize,
        mode: TrigMode,
        frame_size: usize,
    ) -> Result<(), ProcError> {
        let alias = alias.into();
        if self.proc_index.contains_key(&alias) || self.tap_readers.contains_key(&alias) {
            return Err(ProcError::NameInUse);
        }
        let (src_name, src_idx) = self.resolve(&path.into())?;
        let src_out = self.procs[src_idx]
            .proc
            .info()
            .output_index(output.into())
            .ok_or(ProcError::NotFound)?;
        let (tap, reader) = SignalTap::with_reader(length, mode, frame_size);
        self.add_proc(alias, Box::new(tap))?;
        self.pipes.push(PipeEntry {
            src: src_name,
            src_out,
            dest: alias,
            dest_in: 0,
        });
        self.tap_readers.insert(alias, reader);
        self.plan = None;
        Ok(())
    }

    /// Claims the read side of a tap. Each reader can be taken once.
    pub fn take_tap_reader(&mut self, alias: impl Into<Symbol>) -> Option<TapReader> {
        self.tap_readers.remove(&alias.into())
    }

    // --- compilation ---

    /// Resizes every proc for the current context and compiles the graph.
    ///
    /// Must run off the audio thread. On error the container is left
    /// unready — `process()` no-ops — rather than running a stale plan.
    pub fn prepare(&mut self) -> Result<(), ProcError> {
        self.plan = None;
        let ctx = self.ctx;
        for entry in &mut self.procs {
            entry.proc.resize(&ctx)?;
        }

        let ports: Vec<ProcPorts> = self
            .procs
            .iter()
            .map(|e| ProcPorts {
                name: e.name,
                inputs: e.proc.info().input_names().len(),
                outputs: e.proc.info().output_names().len(),
            })
            .collect();

        let mut pipes = Vec::with_capacity(self.pipes.len());
        for p in &self.pipes {
            pipes.push(compile::Pipe {
                src: self.slot(p.src)?,
                src_out: p.src_out,
                dest: self.slot(p.dest)?,
                dest_in: p.dest_in,
            });
        }

        let mut published_inputs = Vec::with_capacity(self.published_inputs.len());
        for e in &self.published_inputs {
            published_inputs.push((self.slot(e.dest)?, e.dest_input));
        }
        let mut published_outputs = Vec::with_capacity(self.published_outputs.len());
        for e in &self.published_outputs {
            published_outputs.push((self.slot(e.src)?, e.src_output));
        }

        let mut input_widths = BTreeMap::new();
        let mut output_widths = BTreeMap::new();
        for r in &self.rated {
            let slot = self.slot(r.proc)?;
            let width = rated_width(ctx.vector_size(), r.ratio)?;
            match r.kind {
                PortKind::Input => input_widths.insert((slot, r.port), width),
                PortKind::Output => output_widths.insert((slot, r.port), width),
            };
        }

        let plan = compile::compile(&CompileRequest {
            procs: &ports,
            pipes: &pipes,
            published_inputs: &published_inputs,
            published_outputs: &published_outputs,
            input_widths: &input_widths,
            output_widths: &output_widths,
            ctx: &ctx,
            packing: self.packing,
        })?;

        let mut pool = Vec::new();
        pool.try_reserve_exact(plan.buffer_count())
            .map_err(|_| ProcError::Memory)?;
        let mut max_width = ctx.vector_size();
        for spec in plan.buffer_specs() {
            max_width = max_width.max(spec.width);
            pool.push(Signal::try_with_dims(spec.width, spec.frame_size)?);
        }

        self.null_input = Signal::try_with_dims(max_width, 1)?;
        let mut trash = Vec::new();
        trash
            .try_reserve_exact(MAX_PROC_PORTS)
            .map_err(|_| ProcError::Memory)?;
        for _ in 0..MAX_PROC_PORTS {
            trash.push(Signal::try_with_dims(max_width, 1)?);
        }

        self.pool = pool;
        self.trash = trash;
        self.plan = Some(plan);
        Ok(())
    }

    /// Returns true when a compiled plan is in place.
    pub fn is_ready(&self) -> bool {
        self.plan.is_some()
    }

    /// The current compiled plan, if any.
    pub fn plan(&self) -> Option<&CompiledPlan> {
        self.plan.as_ref()
    }

    // --- execution ---

    /// Copies host data into a published input's buffer before `process()`.
    ///
    /// No-ops while the container is unready or the index is out of range.
    pub fn set_input(&mut self, index: usize, sig: &Signal) {
        let Some(plan) = &self.plan else { return };
        let Some(&buf) = plan.input_bindings.get(index) else {
            return;
        };
        self.pool[buf].copy_from(sig);
    }

    /// Runs the compiled plan for one block.
    ///
    /// Real-time safe: no allocation, no locking, no error path. A silent
    /// no-op while unready.
    pub fn process(&mut self) {
        let Container {
            plan,
            procs,
            pool,
            trash,
            null_input,
            ctx,
            ..
        } = self;
        let Some(plan) = plan.as_ref() else { return };
        let vector = ctx.vector_size();

        for op in plan.ops() {
            // Lend output buffers out of the pool by value; disconnected
            // outputs write into scratch.
            let mut outs: [Signal; MAX_PROC_PORTS] = core::array::from_fn(|k| match op.outputs[k] {
                Some(buf) => core::mem::take(&mut pool[buf]),
                None => core::mem::take(&mut trash[k]),
            });
            let inputs: [&Signal; MAX_PROC_PORTS] = core::array::from_fn(|k| match op.inputs[k] {
                Some(buf) => &pool[buf],
                None => &*null_input,
            });

            let mut io = ProcIo::new(inputs, &mut outs, vector);
            procs[op.proc_index].proc.process(&mut io);

            for (k, out) in outs.into_iter().enumerate() {
                match op.outputs[k] {
                    Some(buf) => pool[buf] = out,
                    None => trash[k] = out,
                }
            }
        }
    }

    /// Reads a published output's buffer after `process()`.
    pub fn output(&self, index: usize) -> Option<&Signal> {
        let plan = self.plan.as_ref()?;
        plan.output_bindings.get(index).map(|&buf| &self.pool[buf])
    }

    /// Clears every proc's DSP history and zeroes the buffer pool.
    pub fn clear(&mut self) {
        for entry in &mut self.procs {
            entry.proc.clear();
        }
        for sig in &mut self.pool {
            sig.clear();
        }
    }

    // --- internals ---

    fn slot(&self, name: Symbol) -> Result<usize, ProcError> {
        self.proc_index
            .get(&name)
            .copied()
            .ok_or(ProcError::NotFound)
    }

    fn resolve(&self, path: &Path) -> Result<(Symbol, usize), ProcError> {
        let name = path.head();
        Ok((name, self.slot(name)?))
    }
}
