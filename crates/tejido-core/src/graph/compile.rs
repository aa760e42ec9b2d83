//! Graph compilation: signal lifetimes, shared-buffer packing, and the flat
//! operation plan.
//!
//! Compilation turns a container's procs and pipes into a [`CompiledPlan`]:
//! a flat list of per-proc operations with every input and output port bound
//! to a slot in a minimal pool of shared signal buffers.
//!
//! The op order is the proc insertion order — the container performs no
//! topological sort. Graph construction is expected to add procs in
//! dependency order; a pipe whose destination precedes its source reads the
//! previous block's data, which is how backward paths behave.
//!
//! Buffer assignment is not quite bin packing: signals can never be moved in
//! time, only storage is shared. Each signal's lifetime window `[start, end]`
//! spans the op indices during which some consumer still needs its value;
//! two signals may share a buffer only if their windows are provably
//! non-overlapping.

use std::collections::BTreeMap;

use crate::context::DspContext;
use crate::error::ProcError;
use crate::proc::MAX_PROC_PORTS;
use crate::symbol::Symbol;

/// An index-resolved edge handed to the compiler by the container.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pipe {
    pub src: usize,
    pub src_out: usize,
    pub dest: usize,
    pub dest_in: usize,
}

/// Shared-buffer packing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Packing {
    /// Every signal gets its own buffer. Simple, O(n) buffers.
    Wasteful,
    /// A signal reuses the first existing shared buffer whose occupants all
    /// have non-overlapping lifetimes; a new buffer is opened only when none
    /// fits.
    #[default]
    FirstFit,
}

/// Per-proc port counts handed to the compiler by the container.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcPorts {
    pub name: Symbol,
    pub inputs: usize,
    pub outputs: usize,
}

/// One logical signal's compiler-internal metadata: its lifetime window over
/// the flat op index space and its storage requirements.
#[derive(Debug, Clone)]
pub(crate) struct CompileSignal {
    /// Producer name — used for schedule dumps and future introspection APIs.
    #[allow(dead_code)]
    pub name: Symbol,
    /// `[start, end]` op-index window, `None` until first use is recorded.
    pub life: Option<(usize, usize)>,
    pub width: usize,
    pub frame_size: usize,
}

impl CompileSignal {
    pub fn new(name: Symbol, width: usize, frame_size: usize) -> Self {
        Self {
            name,
            life: None,
            width,
            frame_size,
        }
    }

    /// Unions the current lifetime with `[start, end]`.
    pub fn add_lifespan(&mut self, start: usize, end: usize) {
        let (lo, hi) = (start.min(end), start.max(end));
        self.life = Some(match self.life {
            None => (lo, hi),
            Some((s, e)) => (s.min(lo), e.max(hi)),
        });
    }

    /// Inclusive-window overlap test. Unused signals overlap nothing.
    pub fn overlaps(&self, other: &CompileSignal) -> bool {
        match (self.life, other.life) {
            (Some((s1, e1)), Some((s2, e2))) => s1 <= e2 && s2 <= e1,
            _ => false,
        }
    }
}

/// A storage region shared by signals with non-overlapping lifetimes.
///
/// Occupants are kept sorted by lifetime start; the no-overlap invariant is
/// what makes the sharing sound.
#[derive(Debug, Default)]
pub(crate) struct SharedBuffer {
    /// Indices into the compile pass's signal list, sorted by lifetime start.
    pub occupants: Vec<usize>,
    pub width: usize,
    pub frame_size: usize,
}

impl SharedBuffer {
    /// A signal fits if its dimensions match the buffer's and its lifetime
    /// avoids every occupant's. Dimension equality keeps a rate-adapted
    /// boundary signal from landing in a wider pooled buffer, where its
    /// consumer would misread the block length.
    pub fn can_fit(&self, sig: &CompileSignal, signals: &[CompileSignal]) -> bool {
        (self.occupants.is_empty()
            || (self.width == sig.width && self.frame_size == sig.frame_size))
            && self.occupants.iter().all(|&n| !signals[n].overlaps(sig))
    }

    /// Inserts a signal, keeping occupants sorted by lifetime start.
    pub fn insert(&mut self, index: usize, signals: &[CompileSignal]) {
        let start = signals[index].life.map_or(usize::MAX, |(s, _)| s);
        let pos = self
            .occupants
            .partition_point(|&n| signals[n].life.map_or(usize::MAX, |(s, _)| s) <= start);
        self.occupants.insert(pos, index);
        self.width = signals[index].width;
        self.frame_size = signals[index].frame_size;
    }
}

/// Packs a signal by always opening a fresh buffer. Returns the buffer index.
pub(crate) fn pack_wasteful(
    index: usize,
    buffers: &mut Vec<SharedBuffer>,
    signals: &[CompileSignal],
) -> usize {
    let mut buf = SharedBuffer::default();
    buf.insert(index, signals);
    buffers.push(buf);
    buffers.len() - 1
}

/// Packs a signal into the first buffer it fits, opening a new one only when
/// none fits. Returns the buffer index.
pub(crate) fn pack_first_fit(
    index: usize,
    buffers: &mut Vec<SharedBuffer>,
    signals: &[CompileSignal],
) -> usize {
    for (b, buf) in buffers.iter_mut().enumerate() {
        if buf.can_fit(&signals[index], signals) {
            buf.insert(index, signals);
            return b;
        }
    }
    pack_wasteful(index, buffers, signals)
}

/// Allocation spec for one pooled buffer: its occupants' common width and
/// frame size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSpec {
    /// Frames the pooled signal must hold.
    pub width: usize,
    /// Samples per frame (signal height).
    pub frame_size: usize,
}

/// One flattened operation: run one proc with these buffer bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOp {
    /// Index into the container's proc list.
    pub proc_index: usize,
    /// Pool buffer bound to each input port; `None` means the null input.
    pub inputs: [Option<usize>; MAX_PROC_PORTS],
    /// Pool buffer bound to each output port; `None` means scratch.
    pub outputs: [Option<usize>; MAX_PROC_PORTS],
}

/// The compiled form of a graph: a flat, ordered op list plus the buffer
/// pool layout and published-I/O bindings.
///
/// A plan is immutable once built; the container discards it on any mutation
/// so the audio thread can never execute a stale or partial schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPlan {
    pub(crate) ops: Vec<PlanOp>,
    pub(crate) buffers: Vec<BufferSpec>,
    /// Pool buffer for each published input, by published index.
    pub(crate) input_bindings: Vec<usize>,
    /// Pool buffer for each published output, by published index.
    pub(crate) output_bindings: Vec<usize>,
}

impl CompiledPlan {
    /// The flattened operations, in execution order.
    pub fn ops(&self) -> &[PlanOp] {
        &self.ops
    }

    /// Allocation specs for the shared buffer pool.
    pub fn buffer_specs(&self) -> &[BufferSpec] {
        &self.buffers
    }

    /// Number of operations.
    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Number of pooled buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }
}

/// Everything the compiler needs to know about the container.
pub(crate) struct CompileRequest<'a> {
    pub procs: &'a [ProcPorts],
    pub pipes: &'a [Pipe],
    /// `(proc, input port)` for each published input, by published index.
    pub published_inputs: &'a [(usize, usize)],
    /// `(proc, output port)` for each published output, by published index.
    pub published_outputs: &'a [(usize, usize)],
    /// Width overrides for rate-adapted ports, from the publish API.
    pub input_widths: &'a BTreeMap<(usize, usize), usize>,
    pub output_widths: &'a BTreeMap<(usize, usize), usize>,
    pub ctx: &'a DspContext,
    pub packing: Packing,
}

/// Runs one compile pass. See the module docs for the algorithm.
pub(crate) fn compile(req: &CompileRequest<'_>) -> Result<CompiledPlan, ProcError> {
    let op_count = req.procs.len();
    let vector = req.ctx.vector_size();

    // A signal per proc output that anything consumes, plus one per
    // published input. Creation order is deterministic (proc order, then
    // port order, then published-input order), which makes recompilation of
    // an unchanged graph reproducible.
    let mut signals: Vec<CompileSignal> = Vec::new();
    let mut out_signal: BTreeMap<(usize, usize), usize> = BTreeMap::new();

    let consumed: std::collections::BTreeSet<(usize, usize)> = req
        .pipes
        .iter()
        .map(|p| (p.src, p.src_out))
        .chain(req.published_outputs.iter().copied())
        .collect();

    for (proc_idx, ports) in req.procs.iter().enumerate() {
        for out in 0..ports.outputs {
            if !consumed.contains(&(proc_idx, out)) {
                continue;
            }
            let width = req
                .output_widths
                .get(&(proc_idx, out))
                .copied()
                .unwrap_or(vector);
            let sig_idx = signals.len();
            signals.push(CompileSignal::new(ports.name, width, 1));
            signals[sig_idx].add_lifespan(proc_idx, proc_idx);
            out_signal.insert((proc_idx, out), sig_idx);
        }
    }

    let mut input_signals: Vec<usize> = Vec::with_capacity(req.published_inputs.len());
    for &(proc_idx, input) in req.published_inputs {
        if proc_idx >= op_count {
            return Err(ProcError::NotFound);
        }
        let width = req
            .input_widths
            .get(&(proc_idx, input))
            .copied()
            .unwrap_or(vector);
        let sig_idx = signals.len();
        signals.push(CompileSignal::new(req.procs[proc_idx].name, width, 1));
        // Written by the host before the first op, read by the target op.
        signals[sig_idx].add_lifespan(0, proc_idx);
        input_signals.push(sig_idx);
    }

    // Pipes extend the source signal's lifetime to its consumers and record
    // the destination-port binding.
    let mut input_binding: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for pipe in req.pipes {
        if pipe.src >= op_count || pipe.dest >= op_count {
            return Err(ProcError::NotFound);
        }
        let sig_idx = out_signal[&(pipe.src, pipe.src_out)];
        signals[sig_idx].add_lifespan(pipe.src, pipe.dest);
        input_binding.insert((pipe.dest, pipe.dest_in), sig_idx);
        #[cfg(feature = "tracing")]
        if pipe.dest <= pipe.src {
            tracing::warn!(
                "backward pipe: op {} reads op {} from the previous block",
                pipe.dest,
                pipe.src
            );
        }
    }

    for (published, &(proc_idx, input)) in req.published_inputs.iter().enumerate() {
        input_binding.insert((proc_idx, input), input_signals[published]);
    }

    // Published outputs stay live past the final op so the host can read
    // them after process().
    for &(proc_idx, out) in req.published_outputs {
        let sig_idx = *out_signal.get(&(proc_idx, out)).ok_or(ProcError::NotFound)?;
        signals[sig_idx].add_lifespan(proc_idx, op_count);
    }

    // Pack every signal into shared buffers, in creation order.
    let mut shared: Vec<SharedBuffer> = Vec::new();
    let mut signal_buffer: Vec<usize> = Vec::with_capacity(signals.len());
    for sig_idx in 0..signals.len() {
        let buf = match req.packing {
            Packing::Wasteful => pack_wasteful(sig_idx, &mut shared, &signals),
            Packing::FirstFit => pack_first_fit(sig_idx, &mut shared, &signals),
        };
        signal_buffer.push(buf);
    }

    let buffers: Vec<BufferSpec> = shared
        .iter()
        .map(|buf| BufferSpec {
            width: buf.width.max(1),
            frame_size: buf.frame_size.max(1),
        })
        .collect();

    // Emit the flat op list with per-port buffer bindings.
    let mut ops: Vec<PlanOp> = Vec::with_capacity(op_count);
    for (proc_idx, ports) in req.procs.iter().enumerate() {
        let mut op = PlanOp {
            proc_index: proc_idx,
            inputs: [None; MAX_PROC_PORTS],
            outputs: [None; MAX_PROC_PORTS],
        };
        for port in 0..ports.inputs.min(MAX_PROC_PORTS) {
            op.inputs[port] = input_binding
                .get(&(proc_idx, port))
                .map(|&sig| signal_buffer[sig]);
        }
        for port in 0..ports.outputs.min(MAX_PROC_PORTS) {
            op.outputs[port] = out_signal
                .get(&(proc_idx, port))
                .map(|&sig| signal_buffer[sig]);
        }
        ops.push(op);
    }

    let input_bindings: Vec<usize> = input_signals.iter().map(|&sig| signal_buffer[sig]).collect();
    let output_bindings: Vec<usize> = req
        .published_outputs
        .iter()
        .map(|&(proc_idx, out)| signal_buffer[out_signal[&(proc_idx, out)]])
        .collect();

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            "compiled {} ops, {} signals into {} shared buffers ({:?})",
            ops.len(),
            signals.len(),
            buffers.len(),
            req.packing
        );
        for (i, sig) in signals.iter().enumerate() {
            tracing::debug!(
                "  signal[{i}] from '{}' life {:?} -> buffer {}",
                sig.name,
                sig.life,
                signal_buffer[i]
            );
        }
    }

    Ok(CompiledPlan {
        ops,
        buffers,
        input_bindings,
        output_bindings,
    })
}
