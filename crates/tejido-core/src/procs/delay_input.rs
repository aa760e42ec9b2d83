//! Write side of a backward signal path.
//!
//! `delay_input` has no signal outputs: it writes its input into a
//! power-of-two delay line every block, and downstream taps read from that
//! history. A ring of some form is required whenever a signal travels
//! backward in the schedule, because the reader sees data from the previous
//! block.

use crate::context::DspContext;
use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::symbol::Symbol;

/// Backward-path delay line writer. Class `"delay_input"`.
///
/// The `length` parameter is in seconds; `resize()` allocates the next
/// power of two at or above `length * sample_rate` samples so the write
/// index wraps with a mask.
pub struct DelayInput {
    info: ProcInfo,
    bag: ParamBag,
    ctx: DspContext,
    buffer: Vec<f32>,
    length_mask: usize,
    write_index: usize,
}

impl DelayInput {
    /// Creates a delay line with the default 0.1 s length.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("delay_input", &["length"], &["in"], &[]),
            bag: ParamBag::new(&[("length", 0.1)]),
            ctx: DspContext::default(),
            buffer: Vec::new(),
            length_mask: 0,
            write_index: 0,
        }
    }

    /// Reads a sample written `samples_back` samples ago (0 = most recent).
    ///
    /// Returns 0.0 before the first successful `resize()`.
    pub fn tap(&self, samples_back: usize) -> f32 {
        if self.buffer.is_empty() {
            return 0.0;
        }
        let index = self
            .write_index
            .wrapping_sub(1 + samples_back)
            & self.length_mask;
        self.buffer[index]
    }

    /// The allocated delay length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl Default for DelayInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for DelayInput {
    fn info(&self) -> &ProcInfo {
        &self.info
    }

    fn set_param(&mut self, name: Symbol, value: f32) -> Result<(), ProcError> {
        self.bag.set(name, value)
    }

    fn param(&self, name: Symbol) -> f32 {
        self.bag.get(name)
    }

    fn resize(&mut self, ctx: &DspContext) -> Result<(), ProcError> {
        self.ctx = *ctx;
        let seconds = self.bag.get(Symbol::new("length")).max(0.0);
        let samples = ((seconds * ctx.sample_rate()) as usize).max(1);
        let capacity = samples.next_power_of_two();
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| ProcError::Memory)?;
        buffer.resize(capacity, 0.0);
        self.buffer = buffer;
        self.length_mask = capacity - 1;
        self.write_index = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_index = 0;
    }

    fn process(&mut self, io: &mut ProcIo<'_>) {
        if self.buffer.is_empty() {
            return;
        }
        let x = io.input(0);
        let n = io.vector_size().min(x.width());
        for &src in &x.row(0)[..n] {
            self.write_index &= self.length_mask;
            self.buffer[self.write_index] = src;
            self.write_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::MAX_PROC_PORTS;
    use crate::signal::Signal;

    fn write_block(proc: &mut DelayInput, x: &Signal) {
        let width = x.width();
        let refs: [&Signal; MAX_PROC_PORTS] = [x; MAX_PROC_PORTS];
        let mut outs: [Signal; MAX_PROC_PORTS] = core::array::from_fn(|_| Signal::default());
        let mut io = ProcIo::new(refs, &mut outs, width);
        proc.process(&mut io);
    }

    #[test]
    fn capacity_is_power_of_two() {
        let mut delay = DelayInput::new();
        delay.set_param(Symbol::new("length"), 0.01).unwrap();
        delay.resize(&DspContext::new(64, 48_000.0)).unwrap();
        // 0.01 s at 48 kHz = 480 samples -> 512.
        assert_eq!(delay.capacity(), 512);
    }

    #[test]
    fn taps_read_back_history() {
        let mut delay = DelayInput::new();
        delay.resize(&DspContext::new(4, 48_000.0)).unwrap();
        let mut x = Signal::new(4);
        for i in 0..4 {
            x.row_mut(0)[i] = i as f32;
        }
        write_block(&mut delay, &x);
        assert_eq!(delay.tap(0), 3.0);
        assert_eq!(delay.tap(3), 0.0);
    }

    #[test]
    fn process_before_resize_is_a_noop() {
        let mut delay = DelayInput::new();
        let mut x = Signal::new(4);
        x.set_to_constant(1.0);
        write_block(&mut delay, &x);
        assert_eq!(delay.tap(0), 0.0);
        assert_eq!(delay.capacity(), 0);
    }

    #[test]
    fn clear_zeroes_history() {
        let mut delay = DelayInput::new();
        delay.resize(&DspContext::new(4, 48_000.0)).unwrap();
        let mut x = Signal::new(4);
        x.set_to_constant(0.9);
        write_block(&mut delay, &x);
        delay.clear();
        assert_eq!(delay.tap(0), 0.0);
    }
}
