//! One-pole lowpass proc.
//!
//! The simplest possible lowpass — 6 dB/octave rolloff, one multiply per
//! sample:
//!
//! ```text
//! y[n] = y[n-1] + k * (x[n] - y[n-1]),   k = sin(2π * frequency / sr)
//! ```
//!
//! The coefficient is recomputed lazily when the `frequency` parameter has
//! changed, once per block at the top of `process()`.

use libm::sinf;

use crate::context::DspContext;
use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::symbol::Symbol;

/// One-pole (6 dB/oct) lowpass filter proc. Class `"onepole"`.
pub struct OnePole {
    info: ProcInfo,
    bag: ParamBag,
    sym_frequency: Symbol,
    ctx: DspContext,
    ready: bool,
    // coeffs
    k: f32,
    // history
    y1: f32,
}

impl OnePole {
    /// Creates a filter with the default 1 kHz cutoff.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("onepole", &["frequency"], &["in"], &["out"]),
            bag: ParamBag::new(&[("frequency", 1000.0)]),
            sym_frequency: Symbol::new("frequency"),
            ctx: DspContext::default(),
            ready: false,
            k: 0.0,
            y1: 0.0,
        }
    }

    fn do_params(&mut self) {
        let sr = self.ctx.sample_rate();
        let f = self.bag.get(self.sym_frequency).clamp(50.0, sr * 0.25);
        self.k = sinf(core::f32::consts::TAU * f * self.ctx.inv_sample_rate());
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for OnePole {
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
        self.ready = true;
        self.do_params();
        Ok(())
    }

    fn clear(&mut self) {
        self.y1 = 0.0;
    }

    fn process(&mut self, io: &mut ProcIo<'_>) {
        let n = io.vector_size();
        let (x, y) = io.in_out(0, 0);
        let n = n.min(x.width()).min(y.width());
        if !self.ready {
            y.row_mut(0)[..n].fill(0.0);
            return;
        }
        if self.bag.take_changed() {
            self.do_params();
        }
        let k = self.k;
        let mut y1 = self.y1;
        for (dst, &src) in y.row_mut(0)[..n].iter_mut().zip(&x.row(0)[..n]) {
            y1 += k * (src - y1);
            *dst = y1;
        }
        self.y1 = y1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::MAX_PROC_PORTS;
    use crate::signal::Signal;

    fn run_block(proc: &mut OnePole, x: &Signal) -> Signal {
        let width = x.width();
        let refs: [&Signal; MAX_PROC_PORTS] = [x; MAX_PROC_PORTS];
        let mut outs: [Signal; MAX_PROC_PORTS] = core::array::from_fn(|_| Signal::new(width));
        let mut io = ProcIo::new(refs, &mut outs, width);
        proc.process(&mut io);
        outs.into_iter().next().unwrap()
    }

    #[test]
    fn unready_writes_silence() {
        let mut lp = OnePole::new();
        let mut x = Signal::new(8);
        x.set_to_constant(1.0);
        let y = run_block(&mut lp, &x);
        assert!(y.row(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn settles_toward_dc() {
        let mut lp = OnePole::new();
        lp.resize(&DspContext::new(64, 48_000.0)).unwrap();
        let mut x = Signal::new(64);
        x.set_to_constant(1.0);
        let mut last = 0.0;
        for _ in 0..200 {
            let y = run_block(&mut lp, &x);
            last = y.row(0)[63];
        }
        assert!((last - 1.0).abs() < 1e-3, "DC should pass, got {last}");
    }

    #[test]
    fn clear_matches_fresh_instance() {
        let ctx = DspContext::new(16, 48_000.0);
        let mut x = Signal::new(16);
        x.set_to_constant(0.7);

        let mut used = OnePole::new();
        used.resize(&ctx).unwrap();
        run_block(&mut used, &x);
        run_block(&mut used, &x);
        used.clear();

        let mut fresh = OnePole::new();
        fresh.resize(&ctx).unwrap();

        let a = run_block(&mut used, &x);
        let b = run_block(&mut fresh, &x);
        assert_eq!(a.row(0), b.row(0));
    }
}
