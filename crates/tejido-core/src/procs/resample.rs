//! Block-rate adapter for published inputs and outputs.
//!
//! Inserted automatically by the container when a published input or output
//! declares a non-unity rate ratio. Converts between its input block length
//! and its output block length by linear interpolation; the lengths come
//! from the bound signals, which the compiler sizes from the declared ratio.

use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::symbol::Symbol;

/// Linear-interpolation block-rate converter. Class `"resample"`.
///
/// The `up`/`down` parameters record the declared ratio for introspection;
/// processing reads the actual bound block lengths.
pub struct Resample {
    info: ProcInfo,
    bag: ParamBag,
}

impl Resample {
    /// Creates a unity-ratio resampler.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("resample", &["up", "down"], &["in"], &["out"]),
            bag: ParamBag::new(&[("up", 1.0), ("down", 1.0)]),
        }
    }
}

impl Default for Resample {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for Resample {
    fn info(&self) -> &ProcInfo {
        &self.info
    }

    fn set_param(&mut self, name: Symbol, value: f32) -> Result<(), ProcError> {
        self.bag.set(name, value)
    }

    fn param(&self, name: Symbol) -> f32 {
        self.bag.get(name)
    }

    fn process(&mut self, io: &mut ProcIo<'_>) {
        let (x, y) = io.in_out(0, 0);
        let win = x.width();
        let wout = y.width();
        if win == 0 || wout == 0 {
            return;
        }
        let src = &x.row(0)[..win];
        let dst = &mut y.row_mut(0)[..wout];
        if win == wout {
            dst.copy_from_slice(src);
            return;
        }
        let step = win as f32 / wout as f32;
        for (j, slot) in dst.iter_mut().enumerate() {
            let pos = j as f32 * step;
            let i0 = (pos as usize).min(win - 1);
            let i1 = (i0 + 1).min(win - 1);
            let frac = pos - i0 as f32;
            *slot = src[i0] + (src[i1] - src[i0]) * frac;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::MAX_PROC_PORTS;
    use crate::signal::Signal;

    fn run(proc: &mut Resample, x: &Signal, out_width: usize) -> Signal {
        let refs: [&Signal; MAX_PROC_PORTS] = [x; MAX_PROC_PORTS];
        let mut outs: [Signal; MAX_PROC_PORTS] =
            core::array::from_fn(|_| Signal::new(out_width));
        let mut io = ProcIo::new(refs, &mut outs, x.width().max(out_width));
        proc.process(&mut io);
        outs.into_iter().next().unwrap()
    }

    #[test]
    fn unity_copies() {
        let mut rs = Resample::new();
        let mut x = Signal::new(8);
        for i in 0..8 {
            x.row_mut(0)[i] = i as f32;
        }
        let y = run(&mut rs, &x, 8);
        assert_eq!(y.row(0), x.row(0));
    }

    #[test]
    fn downsample_halves_length() {
        let mut rs = Resample::new();
        let mut x = Signal::new(8);
        for i in 0..8 {
            x.row_mut(0)[i] = i as f32;
        }
        let y = run(&mut rs, &x, 4);
        // Step 2.0 picks every other sample exactly.
        assert_eq!(y.row(0), &[0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn upsample_interpolates() {
        let mut rs = Resample::new();
        let mut x = Signal::new(4);
        for i in 0..4 {
            x.row_mut(0)[i] = i as f32;
        }
        let y = run(&mut rs, &x, 8);
        assert_eq!(y.row(0)[0], 0.0);
        assert!((y.row(0)[1] - 0.5).abs() < 1e-6);
        assert!((y.row(0)[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn constant_survives_resampling() {
        let mut rs = Resample::new();
        let mut x = Signal::new(6);
        x.set_to_constant(0.25);
        let y = run(&mut rs, &x, 9);
        assert!(y.row(0).iter().all(|&s| (s - 0.25).abs() < 1e-6));
    }
}
