//! Trivial arithmetic procs: gain, add, multiply.
//!
//! These carry no sample-rate-dependent state, so `resize()` is a no-op and
//! they are ready from construction.

use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::symbol::Symbol;

/// Scalar gain: `out = in * gain`.
pub struct Gain {
    info: ProcInfo,
    bag: ParamBag,
    sym_gain: Symbol,
    gain: f32,
}

impl Gain {
    /// Creates a unity-gain instance.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("gain", &["gain"], &["in"], &["out"]),
            bag: ParamBag::new(&[("gain", 1.0)]),
            sym_gain: Symbol::new("gain"),
            gain: 1.0,
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for Gain {
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
        if self.bag.take_changed() {
            self.gain = self.bag.get(self.sym_gain);
        }
        let n = io.vector_size();
        let (x, y) = io.in_out(0, 0);
        let n = n.min(x.width()).min(y.width());
        let gain = self.gain;
        for (dst, &src) in y.row_mut(0)[..n].iter_mut().zip(&x.row(0)[..n]) {
            *dst = src * gain;
        }
    }
}

/// Two-input sum: `out = in1 + in2`.
pub struct Add {
    info: ProcInfo,
    bag: ParamBag,
}

impl Add {
    /// Creates an adder.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("add", &[], &["in1", "in2"], &["out"]),
            bag: ParamBag::default(),
        }
    }
}

impl Default for Add {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for Add {
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
        let n = io.vector_size();
        let a = io.input(0);
        let b = io.input(1);
        let y = io.output(0);
        let n = n.min(a.width()).min(b.width()).min(y.width());
        for i in 0..n {
            y.row_mut(0)[i] = a.row(0)[i] + b.row(0)[i];
        }
    }
}

/// Two-input product: `out = in1 * in2`.
pub struct Multiply {
    info: ProcInfo,
    bag: ParamBag,
}

impl Multiply {
    /// Creates a multiplier.
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("multiply", &[], &["in1", "in2"], &["out"]),
            bag: ParamBag::default(),
        }
    }
}

impl Default for Multiply {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for Multiply {
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
        let n = io.vector_size();
        let a = io.input(0);
        let b = io.input(1);
        let y = io.output(0);
        let n = n.min(a.width()).min(b.width()).min(y.width());
        for i in 0..n {
            y.row_mut(0)[i] = a.row(0)[i] * b.row(0)[i];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::MAX_PROC_PORTS;
    use crate::signal::Signal;

    fn run(proc: &mut dyn Proc, inputs: &[&Signal], width: usize) -> Signal {
        let null = Signal::new(width);
        let mut refs: [&Signal; MAX_PROC_PORTS] = [&null; MAX_PROC_PORTS];
        for (slot, sig) in refs.iter_mut().zip(inputs.iter()) {
            *slot = sig;
        }
        let mut outs: [Signal; MAX_PROC_PORTS] = core::array::from_fn(|_| Signal::new(width));
        let mut io = ProcIo::new(refs, &mut outs, width);
        proc.process(&mut io);
        outs.into_iter().next().unwrap()
    }

    #[test]
    fn gain_scales() {
        let mut gain = Gain::new();
        gain.set_param(Symbol::new("gain"), 0.5).unwrap();
        let mut x = Signal::new(8);
        x.set_to_constant(1.0);
        let y = run(&mut gain, &[&x], 8);
        assert!(y.row(0).iter().all(|&s| s == 0.5));
    }

    #[test]
    fn gain_param_applies_lazily_once() {
        let mut gain = Gain::new();
        let mut x = Signal::new(4);
        x.set_to_constant(1.0);
        run(&mut gain, &[&x], 4);
        gain.set_param(Symbol::new("gain"), 2.0).unwrap();
        let y = run(&mut gain, &[&x], 4);
        assert_eq!(y.row(0)[0], 2.0);
    }

    #[test]
    fn add_and_multiply() {
        let mut a = Signal::new(4);
        a.set_to_constant(2.0);
        let mut b = Signal::new(4);
        b.set_to_constant(3.0);
        let sum = run(&mut Add::new(), &[&a, &b], 4);
        assert!(sum.row(0).iter().all(|&s| s == 5.0));
        let product = run(&mut Multiply::new(), &[&a, &b], 4);
        assert!(product.row(0).iter().all(|&s| s == 6.0));
    }
}
