//! DC-blocking highpass proc.
//!
//! One zero at DC and one pole just inside the unit circle:
//!
//! ```text
//! y[n] = x[n] - x[n-1] + r * y[n-1],   r = cos(2π * f / sr)
//! ```

use libm::cosf;

use crate::context::DspContext;
use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::symbol::Symbol;

/// DC blocker proc. Class `"dc_blocker"`.
pub struct DcBlocker {
    info: ProcInfo,
    bag: ParamBag,
    sym_f: Symbol,
    ctx: DspContext,
    ready: bool,
    // coeffs
    r: f32,
    // history
    xn1: f32,
    yn1: f32,
}

impl DcBlocker {
    /// Creates a blocker with the default 200 Hz corner (not steep).
    pub fn new() -> Self {
        Self {
            info: ProcInfo::new("dc_blocker", &["f"], &["in"], &["out"]),
            bag: ParamBag::new(&[("f", 200.0)]),
            sym_f: Symbol::new("f"),
            ctx: DspContext::default(),
            ready: false,
            r: 0.0,
            xn1: 0.0,
            yn1: 0.0,
        }
    }

    fn calc_coeffs(&mut self) {
        let omega = self.bag.get(self.sym_f) * core::f32::consts::TAU * self.ctx.inv_sample_rate();
        self.r = cosf(omega);
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl Proc for DcBlocker {
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
        self.calc_coeffs();
        Ok(())
    }

    fn clear(&mut self) {
        self.xn1 = 0.0;
        self.yn1 = 0.0;
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
            self.calc_coeffs();
        }
        let r = self.r;
        let mut xn1 = self.xn1;
        let mut yn1 = self.yn1;
        for (dst, &src) in y.row_mut(0)[..n].iter_mut().zip(&x.row(0)[..n]) {
            let out = src - xn1 + r * yn1;
            xn1 = src;
            yn1 = out;
            *dst = out;
        }
        self.xn1 = xn1;
        self.yn1 = yn1;
    }
}
