//! Built-in processing nodes.
//!
//! Every proc here implements [`Proc`](crate::proc::Proc) and is registered
//! by class name in `tejido-registry`. Procs cache the [`Symbol`]s they look
//! up so `process()` never touches the interner.

mod arith;
mod dc_blocker;
mod delay_input;
mod onepole;
mod resample;
mod tap;

pub use arith::{Add, Gain, Multiply};
pub use dc_blocker::DcBlocker;
pub use delay_input::DelayInput;
pub use onepole::OnePole;
pub use resample::Resample;
pub use tap::{SignalTap, TapReader};
