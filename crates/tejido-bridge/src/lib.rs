//! Tejido Bridge — cross-thread property change reporting.
//!
//! The bridge lets a UI-side observer watch property changes produced on a
//! control/DSP thread without either side blocking the other. Changes are
//! coalesced until the observer polls: the producer overwrites a "current"
//! snapshot in place and enqueues only the property *name* on a lock-free
//! ring, so a drain always delivers the most recent value, never a stale
//! intermediate one.
//!
//! ```text
//! control thread ──► PropertySender::enqueue_property_change(name, value)
//!                         │  (snapshot overwrite + name on the ring)
//!                         ▼
//! UI thread      ──► PropertyReporter::view_properties()   (or ReporterTimer)
//!                         │  (drain names, snapshot values, notify views)
//!                         ▼
//!                    PropertyView::view(&value)  per bound target
//! ```
//!
//! Queue saturation is non-fatal: the update's name is dropped (and logged),
//! but the snapshot still advances, so the next enqueue of the same name
//! delivers the latest value.

mod property;
mod reporter;
mod timer;

pub use property::{Property, PropertySet};
pub use reporter::{DEFAULT_QUEUE_CAPACITY, PropertyReporter, PropertySender, PropertyView, property_bridge};
pub use timer::{DEFAULT_POLL_INTERVAL, ReporterTimer};
