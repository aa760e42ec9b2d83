//! Change queue, sender, and the view-notifying reporter.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tejido_core::ring::{RingBuffer, RingConsumer, RingProducer};
use tejido_core::{ProcError, Symbol};

use crate::property::{Property, PropertySet};

/// Default change-queue capacity, in queued names.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A view target bound to a property name.
///
/// `view` is invoked on the drain thread with the property's value as of
/// drain time. Closures implement this directly.
pub trait PropertyView: Send {
    /// Pushes the current value to the bound target.
    fn view(&self, value: &Property);
}

impl<F: Fn(&Property) + Send> PropertyView for F {
    fn view(&self, value: &Property) {
        self(value)
    }
}

/// Creates a connected sender/reporter pair with the given queue capacity
/// (0 selects [`DEFAULT_QUEUE_CAPACITY`]).
///
/// The sender belongs to the control thread, the reporter to the observing
/// (UI) thread; the queue between them is a lock-free SPSC ring of property
/// names.
pub fn property_bridge(capacity: usize) -> (PropertySender, PropertyReporter) {
    let capacity = if capacity == 0 {
        DEFAULT_QUEUE_CAPACITY
    } else {
        capacity
    };
    let (producer, consumer) = RingBuffer::<Symbol>::with_capacity(capacity).split();
    let current = Arc::new(Mutex::new(PropertySet::new()));
    let sender = PropertySender {
        producer,
        current: Arc::clone(&current),
    };
    let reporter = PropertyReporter {
        consumer,
        current,
        views: BTreeMap::new(),
        drained: Vec::with_capacity(capacity),
    };
    (sender, reporter)
}

/// The control-thread side: owns writes to the current snapshot and the
/// producer end of the change queue.
pub struct PropertySender {
    producer: RingProducer<Symbol>,
    current: Arc<Mutex<PropertySet>>,
}

impl PropertySender {
    /// Records a property change: overwrites the current value, then
    /// enqueues the name for the next drain.
    ///
    /// On a saturated queue the name is dropped and `QueueFull` returned —
    /// non-fatal by design. The snapshot is updated regardless, so a later
    /// enqueue of the same name still delivers the latest value.
    pub fn enqueue_property_change(
        &mut self,
        name: impl Into<Symbol>,
        value: impl Into<Property>,
    ) -> Result<(), ProcError> {
        let name = name.into();
        self.current
            .lock()
            .expect("property snapshot poisoned")
            .set(name, value.into());
        if self.producer.write(&[name]) == 0 {
            tracing::warn!("property change queue full, dropping \"{name}\"");
            return Err(ProcError::QueueFull);
        }
        Ok(())
    }

    /// Names that can still be enqueued before the queue saturates.
    pub fn queue_space(&self) -> usize {
        self.producer.slots()
    }
}

/// The observing-thread side: drains queued change names and pushes current
/// values to bound views.
pub struct PropertyReporter {
    consumer: RingConsumer<Symbol>,
    current: Arc<Mutex<PropertySet>>,
    views: BTreeMap<Symbol, Vec<Box<dyn PropertyView>>>,
    drained: Vec<Symbol>,
}

impl PropertyReporter {
    /// Binds a view target to a property name. When the property changes,
    /// the view receives the value current at drain time.
    pub fn add_property_view(&mut self, name: impl Into<Symbol>, view: Box<dyn PropertyView>) {
        self.views.entry(name.into()).or_default().push(view);
    }

    /// Reads a property's current value from the snapshot.
    pub fn current(&self, name: impl Into<Symbol>) -> Option<Property> {
        self.current
            .lock()
            .expect("property snapshot poisoned")
            .get(name.into())
            .cloned()
    }

    /// Drains every queued change name and notifies bound views.
    ///
    /// Multiple queued occurrences of one name collapse to a single
    /// notification carrying the value as of this drain. Values are copied
    /// out of the snapshot in one short lock; views run outside it. Returns
    /// the number of view notifications sent.
    pub fn view_properties(&mut self) -> usize {
        self.drained.clear();
        while let Some(name) = self.consumer.pop() {
            if !self.drained.contains(&name) {
                self.drained.push(name);
            }
        }
        if self.drained.is_empty() {
            return 0;
        }

        // Copy-on-drain: one consistent read of the changed values.
        let values: Vec<Option<Property>> = {
            let snapshot = self.current.lock().expect("property snapshot poisoned");
            self.drained
                .iter()
                .map(|&name| snapshot.get(name).cloned())
                .collect()
        };

        let mut notified = 0;
        for (&name, value) in self.drained.iter().zip(&values) {
            let Some(value) = value else { continue };
            if let Some(views) = self.views.get(&name) {
                for view in views {
                    view.view(value);
                    notified += 1;
                }
            }
        }
        notified
    }
}
