//! Periodic drain task for a [`PropertyReporter`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::reporter::PropertyReporter;

/// Default polling interval (~30 Hz).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(33);

/// A scheduled periodic task that drains a reporter on its own thread.
///
/// View targets are only ever touched from this thread, which is what makes
/// the bridge safe for UI-side observers. The only cancellation is lifetime
/// teardown: dropping the timer stops the schedule and joins the thread.
pub struct ReporterTimer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<PropertyReporter>>,
}

impl ReporterTimer {
    /// Takes ownership of a reporter and drains it every `interval`.
    ///
    /// Bind views with
    /// [`add_property_view`](PropertyReporter::add_property_view) before
    /// starting the timer.
    pub fn start(mut reporter: PropertyReporter, interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stopping = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            while !stopping.load(Ordering::Acquire) {
                reporter.view_properties();
                std::thread::sleep(interval);
            }
            // One final drain so changes enqueued just before teardown are
            // still delivered.
            reporter.view_properties();
            reporter
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stops the schedule and returns the reporter.
    pub fn stop(mut self) -> PropertyReporter {
        self.stop.store(true, Ordering::Release);
        self.handle
            .take()
            .expect("reporter thread already joined")
            .join()
            .expect("reporter thread panicked")
    }
}

impl Drop for ReporterTimer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use crate::reporter::property_bridge;
    use std::sync::Mutex;

    #[test]
    fn timer_delivers_changes_without_manual_drains() {
        let (mut tx, mut reporter) = property_bridge(64);
        let log = Arc::new(Mutex::new(Vec::new()));
        let writer = Arc::clone(&log);
        reporter.add_property_view(
            "gain",
            Box::new(move |value: &Property| {
                writer.lock().unwrap().push(value.clone());
            }),
        );
        let timer = ReporterTimer::start(reporter, Duration::from_millis(5));

        tx.enqueue_property_change("gain", 0.7).unwrap();
        for _ in 0..200 {
            if !log.lock().unwrap().is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(&*log.lock().unwrap(), &[Property::Float(0.7)]);
        drop(timer);
    }

    #[test]
    fn stop_returns_the_reporter_after_a_final_drain() {
        let (mut tx, reporter) = property_bridge(64);
        let timer = ReporterTimer::start(reporter, Duration::from_millis(50));
        tx.enqueue_property_change("mix", 0.4).unwrap();
        let reporter = timer.stop();
        // The final drain consumed the queue; the snapshot has the value.
        assert_eq!(reporter.current("mix"), Some(Property::Float(0.4)));
    }
}
