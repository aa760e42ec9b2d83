//! Signal tap: the ring transport's in-graph producer.
//!
//! A `SignalTap` has no signal outputs. Each block it writes its input into
//! a lock-free ring; the paired [`TapReader`] is handed to a non-real-time
//! thread (UI, analysis, disk) and pulls frames out at its own pace. This is
//! the sanctioned way to move signal data off the audio thread.
//!
//! The ring capacity, trash mode, and frame size are fixed when the tap is
//! created, so the reader side has a single owner for the proc's whole life.

use crate::error::ProcError;
use crate::proc::{ParamBag, Proc, ProcInfo, ProcIo};
use crate::ring::{RingBuffer, RingConsumer, RingProducer, TrigMode};
use crate::signal::Signal;
use crate::symbol::Symbol;

/// Default ring length, in frames.
pub(crate) const DEFAULT_TAP_FRAMES: usize = 8192;

/// Ring-writing tap proc. Class `"ringbuffer"`.
///
/// Parameters `length`, `mode`, and `frame_size` mirror the construction
/// arguments for introspection; writing them after construction does not
/// re-shape the ring.
pub struct SignalTap {
    info: ProcInfo,
    bag: ParamBag,
    producer: RingProducer<f32>,
    frame_size: usize,
    frame_scratch: Vec<f32>,
    #[cfg(feature = "tracing")]
    mismatch_logged: bool,
}

impl SignalTap {
    /// Creates a tap and its reader.
    ///
    /// `length` is the ring capacity in frames (rounded up to a power of
    /// two), `mode` the reader's trash policy, `frame_size` the samples per
    /// frame.
    pub fn with_reader(length: usize, mode: TrigMode, frame_size: usize) -> (Self, TapReader) {
        let frame_size = frame_size.max(1);
        let length = if length == 0 { DEFAULT_TAP_FRAMES } else { length };
        let (producer, consumer) = RingBuffer::with_capacity(length * frame_size).split();
        let tap = Self {
            info: ProcInfo::new("ringbuffer", &["length", "mode", "frame_size"], &["in"], &[]),
            bag: ParamBag::new(&[
                ("length", length as f32),
                ("mode", mode as u8 as f32),
                ("frame_size", frame_size as f32),
            ]),
            producer,
            frame_size,
            frame_scratch: vec![0.0; frame_size],
            #[cfg(feature = "tracing")]
            mismatch_logged: false,
        };
        let reader = TapReader {
            consumer,
            mode,
            frame_size,
            frame_scratch: vec![0.0; frame_size],
        };
        (tap, reader)
    }
}

impl Proc for SignalTap {
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
        let x = io.input(0);
        let frames = io.vector_size().min(x.width());
        if frames == 0 {
            return;
        }
        if self.frame_size == 1 {
            // A short write on a full ring is the documented degradation.
            let _ = self.producer.write(&x.row(0)[..frames]);
            return;
        }
        if x.height() != self.frame_size {
            #[cfg(feature = "tracing")]
            if !self.mismatch_logged {
                tracing::warn!(
                    "signal tap: input frame size {} does not match configured {}, write skipped",
                    x.height(),
                    self.frame_size
                );
                self.mismatch_logged = true;
            }
            return;
        }
        // Rotate each column of the tall input into one ring frame.
        for i in 0..frames {
            for (j, slot) in self.frame_scratch.iter_mut().enumerate() {
                *slot = x.sample(i, j);
            }
            let _ = self.producer.write(&self.frame_scratch);
        }
    }
}

/// The non-real-time read side of a [`SignalTap`].
pub struct TapReader {
    consumer: RingConsumer<f32>,
    mode: TrigMode,
    frame_size: usize,
    frame_scratch: Vec<f32>,
}

impl TapReader {
    /// Frames currently buffered.
    pub fn frames_available(&self) -> usize {
        self.consumer.slots() / self.frame_size
    }

    /// Samples per frame.
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// The reader's trash policy.
    pub fn mode(&self) -> TrigMode {
        self.mode
    }

    /// Reads up to `frames` frames into the destination signal, one frame
    /// per column.
    ///
    /// Returns the frames actually read: 0 until the full request has
    /// accumulated (and, in [`TrigMode::MostRecent`], older data beyond the
    /// request is discarded first), or 0 if the destination is too small to
    /// hold a frame.
    pub fn read_to_signal(&mut self, dest: &mut Signal, frames: usize) -> usize {
        let frames_to_read = frames.min(dest.width());
        if frames_to_read == 0 {
            return 0;
        }
        if self.frame_size == 1 {
            return self
                .consumer
                .read_frames(&mut dest.row_mut(0)[..frames_to_read], 1, self.mode);
        }
        if dest.height() < self.frame_size {
            return 0;
        }
        let frames_available = self.frames_available();
        if frames_available < frames_to_read {
            return 0;
        }
        if self.mode == TrigMode::MostRecent {
            self.consumer
                .discard((frames_available - frames_to_read) * self.frame_size);
        }
        let mut read = 0;
        for i in 0..frames_to_read {
            if self.consumer.read(&mut self.frame_scratch) < self.frame_size {
                break;
            }
            for (j, &sample) in self.frame_scratch.iter().enumerate() {
                dest.set_sample(i, j, sample);
            }
            read += 1;
        }
        read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proc::MAX_PROC_PORTS;

    fn write_block(tap: &mut SignalTap, x: &Signal) {
        let refs: [&Signal; MAX_PROC_PORTS] = [x; MAX_PROC_PORTS];
        let mut outs: [Signal; MAX_PROC_PORTS] = core::array::from_fn(|_| Signal::default());
        let mut io = ProcIo::new(refs, &mut outs, x.width());
        tap.process(&mut io);
    }

    #[test]
    fn scalar_tap_roundtrip() {
        let (mut tap, mut reader) = SignalTap::with_reader(64, TrigMode::NoTrash, 1);
        let mut x = Signal::new(8);
        for i in 0..8 {
            x.row_mut(0)[i] = i as f32;
        }
        write_block(&mut tap, &x);

        let mut dest = Signal::new(8);
        assert_eq!(reader.read_to_signal(&mut dest, 8), 8);
        assert_eq!(dest.row(0), x.row(0));
    }

    #[test]
    fn no_trash_waits_for_enough_frames() {
        let (mut tap, mut reader) = SignalTap::with_reader(64, TrigMode::NoTrash, 1);
        let mut x = Signal::new(4);
        x.set_to_constant(1.0);
        write_block(&mut tap, &x);

        let mut dest = Signal::new(8);
        assert_eq!(reader.read_to_signal(&mut dest, 8), 0);
        write_block(&mut tap, &x);
        assert_eq!(reader.read_to_signal(&mut dest, 8), 8);
    }

    #[test]
    fn most_recent_returns_freshest_window() {
        let (mut tap, mut reader) = SignalTap::with_reader(64, TrigMode::MostRecent, 1);
        for block in 0..4 {
            let mut x = Signal::new(8);
            x.set_to_constant(block as f32);
            write_block(&mut tap, &x);
        }
        let mut dest = Signal::new(8);
        assert_eq!(reader.read_to_signal(&mut dest, 8), 8);
        assert!(dest.row(0).iter().all(|&s| s == 3.0));
        assert_eq!(reader.frames_available(), 0);
    }

    #[test]
    fn tall_frames_rotate_through_columns() {
        let (mut tap, mut reader) = SignalTap::with_reader(16, TrigMode::NoTrash, 3);
        let mut x = Signal::with_dims(4, 3);
        for i in 0..4 {
            for j in 0..3 {
                x.set_sample(i, j, (10 * i + j) as f32);
            }
        }
        write_block(&mut tap, &x);

        let mut dest = Signal::with_dims(4, 3);
        assert_eq!(reader.read_to_signal(&mut dest, 4), 4);
        assert_eq!(dest, x);
    }

    #[test]
    fn mismatched_frame_size_skips_write() {
        let (mut tap, mut reader) = SignalTap::with_reader(16, TrigMode::NoTrash, 4);
        let x = Signal::with_dims(4, 2);
        write_block(&mut tap, &x);
        assert_eq!(reader.frames_available(), 0);
    }

    #[test]
    fn reader_too_short_reads_nothing() {
        let (mut tap, mut reader) = SignalTap::with_reader(16, TrigMode::NoTrash, 3);
        let x = Signal::with_dims(2, 3);
        write_block(&mut tap, &x);
        let mut dest = Signal::with_dims(2, 2);
        assert_eq!(reader.read_to_signal(&mut dest, 2), 0);
    }
}
