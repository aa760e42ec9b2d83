//! Lock-free single-producer/single-consumer ring transport.
//!
//! The ring is the only sanctioned channel between the audio thread and
//! non-real-time threads: one side writes, the other reads, and neither ever
//! blocks, allocates, or takes a lock. Overflow and underflow surface only as
//! short counts — a full ring truncates the write, an empty ring truncates
//! the read.
//!
//! # Protocol
//!
//! Capacity is rounded up to a power of two so indices wrap with a mask. Each
//! cursor is advanced only by its owning side: the producer publishes new
//! elements with a `Release` store of the write cursor, and the consumer
//! observes them with an `Acquire` load (and symmetrically for the read
//! cursor). Element slots are 32-bit atomic words accessed `Relaxed`; the
//! cursor handoff orders them. This keeps the whole transport in safe Rust.
//!
//! # Single producer, single consumer — by construction
//!
//! [`RingBuffer::split`] consumes the ring and returns exactly one
//! [`RingProducer`] and one [`RingConsumer`]. Neither handle is cloneable, so
//! a second concurrent producer or consumer cannot exist.
//!
//! ```
//! use tejido_core::ring::RingBuffer;
//!
//! let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(8).split();
//! assert_eq!(tx.write(&[1.0, 2.0, 3.0]), 3);
//! let mut out = [0.0; 3];
//! assert_eq!(rx.read(&mut out), 3);
//! assert_eq!(out, [1.0, 2.0, 3.0]);
//! ```

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::symbol::Symbol;

/// Element types that travel through the ring as 32-bit words.
///
/// Implemented for `f32` samples and [`Symbol`] ids; the word encoding is
/// what lets the ring stay in safe Rust with atomic element slots.
pub trait RingWord: Copy {
    /// Encodes the element as a 32-bit word.
    fn to_word(self) -> u32;
    /// Decodes an element from a 32-bit word.
    fn from_word(word: u32) -> Self;
}

impl RingWord for f32 {
    #[inline]
    fn to_word(self) -> u32 {
        self.to_bits()
    }

    #[inline]
    fn from_word(word: u32) -> Self {
        f32::from_bits(word)
    }
}

impl RingWord for Symbol {
    #[inline]
    fn to_word(self) -> u32 {
        self.to_raw()
    }

    #[inline]
    fn from_word(word: u32) -> Self {
        Symbol::from_raw(word)
    }
}

/// Trash policy for frame-mode reads (see [`RingConsumer::read_frames`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrigMode {
    /// Leave all buffered data intact; deny the read until enough frames
    /// have accumulated.
    #[default]
    NoTrash,
    /// Before reading, discard everything but the most recent requested
    /// window.
    MostRecent,
}

struct RingCore {
    slots: Box<[AtomicU32]>,
    mask: usize,
    write_pos: AtomicUsize,
    read_pos: AtomicUsize,
}

impl RingCore {
    #[inline]
    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// A fixed-capacity SPSC ring, not yet split into its two endpoints.
pub struct RingBuffer<T: RingWord> {
    core: Arc<RingCore>,
    _element: PhantomData<T>,
}

impl<T: RingWord> RingBuffer<T> {
    /// Creates a ring holding at least `min_capacity` elements.
    ///
    /// The actual capacity is `min_capacity` rounded up to a power of two
    /// (minimum 2).
    pub fn with_capacity(min_capacity: usize) -> Self {
        let capacity = min_capacity.next_power_of_two().max(2);
        let slots: Box<[AtomicU32]> = (0..capacity).map(|_| AtomicU32::new(0)).collect();
        Self {
            core: Arc::new(RingCore {
                mask: capacity - 1,
                slots,
                write_pos: AtomicUsize::new(0),
                read_pos: AtomicUsize::new(0),
            }),
            _element: PhantomData,
        }
    }

    /// The ring's element capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Splits the ring into its unique producer and consumer endpoints.
    pub fn split(self) -> (RingProducer<T>, RingConsumer<T>) {
        let producer = RingProducer {
            core: Arc::clone(&self.core),
            _element: PhantomData,
        };
        let consumer = RingConsumer {
            core: self.core,
            _element: PhantomData,
        };
        (producer, consumer)
    }
}

/// The write endpoint of a ring. Owned by exactly one thread at a time.
pub struct RingProducer<T: RingWord> {
    core: Arc<RingCore>,
    _element: PhantomData<T>,
}

impl<T: RingWord> RingProducer<T> {
    /// Copies up to `data.len()` elements into the ring.
    ///
    /// Returns the count actually written, which is short when the ring
    /// lacks free space. Never blocks and never overwrites unread data.
    pub fn write(&mut self, data: &[T]) -> usize {
        let write = self.core.write_pos.load(Ordering::Relaxed);
        let read = self.core.read_pos.load(Ordering::Acquire);
        let free = self.core.capacity() - write.wrapping_sub(read);
        let count = data.len().min(free);
        if count == 0 {
            return 0;
        }
        for (i, item) in data.iter().take(count).enumerate() {
            self.core.slots[(write + i) & self.core.mask].store(item.to_word(), Ordering::Relaxed);
        }
        self.core
            .write_pos
            .store(write.wrapping_add(count), Ordering::Release);
        count
    }

    /// Elements that can currently be written without truncation.
    pub fn slots(&self) -> usize {
        let write = self.core.write_pos.load(Ordering::Relaxed);
        let read = self.core.read_pos.load(Ordering::Acquire);
        self.core.capacity() - write.wrapping_sub(read)
    }

    /// The ring's element capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }
}

/// The read endpoint of a ring. Owned by exactly one thread at a time.
pub struct RingConsumer<T: RingWord> {
    core: Arc<RingCore>,
    _element: PhantomData<T>,
}

impl<T: RingWord> RingConsumer<T> {
    /// Copies up to `dest.len()` elements out of the ring.
    ///
    /// Returns the count actually read, which is short when the ring holds
    /// fewer elements. Never blocks.
    pub fn read(&mut self, dest: &mut [T]) -> usize {
        let write = self.core.write_pos.load(Ordering::Acquire);
        let read = self.core.read_pos.load(Ordering::Relaxed);
        let filled = write.wrapping_sub(read);
        let count = dest.len().min(filled);
        if count == 0 {
            return 0;
        }
        for (i, slot) in dest.iter_mut().take(count).enumerate() {
            *slot =
                T::from_word(self.core.slots[(read + i) & self.core.mask].load(Ordering::Relaxed));
        }
        self.core
            .read_pos
            .store(read.wrapping_add(count), Ordering::Release);
        count
    }

    /// Pops a single element, if one is available.
    pub fn pop(&mut self) -> Option<T> {
        let mut one = [T::from_word(0)];
        (self.read(&mut one) == 1).then(|| one[0])
    }

    /// Discards up to `count` elements by advancing the read cursor.
    ///
    /// Returns the count actually discarded. This is the trash path: no
    /// element data is copied.
    pub fn discard(&mut self, count: usize) -> usize {
        let write = self.core.write_pos.load(Ordering::Acquire);
        let read = self.core.read_pos.load(Ordering::Relaxed);
        let filled = write.wrapping_sub(read);
        let count = count.min(filled);
        self.core
            .read_pos
            .store(read.wrapping_add(count), Ordering::Release);
        count
    }

    /// Elements currently available to read.
    pub fn slots(&self) -> usize {
        let write = self.core.write_pos.load(Ordering::Acquire);
        let read = self.core.read_pos.load(Ordering::Relaxed);
        write.wrapping_sub(read)
    }

    /// The ring's element capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Reads whole frames of `frame_size` elements, honoring a trash policy.
    ///
    /// `dest.len()` must be a multiple of `frame_size`; the requested frame
    /// count is `dest.len() / frame_size`. In [`TrigMode::NoTrash`] the read
    /// is denied (returns 0) until the full request has accumulated. In
    /// [`TrigMode::MostRecent`] older frames beyond the request are discarded
    /// first, so the caller always sees the freshest window. Returns the
    /// number of frames read.
    pub fn read_frames(&mut self, dest: &mut [T], frame_size: usize, mode: TrigMode) -> usize {
        debug_assert!(frame_size > 0);
        debug_assert_eq!(dest.len() % frame_size, 0);
        let frames_wanted = dest.len() / frame_size;
        let frames_available = self.slots() / frame_size;
        if frames_available < frames_wanted {
            return 0;
        }
        if mode == TrigMode::MostRecent {
            self.discard((frames_available - frames_wanted) * frame_size);
        }
        self.read(dest) / frame_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_rounds_up() {
        assert_eq!(RingBuffer::<f32>::with_capacity(5).capacity(), 8);
        assert_eq!(RingBuffer::<f32>::with_capacity(8).capacity(), 8);
    }

    #[test]
    fn roundtrip_preserves_order() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(16).split();
        let data: Vec<f32> = (1..=10).map(|n| n as f32).collect();
        assert_eq!(tx.write(&data), 10);
        let mut out = vec![0.0; 10];
        assert_eq!(rx.read(&mut out), 10);
        assert_eq!(out, data);
    }

    #[test]
    fn full_ring_truncates_write() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(4).split();
        assert_eq!(tx.write(&[1.0; 6]), 4);
        assert_eq!(tx.write(&[2.0]), 0);
        let mut out = [0.0; 2];
        rx.read(&mut out);
        assert_eq!(tx.write(&[2.0; 6]), 2);
    }

    #[test]
    fn empty_ring_truncates_read() {
        let (_tx, mut rx) = RingBuffer::<f32>::with_capacity(4).split();
        let mut out = [0.0; 4];
        assert_eq!(rx.read(&mut out), 0);
        assert_eq!(rx.pop(), None);
    }

    #[test]
    fn slots_are_conserved() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(8).split();
        assert_eq!(tx.slots() + rx.slots(), 8);
        tx.write(&[0.5; 3]);
        assert_eq!(tx.slots(), 5);
        assert_eq!(rx.slots(), 3);
        assert_eq!(tx.slots() + rx.slots(), 8);
        let mut out = [0.0; 2];
        rx.read(&mut out);
        assert_eq!(tx.slots() + rx.slots(), 8);
    }

    #[test]
    fn cursors_wrap_past_capacity() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(4).split();
        let mut out = [0.0; 3];
        for round in 0..100 {
            let v = round as f32;
            assert_eq!(tx.write(&[v, v + 0.5, v + 0.75]), 3);
            assert_eq!(rx.read(&mut out), 3);
            assert_eq!(out, [v, v + 0.5, v + 0.75]);
        }
    }

    #[test]
    fn discard_advances_without_copying() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(8).split();
        tx.write(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rx.discard(2), 2);
        assert_eq!(rx.pop(), Some(3.0));
        assert_eq!(rx.discard(10), 1);
        assert_eq!(rx.slots(), 0);
    }

    #[test]
    fn no_trash_denies_short_reads() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(16).split();
        tx.write(&[1.0, 2.0, 3.0]);
        let mut out = [0.0; 4];
        assert_eq!(rx.read_frames(&mut out, 1, TrigMode::NoTrash), 0);
        // The denied read leaves everything buffered.
        assert_eq!(rx.slots(), 3);
        tx.write(&[4.0]);
        assert_eq!(rx.read_frames(&mut out, 1, TrigMode::NoTrash), 4);
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn most_recent_keeps_freshest_window() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(16).split();
        let data: Vec<f32> = (1..=10).map(|n| n as f32).collect();
        tx.write(&data);
        let mut out = [0.0; 4];
        assert_eq!(rx.read_frames(&mut out, 1, TrigMode::MostRecent), 4);
        assert_eq!(out, [7.0, 8.0, 9.0, 10.0]);
        assert_eq!(rx.slots(), 0);
    }

    #[test]
    fn frame_mode_respects_frame_granularity() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(16).split();
        // Two 3-sample frames plus one stray sample.
        tx.write(&[1.0, 1.1, 1.2, 2.0, 2.1, 2.2, 9.0]);
        let mut out = [0.0; 3];
        assert_eq!(rx.read_frames(&mut out, 3, TrigMode::MostRecent), 1);
        assert_eq!(out, [2.0, 2.1, 2.2]);
    }

    #[test]
    fn symbols_travel_as_words() {
        let (mut tx, mut rx) = RingBuffer::<Symbol>::with_capacity(8).split();
        let gain = Symbol::new("gain");
        let mix = Symbol::new("mix");
        tx.write(&[gain, mix, gain]);
        assert_eq!(rx.pop(), Some(gain));
        assert_eq!(rx.pop(), Some(mix));
        assert_eq!(rx.pop(), Some(gain));
    }

    #[test]
    fn cross_thread_transfer() {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(1024).split();
        let writer = std::thread::spawn(move || {
            let mut sent = 0u32;
            while sent < 10_000 {
                let chunk: Vec<f32> = (sent..sent + 64).map(|n| n as f32).collect();
                let n = tx.write(&chunk);
                sent += n as u32;
            }
        });
        let mut expected = 0u32;
        let mut buf = [0.0f32; 64];
        while expected < 10_000 {
            let n = rx.read(&mut buf);
            for &sample in &buf[..n] {
                assert_eq!(sample, expected as f32);
                expected += 1;
            }
        }
        writer.join().unwrap();
    }
}
