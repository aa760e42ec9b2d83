//! Property-based tests for the ring transport and path parsing.

use proptest::prelude::*;
use std::collections::VecDeque;
use tejido_core::ring::{RingBuffer, TrigMode};
use tejido_core::{PATH_MAX_SYMBOLS, Path};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// For any interleaving of writes and reads on a ring of capacity C:
    /// reads never return data that was not written, data comes out in
    /// order, and the free/filled slot counts always sum to C.
    #[test]
    fn ring_conserves_data_and_slots(
        capacity_pow in 1usize..8,
        ops in prop::collection::vec((any::<bool>(), 1usize..48), 1..200),
    ) {
        let capacity = 1 << capacity_pow;
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(capacity).split();
        let mut model: VecDeque<f32> = VecDeque::new();
        let mut next_value = 0u32;

        for (is_write, count) in ops {
            if is_write {
                let chunk: Vec<f32> = (0..count)
                    .map(|i| (next_value + i as u32) as f32)
                    .collect();
                let written = tx.write(&chunk);
                prop_assert!(written <= count);
                prop_assert!(model.len() + written <= capacity);
                for &v in &chunk[..written] {
                    model.push_back(v);
                }
                next_value += written as u32;
            } else {
                let mut dest = vec![0.0f32; count];
                let read = rx.read(&mut dest);
                prop_assert!(read <= model.len(), "read ahead of the writer");
                for &v in &dest[..read] {
                    prop_assert_eq!(v, model.pop_front().unwrap());
                }
            }
            prop_assert_eq!(rx.slots(), model.len());
            prop_assert_eq!(tx.slots() + rx.slots(), capacity);
        }
    }

    /// Writing 1..=N then reading N yields 1..=N unchanged, for any N below
    /// capacity.
    #[test]
    fn ring_roundtrip_is_lossless(n in 1usize..256) {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(256).split();
        let data: Vec<f32> = (1..=n).map(|v| v as f32).collect();
        prop_assert_eq!(tx.write(&data), n);
        let mut out = vec![0.0f32; n];
        prop_assert_eq!(rx.read(&mut out), n);
        prop_assert_eq!(out, data);
    }

    /// In most-recent mode a frame read always returns the freshest window,
    /// regardless of how much data accumulated in between.
    #[test]
    fn most_recent_reads_are_fresh(
        blocks in prop::collection::vec(1usize..32, 1..20),
        window in 1usize..16,
    ) {
        let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(1024).split();
        let mut written: Vec<f32> = Vec::new();
        for (block_idx, len) in blocks.iter().enumerate() {
            let chunk: Vec<f32> = (0..*len)
                .map(|i| (block_idx * 100 + i) as f32)
                .collect();
            let n = tx.write(&chunk);
            written.extend_from_slice(&chunk[..n]);
        }
        let mut dest = vec![0.0f32; window];
        let frames = rx.read_frames(&mut dest, 1, TrigMode::MostRecent);
        if written.len() >= window {
            prop_assert_eq!(frames, window);
            prop_assert_eq!(&dest[..], &written[written.len() - window..]);
            prop_assert_eq!(rx.slots(), 0);
        } else {
            prop_assert_eq!(frames, 0, "short reads are denied");
            prop_assert_eq!(rx.slots(), written.len());
        }
    }

    /// Paths parse to at most PATH_MAX_SYMBOLS segments, skip empty
    /// segments, and head/tail decompose consistently.
    #[test]
    fn path_parsing_is_bounded(
        segments in prop::collection::vec("[a-z][a-z0-9_]{0,6}", 0..20),
    ) {
        let text = segments.join("/");
        let path = Path::parse(&text);
        let expected = segments.len().min(PATH_MAX_SYMBOLS);
        prop_assert_eq!(path.len(), expected);
        if !segments.is_empty() {
            prop_assert_eq!(path.head().as_str(), segments[0].as_str());
            prop_assert_eq!(path.tail().len(), expected - 1);
        }
        // A leading slash never changes the result.
        prop_assert_eq!(Path::parse(&format!("/{text}")), path);
    }
}
