//! Criterion benchmarks for the graph engine.
//!
//! Measures scheduling overhead independently of DSP cost using trivial
//! `Gain` nodes. Three axes:
//!
//! - **Compile** — lifetime analysis + buffer packing at varying chain depth
//! - **Execute** — per-block `process()` throughput
//! - **Ring** — SPSC transport write/read throughput
//!
//! Run with: `cargo bench -p tejido-core`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tejido_core::procs::Gain;
use tejido_core::ring::RingBuffer;
use tejido_core::{Container, Packing, Signal};

const CHAIN_LENGTHS: &[usize] = &[4, 16, 64];

fn gain_chain(n: usize) -> Container {
    let mut c = Container::new("bench");
    for i in 0..n {
        c.add_proc(format!("g{i}").as_str(), Box::new(Gain::new()))
            .unwrap();
    }
    for i in 1..n {
        c.add_pipe(
            format!("g{}", i - 1).as_str(),
            "out",
            format!("g{i}").as_str(),
            "in",
        )
        .unwrap();
    }
    c.publish_input("g0", "in", "in").unwrap();
    c.publish_output(format!("g{}", n - 1).as_str(), "out", "out")
        .unwrap();
    c
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/compile");
    for &n in CHAIN_LENGTHS {
        for packing in [Packing::Wasteful, Packing::FirstFit] {
            let mut graph = gain_chain(n);
            graph.set_packing(packing);
            group.bench_with_input(
                BenchmarkId::new(format!("{packing:?}"), n),
                &n,
                |b, _| {
                    b.iter(|| {
                        graph.prepare().unwrap();
                        black_box(graph.plan().unwrap().buffer_count())
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/process");
    for &n in CHAIN_LENGTHS {
        let mut graph = gain_chain(n);
        graph.prepare().unwrap();
        let mut input = Signal::new(graph.context().vector_size());
        input.set_to_constant(0.5);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                graph.set_input(0, &input);
                graph.process();
                black_box(graph.output(0).unwrap().row(0)[0])
            });
        });
    }
    group.finish();
}

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    let (mut tx, mut rx) = RingBuffer::<f32>::with_capacity(4096).split();
    let block = [0.25f32; 256];
    let mut dest = [0.0f32; 256];
    group.bench_function("write_read_256", |b| {
        b.iter(|| {
            tx.write(black_box(&block));
            black_box(rx.read(&mut dest))
        });
    });
    group.finish();
}

criterion_group!(benches, bench_compile, bench_process, bench_ring);
criterion_main!(benches);
