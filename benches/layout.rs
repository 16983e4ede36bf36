// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use iced_core::Color;
use std::hint::black_box;
use toast_overlay::headless::Headless;
use toast_overlay::Message;

fn message(i: usize) -> Message {
    Message::new(
        format!("Notification {i}"),
        "Something happened that needs a couple of lines of explanation.".repeat(i % 3 + 1),
        Color::WHITE,
        Color::BLACK,
        Color::WHITE,
    )
}

fn stack_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");

    for count in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("show_and_settle", count), &count, |b, &count| {
            b.iter(|| {
                let mut harness = Headless::new();
                for i in 0..count {
                    black_box(harness.show(message(i)));
                }
                harness.settle();
                black_box(harness.surface().map(|surface| surface.len()))
            });
        });
    }

    group.bench_function("duplicate_show", |b| {
        let mut harness = Headless::new();
        for i in 0..8 {
            harness.show(message(i));
        }
        harness.settle();
        b.iter(|| black_box(harness.show(message(3))));
    });

    group.finish();
}

criterion_group!(benches, stack_benchmark);
criterion_main!(benches);
