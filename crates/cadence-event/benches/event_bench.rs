//! Benchmarks for the precision event.

use cadence_event::PrecisionEvent;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

fn bench_set_clear(c: &mut Criterion) {
    let event = PrecisionEvent::new();

    c.bench_function("event_set_clear", |b| {
        b.iter(|| {
            event.set();
            event.clear();
        });
    });
}

fn bench_wait_raised(c: &mut Criterion) {
    let event = PrecisionEvent::new();
    event.set();

    c.bench_function("event_wait_raised", |b| {
        b.iter(|| black_box(event.wait(black_box(Some(Duration::from_secs(1))))));
    });
}

fn bench_wait_spin_tail(c: &mut Criterion) {
    let event = PrecisionEvent::new();

    c.bench_function("event_wait_100us", |b| {
        b.iter(|| black_box(event.wait_timeout(black_box(Duration::from_micros(100)))));
    });
}

criterion_group!(benches, bench_set_clear, bench_wait_raised, bench_wait_spin_tail);

criterion_main!(benches);
