use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sms_segments::{compute_segments, encode, gsm_length};

fn bench_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("segments");

    let gsm = "Your appointment is confirmed for 10:30 {Room 2}. Reply STOP to opt out. ".repeat(6);
    let mut ucs2 = gsm.clone();
    ucs2.push('\u{4E2D}');

    for (name, text) in [("gsm7", &gsm), ("ucs2", &ucs2)] {
        group.bench_function(BenchmarkId::new("compute", name), |b| {
            b.iter(|| compute_segments(black_box(text)))
        });
    }

    group.bench_function("gsm_length", |b| b.iter(|| gsm_length(black_box(&gsm))));
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&gsm))));
    group.finish();
}

criterion_group!(benches, bench_segments);
criterion_main!(benches);
