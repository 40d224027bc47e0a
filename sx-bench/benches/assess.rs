use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sx_bench::student_bundle;
use sx_check::{assess_correctness, NoopObserver};
use sx_student::StudentBot;
use sx_transcript::TranscriptBundle;

fn bench_assess(c: &mut Criterion) {
    let bundle = student_bundle(20).unwrap();
    c.bench_function("sx_check_assess_correctness_20_games", |b| {
        b.iter(|| {
            let assessment =
                assess_correctness(&StudentBot, black_box(&bundle), &mut NoopObserver).unwrap();
            black_box(assessment)
        })
    });

    let bytes = bundle.to_bytes().unwrap();
    c.bench_function("sx_transcript_decode_20_games", |b| {
        b.iter(|| black_box(TranscriptBundle::from_bytes(black_box(&bytes)).unwrap()))
    });
}

criterion_group!(benches, bench_assess);
criterion_main!(benches);
