use auditory_spectrogram::{wav2aud, AuditoryModel, Filterbank};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::f64::consts::PI;
use std::sync::Arc;

fn chirp(len: usize, sample_rate: f64) -> Vec<f64> {
    (0..len)
        .map(|n| {
            let t = n as f64 / sample_rate;
            (2.0 * PI * (200.0 + 1500.0 * t) * t).sin()
        })
        .collect()
}

fn bench_pipeline(c: &mut Criterion) {
    let filterbank = Arc::new(Filterbank::cochlear().expect("filterbank design"));
    let signal = chirp(16000, 16000.0);

    c.bench_function("wav2aud_1s_default", |b| {
        b.iter(|| {
            wav2aud(
                black_box(&signal),
                16000,
                &[8.0, 8.0, -2.0, -1.0],
                None,
                Some(filterbank.clone()),
            )
        })
    });

    let parallel = AuditoryModel::new(filterbank.clone()).with_parallel(true);
    c.bench_function("wav2aud_1s_parallel", |b| {
        b.iter(|| parallel.compute(black_box(&signal), 16000))
    });

    let resampled = chirp(44100, 44100.0);
    c.bench_function("wav2aud_1s_44k1", |b| {
        b.iter(|| {
            wav2aud(
                black_box(&resampled),
                44100,
                &[8.0, 8.0, -2.0, -1.0],
                None,
                Some(filterbank.clone()),
            )
        })
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
