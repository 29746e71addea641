use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qrscan::utils::binarization::{
    DEFAULT_BIAS, DEFAULT_WINDOW_DEN, adaptive_binarize, threshold_into,
};

/// Horizontal gradient with a checkerboard on top, so both labels occur
fn test_image(w: usize, h: usize) -> Vec<u8> {
    (0..w * h)
        .map(|i| {
            let (x, y) = (i % w, i / w);
            let base = (x * 200 / w) as u8 + 20;
            if (x / 8 + y / 8) % 2 == 0 { base / 3 } else { base }
        })
        .collect()
}

fn bench_adaptive_binarize(c: &mut Criterion) {
    for (w, h) in [(640, 480), (1920, 1080)] {
        let gray = test_image(w, h);
        c.bench_function(&format!("adaptive_binarize_{w}x{h}"), |b| {
            b.iter(|| adaptive_binarize(black_box(&gray), w, h))
        });
    }
}

fn bench_threshold_reused_buffers(c: &mut Criterion) {
    let (w, h) = (1920, 1080);
    let gray = test_image(w, h);
    let mut row_average = Vec::new();
    let mut labels = vec![0u32; w * h];
    c.bench_function("threshold_into_1920x1080", |b| {
        b.iter(|| {
            threshold_into(
                black_box(&gray),
                w,
                h,
                DEFAULT_WINDOW_DEN,
                DEFAULT_BIAS,
                &mut row_average,
                &mut labels,
            )
        })
    });
}

criterion_group!(benches, bench_adaptive_binarize, bench_threshold_reused_buffers);
criterion_main!(benches);
