use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use image::{GrayImage, Luma};
use orient::{GrayView, PerplexityScorer, Orientation, rotate};
use std::hint::black_box;

fn page_like(w: u32, h: u32) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let in_line = (y / 6) % 2 == 0;
        let in_glyph = (x * 7 + y * 3) % 11 < 4;
        if in_line && in_glyph { Luma([20]) } else { Luma([235]) }
    })
}

fn bench_scoring(c: &mut Criterion) {
    let tile = page_like(32, 32);
    let page = page_like(2000, 1500);
    let scorer = PerplexityScorer::default();

    c.bench_function("perplexity_tile_32", |b| {
        b.iter(|| black_box(scorer.score(&GrayView::from_image(&tile))))
    });

    c.bench_function("perplexity_grid_2000x1500", |b| {
        let view = GrayView::from_image(&page);
        b.iter(|| {
            let mut total = 0u64;
            for ty in 0..(1500 / 32) {
                for tx in 0..(2000 / 32) {
                    if let Some(crop) = view.crop(tx * 32, ty * 32, 32, 32) {
                        total += scorer.score(&crop) as u64;
                    }
                }
            }
            black_box(total)
        })
    });

    c.bench_function("rotate_90_tile", |b| {
        b.iter_batched(
            || tile.clone(),
            |img| black_box(rotate(&img, Orientation::Deg90)),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
