use grid_cutter::{TileError, TileRect, TileSampler};
use image::{DynamicImage, GrayImage, Luma};

/// 4000x3000 page, blank except for a block of text-like strokes in its center third.
fn center_text_page() -> DynamicImage {
    let (w, h) = (4000, 3000);
    let (x0, x1) = (w / 3, 2 * w / 3);
    let (y0, y1) = (h / 3, 2 * h / 3);
    DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
        let in_block = x >= x0 && x < x1 && y >= y0 && y < y1;
        let ink = (y / 8) % 3 != 2 && (x / 6) % 2 == 0;
        if in_block && ink { Luma([10]) } else { Luma([245]) }
    }))
}

#[test]
fn tiles_come_only_from_the_text_block() {
    let page = center_text_page();
    let set = TileSampler::default().sample_tiles(&page, 20, 32).unwrap();

    assert_eq!((set.working_width, set.working_height), (2000, 1500));
    assert_eq!(set.tiles.len(), 20);

    // center third of the downscaled page
    let block = TileRect::new(666, 500, 668, 500);
    for tile in &set.tiles {
        assert!(
            block.contains(&tile.rect),
            "tile at {:?} is not fully inside the text block",
            tile.rect
        );
        assert!(tile.perplexity > 0);
    }
}

#[test]
fn tiles_never_touch_the_trimmed_margin() {
    let page = center_text_page();
    let set = TileSampler::default().sample_tiles(&page, 20, 32).unwrap();

    assert_eq!(set.inner, TileRect::new(200, 150, 1600, 1200));
    for tile in &set.tiles {
        assert!(set.inner.contains(&tile.rect));
        assert_eq!((tile.rect.w, tile.rect.h), (32, 32));
    }
}

#[test]
fn sampling_is_reproducible() {
    let page = center_text_page();
    let sampler = TileSampler::default();
    let a = sampler.sample_tiles(&page, 20, 32).unwrap();
    let b = sampler.sample_tiles(&page, 20, 32).unwrap();

    let rects_a: Vec<_> = a.tiles.iter().map(|t| t.rect).collect();
    let rects_b: Vec<_> = b.tiles.iter().map(|t| t.rect).collect();
    assert_eq!(rects_a, rects_b);
    for (ta, tb) in a.tiles.iter().zip(&b.tiles) {
        assert_eq!(ta.image.as_raw(), tb.image.as_raw());
    }
}

#[test]
fn tile_pixels_match_the_working_image() {
    let page = center_text_page();
    let set = TileSampler::default().sample_tiles(&page, 5, 32).unwrap();
    let working = image::imageops::resize(
        &page.to_luma8(),
        set.working_width,
        set.working_height,
        image::imageops::FilterType::Triangle,
    );
    for tile in &set.tiles {
        let r = tile.rect;
        let expected = image::imageops::crop_imm(&working, r.x, r.y, r.w, r.h).to_image();
        assert_eq!(tile.image, expected);
    }
}

#[test]
fn over_asking_reports_insufficient_tiles() {
    let page = center_text_page();
    // 49 x 36 grid
    let err = TileSampler::default().sample(&page, 2000, 32).unwrap_err();
    assert!(matches!(
        err,
        TileError::InsufficientTiles {
            requested: 2000,
            available: 1764
        }
    ));
}
