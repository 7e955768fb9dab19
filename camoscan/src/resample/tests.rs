use super::*;
use crate::test_utils::{camouflage_scene, seeded_noise, uniform};

#[test]
fn test_working_dimensions() {
    assert_eq!(working_dimensions(640, 480, 800), (640, 480));
    assert_eq!(working_dimensions(800, 800, 800), (800, 800));
    assert_eq!(working_dimensions(1600, 1200, 800), (800, 600));
    assert_eq!(working_dimensions(1200, 1600, 800), (600, 800));
    // floor(999 * 800 / 1000) = 799
    assert_eq!(working_dimensions(1000, 999, 800), (800, 799));
    assert_eq!(working_dimensions(4000, 3, 800), (800, 1));
}

#[test]
fn test_downscale_caps_long_edge() {
    let image = seeded_noise(1000, 250, 1);
    let small = downscale(&image, 800);
    assert_eq!(small.dimensions(), (800, 200));
}

#[test]
fn test_downscale_within_cap_is_identity() {
    let image = seeded_noise(120, 80, 2);
    assert_eq!(downscale(&image, 800), image);
    assert_eq!(downscale(&image, 120), image);
}

#[test]
fn test_downscale_preserves_uniform_color() {
    let image = uniform(1003, 517, [37, 201, 99]);
    let small = downscale(&image, 300);
    assert!(small.pixels().iter().all(|&p| p == [37, 201, 99, 255]));
}

#[test]
fn test_downscale_averages_instead_of_aliasing() {
    // One-pixel black/white stripes would alias to a solid color under
    // nearest-neighbour sampling; area averaging gives mid gray.
    let mut image = uniform(200, 100, [0, 0, 0]);
    for y in 0..100 {
        for x in (1..200).step_by(2) {
            image.set_pixel(x, y, [255, 255, 255, 255]);
        }
    }

    let small = downscale(&image, 100);
    assert_eq!(small.dimensions(), (100, 50));
    assert!(small.pixels().iter().all(|&p| p == [128, 128, 128, 255]));
}

#[test]
fn test_area_taps_cover_source_exactly() {
    for (src, dst) in [(10, 3), (1000, 800), (7, 7), (5, 1)] {
        let taps = area_taps(src, dst);
        assert_eq!(taps.len(), dst);

        let total: f32 = taps.iter().flatten().map(|&(_, w)| w).sum();
        assert!((total - src as f32).abs() < 1e-3, "{} -> {}: {}", src, dst, total);
        assert!(taps.iter().flatten().all(|&(s, _)| s < src));
    }
}

#[test]
fn test_upscale_to_same_size_is_identity() {
    let image = seeded_noise(64, 48, 9);
    assert_eq!(upscale(&image, 64, 48), image);
}

#[test]
fn test_upscale_hits_requested_dimensions() {
    let image = seeded_noise(13, 7, 4);
    for (w, h) in [(26, 14), (100, 3), (13, 50), (1, 1)] {
        assert_eq!(upscale(&image, w, h).dimensions(), (w, h));
    }
}

#[test]
fn test_upscale_is_smooth_between_neighbours() {
    let mut image = ImageBuffer::new(2, 1);
    image.set_pixel(0, 0, [0, 0, 0, 255]);
    image.set_pixel(1, 0, [200, 100, 40, 255]);

    let wide = upscale(&image, 8, 1);
    // Edges clamp to the source pixels.
    assert_eq!(wide.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(wide.pixel(7, 0), [200, 100, 40, 255]);
    // Interior values increase monotonically.
    for x in 1..8 {
        assert!(wide.pixel(x, 0)[0] >= wide.pixel(x - 1, 0)[0]);
    }
}

#[test]
fn test_round_trip_below_cap_is_identity() {
    let (scene, _) = camouflage_scene();
    let working = downscale(&scene, 800);
    let restored = upscale(&working, scene.width(), scene.height());
    assert_eq!(restored, scene);
}

#[test]
fn test_round_trip_above_cap_restores_dimensions_and_color() {
    let image = uniform(1000, 600, [90, 140, 60]);
    let working = downscale(&image, 400);
    assert_eq!(working.dimensions(), (400, 240));

    let restored = upscale(&working, 1000, 600);
    assert_eq!(restored.dimensions(), (1000, 600));
    assert!(restored.pixels().iter().all(|&p| p == [90, 140, 60, 255]));
}
