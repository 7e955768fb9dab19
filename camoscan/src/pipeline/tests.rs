use super::*;
use crate::codec::decode;
use crate::error::Error;
use crate::test_utils::{camouflage_scene, png_bytes, seeded_noise, uniform};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

fn default_pipeline() -> VisualizationPipeline {
    VisualizationPipeline::new(Config::default()).unwrap()
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = Config {
        inner_radius: 12,
        ..Config::default()
    };
    let err = VisualizationPipeline::new(config).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_uniform_image_gives_black_mask() {
    let image = uniform(64, 64, [128, 128, 128]);
    let rendered = default_pipeline().render(&image);

    assert!(rendered.mask.pixels().iter().all(|&p| p == BLACK));
    assert_eq!(rendered.overlay, image);
    assert_eq!(rendered.stats.anomalous_pixels, 0);
    assert_eq!(rendered.stats.coverage_percent, 0.0);
}

#[test]
fn test_outputs_match_source_dimensions_above_cap() {
    let config = Config {
        max_dimension: 40,
        ..Config::default()
    };
    let pipeline = VisualizationPipeline::new(config).unwrap();
    let image = seeded_noise(123, 57, 3);
    let rendered = pipeline.render(&image);

    assert_eq!(rendered.overlay.dimensions(), (123, 57));
    assert_eq!(rendered.spectral.dimensions(), (123, 57));
    assert_eq!(rendered.mask.dimensions(), (123, 57));
    assert_eq!(
        (rendered.stats.working_width, rendered.stats.working_height),
        (40, 18)
    );
}

#[test]
fn test_mask_stays_binary_after_upscale() {
    let config = Config {
        max_dimension: 60,
        ..Config::default()
    };
    let pipeline = VisualizationPipeline::new(config).unwrap();
    let (scene, _) = camouflage_scene();
    // 96 -> 60 on the way down, 60 -> 96 on the way up
    let rendered = pipeline.render(&scene);
    assert!(rendered
        .mask
        .pixels()
        .iter()
        .all(|&p| p == BLACK || p == WHITE));
}

#[test]
fn test_checkerboard_outputs_agree() {
    let (scene, rect) = camouflage_scene();
    let rendered = default_pipeline().render(&scene);
    let centre = ((rect.x0 + rect.x1) / 2, (rect.y0 + rect.y1) / 2);

    assert!(rendered.stats.anomalous_pixels >= 100);
    assert!(rendered.stats.mask_pixels >= rendered.stats.anomalous_pixels);

    let mut white = 0;
    for y in 0..scene.height() {
        for x in 0..scene.width() {
            let mask = rendered.mask.pixel(x, y);
            let overlay = rendered.overlay.pixel(x, y);
            if overlay != scene.pixel(x, y) {
                // every highlighted pixel is inside the mask
                assert_eq!(mask, WHITE, "({}, {})", x, y);
            }
            if mask == WHITE {
                white += 1;
            }
        }
    }
    assert_eq!(white, rendered.stats.mask_pixels);
    assert_eq!(rendered.mask.pixel(0, 0), BLACK);
    assert_eq!(rendered.mask.pixel(95, 95), BLACK);
    assert!(rendered.stats.coverage_percent > 0.0);
    assert_ne!(rendered.spectral.pixel(centre.0, centre.1), scene.pixel(centre.0, centre.1));
}

#[test]
fn test_run_is_deterministic() {
    let (scene, _) = camouflage_scene();
    let bytes = png_bytes(&scene);
    let pipeline = default_pipeline();

    let first = pipeline.run(&bytes).unwrap();
    let second = pipeline.run(&bytes).unwrap();

    assert_eq!(first.overlay, second.overlay);
    assert_eq!(first.spectral, second.spectral);
    assert_eq!(first.mask, second.mask);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_run_encodes_three_images_at_source_size() {
    let bytes = png_bytes(&seeded_noise(50, 30, 9));
    let out = default_pipeline().run(&bytes).unwrap();

    assert_eq!((out.width, out.height), (50, 30));
    for encoded in [&out.overlay, &out.spectral, &out.mask] {
        assert_eq!(decode(encoded).unwrap().dimensions(), (50, 30));
    }
}

#[test]
fn test_run_rejects_garbage() {
    let err = default_pipeline().run(b"definitely not an image").unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_tiny_image_renders_background() {
    let image = uniform(5, 3, [10, 200, 30]);
    let rendered = default_pipeline().render(&image);

    assert_eq!(rendered.mask.dimensions(), (5, 3));
    assert!(rendered.mask.pixels().iter().all(|&p| p == BLACK));
    assert_eq!(rendered.stats.peak_score, 0);
}
