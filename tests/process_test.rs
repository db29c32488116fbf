use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use rgb_cube_remap::image_io::{decode, encode, to_rgba};
use rgb_cube_remap::{
    all_colors, default_config, extract_rgb_image, extract_rgba, process, process_dynamic, Params, PixelRecord,
    RemapError, RgbColor, CUBE_SIZE,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("rgb_cube_remap_{}_{}", std::process::id(), name))
}

#[test]
fn cube_enumerates_every_color_once_in_order() {
    let colors = all_colors();
    assert_eq!(colors.len(), CUBE_SIZE);
    assert_eq!(colors[0], RgbColor::new(0, 0, 0));
    assert_eq!(colors[1], RgbColor::new(0, 0, 1));
    assert_eq!(colors[256], RgbColor::new(0, 1, 0));
    assert_eq!(colors[CUBE_SIZE - 1], RgbColor::new(255, 255, 255));
    assert!(colors.iter().enumerate().all(|(i, c)| c.to_index() == i));
}

#[test]
fn rgba_extraction_is_row_major_and_ignores_alpha() {
    let rgba = [1, 2, 3, 0, 4, 5, 6, 128, 7, 8, 9, 255, 10, 11, 12, 7];
    let pixels = extract_rgba(2, 2, &rgba).expect("buffer fits");
    assert_eq!(
        pixels,
        vec![
            PixelRecord::new(0, 0, RgbColor::new(1, 2, 3)),
            PixelRecord::new(1, 0, RgbColor::new(4, 5, 6)),
            PixelRecord::new(0, 1, RgbColor::new(7, 8, 9)),
            PixelRecord::new(1, 1, RgbColor::new(10, 11, 12)),
        ]
    );
    assert_eq!(pixels[2].index(2), 2);

    let err = extract_rgba(3, 2, &rgba).expect_err("too short");
    assert!(matches!(err, RemapError::BufferLength { expected: 24, actual: 16 }));
}

#[test]
fn rgb_image_extraction_matches_coordinates() {
    let img: RgbImage = ImageBuffer::from_fn(3, 2, |x, y| Rgb([x as u8, y as u8, 9]));
    let pixels = extract_rgb_image(&img);
    assert_eq!(pixels.len(), 6);
    for p in &pixels {
        assert_eq!(p.color, RgbColor::new(p.x as u8, p.y as u8, 9));
    }
}

#[test]
fn output_serializes_fully_opaque() {
    let bytes = to_rgba(&[RgbColor::new(1, 2, 3), RgbColor::new(250, 251, 252)]);
    assert_eq!(bytes, vec![1, 2, 3, 255, 250, 251, 252, 255]);
}

#[test]
fn encode_then_decode_keeps_colors() {
    let path = temp_path("roundtrip.png");
    let colors = vec![RgbColor::new(255, 0, 0), RgbColor::new(0, 255, 0), RgbColor::new(0, 0, 255), RgbColor::new(7, 7, 7)];
    encode(&path, 2, 2, &colors).expect("png written");
    let src = decode(&path).expect("png read back");
    let _ = std::fs::remove_file(&path);

    assert_eq!((src.width, src.height), (2, 2));
    let pixels = extract_rgba(src.width, src.height, &src.rgba).expect("sizes agree");
    let back: Vec<RgbColor> = pixels.iter().map(|p| p.color).collect();
    assert_eq!(back, colors);
    assert!(src.rgba.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn process_dynamic_rejects_images_that_are_not_cube_sized() {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_fn(8, 6, |_x, _y| Rgb([200, 120, 80])));
    let err = process_dynamic(&img, default_config(true)).expect_err("48 pixels cannot hold 16M colors");
    let err = err.downcast::<RemapError>().expect("typed error");
    assert!(matches!(err, RemapError::NotFullCube { pixels: 48 }));
}

#[test]
fn process_points_at_resize_for_small_inputs() {
    let input = temp_path("small_in.png");
    let output = temp_path("small_out.png");
    let img: RgbImage = ImageBuffer::from_fn(4, 4, |x, y| Rgb([x as u8 * 60, y as u8 * 60, 0]));
    img.save(&input).expect("fixture written");

    let params = Params {
        in_image_name: input.to_string_lossy().into_owned(),
        out_image_name: output.to_string_lossy().into_owned(),
        resize: false,
        config: default_config(true),
    };
    let err = process(params).expect_err("not cube sized");
    let _ = std::fs::remove_file(&input);

    assert!(format!("{:#}", err).contains("--resize"), "{:#}", err);
    assert!(!output.exists());
}

#[test]
fn missing_input_is_reported() {
    let params = Params {
        in_image_name: temp_path("does_not_exist.png").to_string_lossy().into_owned(),
        out_image_name: temp_path("never.png").to_string_lossy().into_owned(),
        resize: true,
        config: default_config(false),
    };
    assert!(process(params).is_err());
}
