// End-to-end batch runs driven by scripted selections
use std::fs;
use std::path::Path;

use flag_cropper::cropper::{
    BatchSummary, CanvasMode, CropConfig, CropError, CropHandler, Rect, ScriptedSelector,
};
use image::{ColorType, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

fn write_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
        .save_with_format(dir.join(name), format)
        .expect("failed to write input image");
}

fn run(
    input: &Path,
    output: &Path,
    config: CropConfig,
    rects: Vec<Rect>,
) -> (BatchSummary, ScriptedSelector, String) {
    let handler = CropHandler::new(config).expect("handler init failed");
    let mut selector = ScriptedSelector::new(rects);
    let mut log = Vec::new();
    let summary = handler
        .run_batch(input, output, &mut selector, &mut log)
        .expect("batch should run");
    (summary, selector, String::from_utf8(log).expect("utf8 output"))
}

#[test]
fn batch_processes_supported_files_in_sorted_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).expect("create input dir");

    write_image(&input, "b.png", 200, 100, ImageFormat::Png);
    write_image(&input, "a.JPG", 120, 120, ImageFormat::Jpeg);
    fs::write(input.join("readme.txt"), "not an image").expect("write txt");

    let (summary, selector, log) = run(
        &input,
        &output,
        CropConfig::default(),
        vec![Rect::new(0, 0, 60, 30), Rect::new(0, 0, 200, 100)],
    );

    assert_eq!(selector.requested(), ["a.JPG", "b.png"]);
    assert_eq!(
        summary,
        BatchSummary { processed: 2, saved: 2, skipped: 0, failed: 0 }
    );

    for stem in ["a", "b"] {
        let saved = image::open(output.join(format!("{stem}.png"))).expect("output exists");
        assert_eq!(saved.color(), ColorType::Rgba8);
        assert_eq!((saved.width(), saved.height()), (512, 512));
    }

    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Cropping: ") && lines[0].ends_with("a.JPG"));
    assert!(lines[1].starts_with("Saved: ") && lines[1].ends_with("a.png"));
}

#[test]
fn scale_and_pad_places_wide_region_at_expected_offset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).expect("create input dir");
    write_image(&input, "wide.png", 800, 400, ImageFormat::Png);

    let (summary, _, _) = run(&input, &output, CropConfig::default(), vec![Rect::new(0, 0, 800, 400)]);
    assert_eq!(summary.saved, 1);

    let saved = image::open(output.join("wide.png")).expect("output").to_rgba8();
    assert_eq!(saved.get_pixel(256, 127).0[3], 0);
    assert_eq!(saved.get_pixel(256, 128).0[3], 255);
    assert_eq!(saved.get_pixel(256, 383).0[3], 255);
    assert_eq!(saved.get_pixel(256, 384).0[3], 0);
}

#[test]
fn display_coordinates_are_mapped_back_to_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).expect("create input dir");
    // 2400 宽的源图显示比例为 0.5，显示坐标 (10, 10, 50, 25) 对应原图 (20, 20, 100, 50)
    write_image(&input, "big.png", 2400, 300, ImageFormat::Png);

    let (summary, _, _) = run(
        &input,
        &output,
        CropConfig::square(128, CanvasMode::PadOnly),
        vec![Rect::new(10, 10, 50, 25)],
    );
    assert_eq!(summary.saved, 1);

    let saved = image::open(output.join("big.png")).expect("output").to_rgba8();
    // 偏移 ((128 - 100) / 2, (128 - 50) / 2) = (14, 39)
    assert_eq!(saved.get_pixel(14, 39).0, [20, 20, 128, 255]);
    assert_eq!(saved.get_pixel(113, 88).0, [119, 69, 128, 255]);
    assert_eq!(saved.get_pixel(13, 39).0, [0, 0, 0, 0]);
}

#[test]
fn skips_and_failures_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).expect("create input dir");

    fs::write(input.join("a_broken.png"), b"definitely not a png").expect("write broken");
    write_image(&input, "b_skip.png", 100, 100, ImageFormat::Png);
    write_image(&input, "c_large.png", 700, 300, ImageFormat::Png);
    write_image(&input, "d_ok.png", 300, 300, ImageFormat::Png);

    let (summary, selector, log) = run(
        &input,
        &output,
        CropConfig::square(512, CanvasMode::PadOnly),
        vec![Rect::ZERO, Rect::new(0, 0, 600, 300), Rect::new(0, 0, 300, 300)],
    );

    // 损坏文件在框选前失败，不会消耗选区
    assert_eq!(selector.requested(), ["b_skip.png", "c_large.png", "d_ok.png"]);
    assert_eq!(
        summary,
        BatchSummary { processed: 4, saved: 1, skipped: 1, failed: 2 }
    );

    assert!(!output.join("a_broken.png").exists());
    assert!(!output.join("b_skip.png").exists());
    assert!(!output.join("c_large.png").exists());
    assert!(output.join("d_ok.png").exists());

    assert!(log.lines().any(|line| line == "Skipped"));
    assert_eq!(log.lines().filter(|line| line.starts_with("Failed: ")).count(), 2);
}

#[test]
fn high_resolution_photo_is_processed_with_default_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    fs::create_dir(&input).expect("create input dir");
    // 8000x6000 = 48 MP，常见手机原图尺寸
    GrayImage::from_pixel(8000, 6000, Luma([180]))
        .save_with_format(input.join("camera.png"), ImageFormat::Png)
        .expect("failed to write large input");

    let (summary, selector, log) = run(
        &input,
        &output,
        CropConfig::default(),
        vec![Rect::new(0, 0, 600, 400)],
    );

    assert_eq!(selector.requested(), ["camera.png"]);
    assert_eq!(
        summary,
        BatchSummary { processed: 1, saved: 1, skipped: 0, failed: 0 }
    );
    assert!(!log.contains("Failed: "));

    let saved = image::open(output.join("camera.png")).expect("output exists");
    assert_eq!((saved.width(), saved.height()), (512, 512));
}

#[test]
fn missing_input_directory_is_a_batch_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let handler = CropHandler::new(CropConfig::default()).expect("handler init failed");
    let mut selector = ScriptedSelector::default();
    let mut log = Vec::new();

    let result = handler.run_batch(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        &mut selector,
        &mut log,
    );
    assert!(matches!(result, Err(CropError::FileSystem(_))));
}
