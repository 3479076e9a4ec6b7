use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use invoice_merge::*;
use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for _ in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}

/// Renders every page as a blank sheet of the page's size; page count
/// comes from lopdf so zero-page documents can be exercised.
struct FakeRenderer;

impl PageRenderer for FakeRenderer {
    fn page_count(&self, pdf_bytes: &[u8]) -> std::result::Result<usize, RenderError> {
        let doc = Document::load_mem(pdf_bytes).map_err(|e| RenderError(e.to_string()))?;
        Ok(doc.get_pages().len())
    }

    fn render_page(
        &self,
        _pdf_bytes: &[u8],
        _page_index: usize,
        dpi: u32,
    ) -> std::result::Result<DynamicImage, RenderError> {
        let scale = dpi as f32 / 72.0;
        let width = (612.0 * scale) as u32;
        let height = (792.0 * scale) as u32;
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 0, 0, 0]),
        )))
    }
}

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(width, height, Rgb([30, 60, 90]))
        .save(&path)
        .unwrap();
    path
}

fn write_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let path = dir.join(name);
    let mut doc = create_test_pdf(num_pages);
    doc.save(&path).unwrap();
    path
}

fn test_options() -> MergeOptions {
    MergeOptions {
        dpi: 72,
        ..Default::default()
    }
}

fn xobject_counts(doc: &Document) -> Vec<usize> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            resources.get(b"XObject").unwrap().as_dict().unwrap().len()
        })
        .collect()
}

#[test]
fn test_merge_three_images() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "one.png", 100, 100),
        write_png(dir.path(), "two.png", 200, 50),
        write_png(dir.path(), "three.png", 50, 200),
    ];
    let output = dir.path().join("merged.pdf");

    let report = merge_blocking(&inputs, &output, &test_options(), None, |_| {}).unwrap();

    assert_eq!(report.output_pages, 2);
    assert_eq!(report.placed, 3);
    assert!(report.skipped.is_empty());

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
    assert_eq!(xobject_counts(&doc), vec![2, 1]);
}

#[test]
fn test_merge_pdf_and_images() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_pdf(dir.path(), "invoice.pdf", 3),
        write_png(dir.path(), "receipt.png", 40, 80),
    ];
    let output = dir.path().join("merged.pdf");

    let report =
        merge_blocking(&inputs, &output, &test_options(), Some(&FakeRenderer), |_| {}).unwrap();

    assert_eq!(report.output_pages, 1);
    assert_eq!(report.placed, 2);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_rasterized_pdf_is_opaque_white() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "invoice.pdf", 1);
    let input = InputDocument::from_path(&path).unwrap();

    let image = Rasterizer::new(Some(&FakeRenderer), 72)
        .rasterize(&input)
        .unwrap();

    assert_eq!(image.dimensions(), (612, 792));
    assert_eq!(image.label(), "invoice.pdf");
    assert!(image.pixels().pixels().all(|p| p.0 == [255, 255, 255]));
}

#[test]
fn test_rasterize_dpi_scales_pdf() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "invoice.pdf", 1);
    let input = InputDocument::from_path(&path).unwrap();

    let image = Rasterizer::new(Some(&FakeRenderer), 144)
        .rasterize(&input)
        .unwrap();

    assert_eq!(image.dimensions(), (1224, 1584));
}

#[test]
fn test_transparent_png_flattened_onto_white() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stamp.png");
    let mut rgba = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
    rgba.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
    rgba.save(&path).unwrap();

    let input = InputDocument::from_path(&path).unwrap();
    let image = Rasterizer::new(None, 72).rasterize(&input).unwrap();

    assert_eq!(image.pixels().get_pixel(0, 0).0, [255, 0, 0]);
    assert_eq!(image.pixels().get_pixel(3, 3).0, [255, 255, 255]);
}

/// Encode a JPEG and insert an EXIF APP1 segment carrying `orientation`
/// right after the SOI marker.
fn write_jpeg_with_orientation(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    orientation: u16,
) -> PathBuf {
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 30, 30])))
        .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    // Big-endian TIFF header, one IFD with a single SHORT Orientation tag
    let mut exif = b"Exif\0\0MM\0\x2a\0\0\0\x08\0\x01\x01\x12\0\x03\0\0\0\x01".to_vec();
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((exif.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&exif);

    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&segment);
    bytes.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_exif_rotated_jpeg_is_made_upright() {
    let dir = TempDir::new().unwrap();
    let path = write_jpeg_with_orientation(dir.path(), "scan.jpg", 40, 20, 6);
    let input = InputDocument::from_path(&path).unwrap();

    let image = Rasterizer::new(None, 72).rasterize(&input).unwrap();

    // Orientation 6 means "rotate 90 degrees clockwise to display"
    assert_eq!(image.dimensions(), (20, 40));
}

#[test]
fn test_exif_upright_jpeg_keeps_dimensions() {
    let dir = TempDir::new().unwrap();
    let path = write_jpeg_with_orientation(dir.path(), "scan.jpg", 40, 20, 1);
    let input = InputDocument::from_path(&path).unwrap();

    let image = Rasterizer::new(None, 72).rasterize(&input).unwrap();

    assert_eq!(image.dimensions(), (40, 20));
}

#[test]
fn test_corrupt_image_is_skipped() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"definitely not a png").unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 10, 10),
        bad.clone(),
        write_png(dir.path(), "b.png", 10, 10),
    ];
    let output = dir.path().join("merged.pdf");

    let report = merge_blocking(&inputs, &output, &test_options(), None, |_| {}).unwrap();

    assert_eq!(report.placed, 2);
    assert_eq!(report.output_pages, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, bad);
    assert!(output.exists());
}

#[test]
fn test_zero_page_pdf_is_skipped() {
    let dir = TempDir::new().unwrap();
    let empty = write_pdf(dir.path(), "empty.pdf", 0);
    let inputs = vec![empty.clone(), write_png(dir.path(), "a.png", 10, 10)];
    let output = dir.path().join("merged.pdf");

    let report =
        merge_blocking(&inputs, &output, &test_options(), Some(&FakeRenderer), |_| {}).unwrap();

    assert_eq!(report.placed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, empty);
    assert!(report.skipped[0].reason.contains("no pages"));
}

#[test]
fn test_zero_page_pdf_error_kind() {
    let dir = TempDir::new().unwrap();
    let empty = write_pdf(dir.path(), "empty.pdf", 0);
    let input = InputDocument::from_path(&empty).unwrap();

    let err = Rasterizer::new(Some(&FakeRenderer), 72)
        .rasterize(&input)
        .unwrap_err();

    assert_eq!(err, RasterizeError::EmptyDocument(empty));
}

#[test]
fn test_pdf_without_renderer_is_skipped() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_pdf(dir.path(), "invoice.pdf", 1),
        write_png(dir.path(), "a.png", 10, 10),
    ];
    let output = dir.path().join("merged.pdf");

    let report = merge_blocking(&inputs, &output, &test_options(), None, |_| {}).unwrap();

    assert_eq!(report.placed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        report.skipped[0].path.file_name().and_then(|n| n.to_str()),
        Some("invoice.pdf")
    ));
}

#[test]
fn test_all_inputs_skipped_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.jpg");
    std::fs::write(&bad, b"garbage").unwrap();
    let output = dir.path().join("merged.pdf");

    let result = merge_blocking(&[bad], &output, &test_options(), None, |_| {});

    assert!(matches!(result, Err(MergeError::EmptyInputSet)));
    assert!(!output.exists());
}

#[test]
fn test_unsupported_extension_rejects_batch() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, b"hello").unwrap();
    let inputs = vec![write_png(dir.path(), "a.png", 10, 10), notes.clone()];
    let output = dir.path().join("merged.pdf");
    let mut calls = 0;

    let result = merge_blocking(&inputs, &output, &test_options(), None, |_| calls += 1);

    match result {
        Err(MergeError::InvalidInputFormat(path)) => assert_eq!(path, notes),
        other => panic!("expected InvalidInputFormat, got {:?}", other),
    }
    assert_eq!(calls, 0);
    assert!(!output.exists());
}

#[test]
fn test_empty_input_list() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = Vec::new();
    let output = dir.path().join("merged.pdf");

    let result = merge_blocking(&inputs, &output, &test_options(), None, |_| {});
    assert!(matches!(result, Err(MergeError::EmptyInputSet)));
}

#[test]
fn test_invalid_options_rejected_before_work() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_png(dir.path(), "a.png", 10, 10)];
    let output = dir.path().join("merged.pdf");
    let options = MergeOptions {
        margin_pt: -1.0,
        ..test_options()
    };

    let result = merge_blocking(&inputs, &output, &options, None, |_| {});
    assert!(matches!(result, Err(MergeError::Config(_))));
}

#[test]
fn test_unwritable_output_reports_output_write() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_png(dir.path(), "a.png", 10, 10)];
    let output = dir.path().join("missing").join("merged.pdf");

    let result = merge_blocking(&inputs, &output, &test_options(), None, |_| {});

    match result {
        Err(MergeError::OutputWrite { path, .. }) => assert_eq!(path, output),
        other => panic!("expected OutputWrite, got {:?}", other),
    }
}

#[test]
fn test_no_staging_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 10, 10),
        write_png(dir.path(), "b.png", 10, 10),
    ];
    let output = dir.path().join("merged.pdf");

    merge_blocking(&inputs, &output, &test_options(), None, |_| {}).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.png", "b.png", "merged.pdf"]);
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_png(dir.path(), "a.png", 10, 10)];
    let output = dir.path().join("merged.pdf");
    std::fs::write(&output, b"stale").unwrap();

    merge_blocking(&inputs, &output, &test_options(), None, |_| {}).unwrap();

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_progress_reports_both_phases() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.png");
    std::fs::write(&bad, b"nope").unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 10, 10),
        bad,
        write_png(dir.path(), "c.png", 10, 10),
    ];
    let output = dir.path().join("merged.pdf");
    let mut reports = Vec::new();

    merge_blocking(&inputs, &output, &test_options(), None, |r| {
        reports.push(r.clone())
    })
    .unwrap();

    let rasterizing: Vec<_> = reports
        .iter()
        .filter(|r| r.phase == MergePhase::Rasterizing)
        .map(|r| (r.processed, r.total, r.label.as_str()))
        .collect();
    assert_eq!(
        rasterizing,
        vec![(1, 3, "a.png"), (2, 3, "bad.png"), (3, 3, "c.png")]
    );

    let composing: Vec<_> = reports
        .iter()
        .filter(|r| r.phase == MergePhase::Composing)
        .map(|r| (r.processed, r.total))
        .collect();
    assert_eq!(composing, vec![(1, 2), (2, 2)]);

    // Rasterizing finishes before composing starts
    let first_compose = reports
        .iter()
        .position(|r| r.phase == MergePhase::Composing)
        .unwrap();
    assert!(reports[..first_compose]
        .iter()
        .all(|r| r.phase == MergePhase::Rasterizing));
}

#[test]
fn test_repeated_runs_give_same_structure() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 30, 10),
        write_png(dir.path(), "b.png", 10, 30),
        write_png(dir.path(), "c.png", 20, 20),
    ];
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");

    let report1 = merge_blocking(&inputs, &first, &test_options(), None, |_| {}).unwrap();
    let report2 = merge_blocking(&inputs, &second, &test_options(), None, |_| {}).unwrap();
    assert_eq!(report1, report2);

    let doc1 = Document::load(&first).unwrap();
    let doc2 = Document::load(&second).unwrap();
    assert_eq!(xobject_counts(&doc1), xobject_counts(&doc2));

    for (page1, page2) in doc1.get_pages().values().zip(doc2.get_pages().values()) {
        assert_eq!(
            doc1.get_page_content(*page1).unwrap(),
            doc2.get_page_content(*page2).unwrap()
        );
    }
}

#[test]
fn test_content_stream_places_images_in_slots() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "wide.png", 111, 50),
        write_png(dir.path(), "square.png", 391, 391),
    ];
    let output = dir.path().join("merged.pdf");
    let options = MergeOptions {
        paper_size: PaperSize::Custom {
            width_pt: 595.0,
            height_pt: 842.0,
        },
        ..test_options()
    };

    merge_blocking(&inputs, &output, &options, None, |_| {}).unwrap();

    let doc = Document::load(&output).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap();

    // Wide image: full slot width, top edge on the top margin
    assert!(content.contains("q 555 0 0 250 20 572 cm /Im0 Do Q"));
    // Square image: full slot height, centered, bottom edge on the bottom margin
    assert!(content.contains("q 391 0 0 391 102 20 cm /Im1 Do Q"));
}

#[tokio::test]
async fn test_async_merge() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_png(dir.path(), "a.png", 10, 10),
        write_png(dir.path(), "b.png", 10, 10),
        write_png(dir.path(), "c.png", 10, 10),
    ];
    let output = dir.path().join("merged.pdf");

    let (tx, rx) = std::sync::mpsc::channel();
    let report = merge(inputs, output.clone(), test_options(), move |r| {
        let _ = tx.send(r.clone());
    })
    .await
    .unwrap();

    assert_eq!(report.output_pages, 2);
    assert_eq!(rx.try_iter().count(), 6);
    assert!(output.exists());
}

#[tokio::test]
async fn test_async_merge_rejects_unsupported() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("merged.pdf");

    let result = merge(
        vec![dir.path().join("notes.docx")],
        output.clone(),
        test_options(),
        |_| {},
    )
    .await;

    assert!(matches!(result, Err(MergeError::InvalidInputFormat(_))));
}

#[tokio::test]
async fn test_save_pdf_writes_composed_document() {
    let dir = TempDir::new().unwrap();
    let images = vec![
        RasterImage::new("a.png", RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]))),
        RasterImage::new("b.png", RgbImage::from_pixel(10, 10, Rgb([4, 5, 6]))),
        RasterImage::new("c.png", RgbImage::from_pixel(10, 10, Rgb([7, 8, 9]))),
    ];
    let document = compose(images, &test_options(), |_| {}).unwrap();
    let output = dir.path().join("saved.pdf");

    save_pdf(document, &output).await.unwrap();

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}
