use std::fs;

use shiplabel::{
    ExportFormat, FileExport, LabelEditor, LabelField, PrintTarget, RecordingPrinter, RenderConfig,
};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("shiplabel-{}-{}", std::process::id(), name))
}

#[test]
fn svg_export_writes_a_100mm_document() {
    let mut editor = LabelEditor::new();
    let label = editor.render(&RenderConfig::default());
    let path = temp_path("label.svg");
    let target = FileExport::for_path(&path).unwrap();
    assert_eq!(target.format(), ExportFormat::Svg);

    target.print(&label).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("width=\"100mm\" height=\"100mm\""));
    assert!(svg.contains("SPXID064356436531"));
    assert!(svg.contains("data:image/png;base64,"));
    assert_eq!(svg, label.to_svg().unwrap());
    fs::remove_file(&path).ok();
}

#[cfg(feature = "raster")]
#[test]
fn png_export_uses_printer_dpi() {
    let mut editor = LabelEditor::new();
    let config = RenderConfig {
        dpi: 96,
        ..Default::default()
    };
    let label = editor.render(&config);
    let path = temp_path("label.png");
    FileExport::new(&path, ExportFormat::Png).print(&label).unwrap();

    let bytes = fs::read(&path).unwrap();
    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 378);
    assert_eq!(reader.info().height, 378);
    fs::remove_file(&path).ok();
}

#[test]
fn missing_directory_is_an_export_error() {
    let mut editor = LabelEditor::new();
    let label = editor.render(&RenderConfig::default());
    let target = FileExport::new(temp_path("no-such-dir/label.svg"), ExportFormat::Svg);
    assert!(matches!(
        target.print(&label),
        Err(shiplabel::Error::ExportError(_))
    ));
}

#[test]
fn recording_printer_keeps_job_digests() {
    let printer = RecordingPrinter::new();
    let mut editor = LabelEditor::new();
    let config = RenderConfig::default();

    printer.print(&editor.render(&config)).unwrap();
    printer.print(&editor.render(&config)).unwrap();
    editor.set_field(LabelField::Weight, "1 kg").unwrap();
    printer.print(&editor.render(&config)).unwrap();

    let jobs = printer.jobs();
    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0], jobs[1]);
    assert_ne!(jobs[1].digest, jobs[2].digest);
    assert_eq!(jobs[2].title, "SPXID064356436531");
}
