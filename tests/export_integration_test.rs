//! End-to-end export tests: manifest on disk, in-memory host, PSD files out

use groupsplit::adapters::host::CanvasHost;
use groupsplit::adapters::manifest::load_manifest;
use groupsplit::adapters::psd::{read_header, PsdWriter};
use groupsplit::cli::commands::export::ExportArgs;
use groupsplit::config::GroupSplitConfig;
use groupsplit::core::export::{export_groups, ExportCoordinator, ExportOptions, GroupStatus};
use groupsplit::core::verification::checksum::calculate_file_checksum;
use groupsplit::domain::{NewDocumentMode, SourceDocument};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 1000x800 RGB poster with a "Logo" and a "Background" group
fn write_poster(dir: &Path) -> std::path::PathBuf {
    RgbaImage::from_pixel(300, 100, Rgba([220, 30, 30, 255]))
        .save(dir.join("logo.png"))
        .unwrap();

    let manifest = r#"{
        "name": "poster",
        "width": 1000,
        "height": 800,
        "resolution": 300,
        "color_mode": "rgb",
        "layers": [
            {"kind": "group", "name": "Logo", "layers": [
                {"kind": "image", "name": "mark", "path": "logo.png", "left": 100, "top": 50}
            ]},
            {"kind": "group", "name": "Background", "layers": [
                {"kind": "fill", "name": "paper", "color": [240, 240, 230, 255], "width": 1000, "height": 800}
            ]}
        ]
    }"#;
    let path = dir.join("poster.json");
    fs::write(&path, manifest).unwrap();
    path
}

fn load(dir: &Path) -> SourceDocument {
    load_manifest(write_poster(dir)).unwrap()
}

fn psd_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            name.ends_with(".psd").then_some(name)
        })
        .collect();
    names.sort();
    names
}

#[test]
fn test_export_without_trim_keeps_source_canvas() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut source = load(input.path());

    let outcomes = export_groups(
        &mut source,
        false,
        output.path(),
        CanvasHost::new(),
        PsdWriter::new(),
    );

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_exported()));
    assert_eq!(psd_files(output.path()), vec!["Background.psd", "Logo.psd"]);

    for name in ["Logo", "Background"] {
        let header = read_header(&output.path().join(format!("{name}.psd"))).unwrap();
        assert_eq!((header.width, header.height), (1000, 800));
        assert_eq!(header.depth, 8);
        assert_eq!(header.mode, NewDocumentMode::Rgb.psd_mode());
        assert_eq!(header.resolution, Some(300.0));
        // folder, its pixel layer and the closing divider
        assert_eq!(header.layer_count, 3);
    }
}

#[test]
fn test_export_with_trim_crops_to_content() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut source = load(input.path());

    let outcomes = export_groups(
        &mut source,
        true,
        output.path(),
        CanvasHost::new(),
        PsdWriter::new(),
    );

    match &outcomes[0].status {
        GroupStatus::Exported { width, height, .. } => assert_eq!((*width, *height), (300, 100)),
        other => panic!("expected export, got {other:?}"),
    }
    let logo = read_header(&output.path().join("Logo.psd")).unwrap();
    assert_eq!((logo.width, logo.height), (300, 100));

    let background = read_header(&output.path().join("Background.psd")).unwrap();
    assert_eq!((background.width, background.height), (1000, 800));
}

#[test]
fn test_rerun_overwrites_with_identical_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let mut source = load(input.path());
    export_groups(&mut source, true, output.path(), CanvasHost::new(), PsdWriter::new());
    let first = calculate_file_checksum(&output.path().join("Logo.psd")).unwrap();

    export_groups(&mut source, true, output.path(), CanvasHost::new(), PsdWriter::new());
    let second = calculate_file_checksum(&output.path().join("Logo.psd")).unwrap();

    assert_eq!(first, second);
    assert_eq!(psd_files(output.path()).len(), 2);
}

#[test]
fn test_selection_ends_on_last_group() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut source = load(input.path());

    export_groups(&mut source, false, output.path(), CanvasHost::new(), PsdWriter::new());
    assert_eq!(source.active_layer_name(), Some("Background"));
}

#[test]
fn test_color_mode_and_depth_follow_source() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let manifest = r#"{
        "width": 40, "height": 30, "bits_per_channel": 16, "color_mode": "cmyk",
        "layers": [
            {"kind": "group", "name": "Print", "layers": [
                {"kind": "fill", "name": "ink", "color": [0, 0, 0, 255], "width": 10, "height": 10}
            ]}
        ]
    }"#;
    let path = input.path().join("print.json");
    fs::write(&path, manifest).unwrap();
    let mut source = load_manifest(&path).unwrap();

    export_groups(&mut source, false, output.path(), CanvasHost::new(), PsdWriter::new());

    let header = read_header(&output.path().join("Print.psd")).unwrap();
    assert_eq!(header.mode, NewDocumentMode::Cmyk.psd_mode());
    assert_eq!(header.channels, 4);
    assert_eq!(header.depth, 16);
}

#[test]
fn test_indexed_source_exports_as_rgb() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = input.path().join("gif.json");
    fs::write(
        &path,
        r#"{"width": 8, "height": 8, "color_mode": "indexed",
            "layers": [{"kind": "group", "name": "Frame"}]}"#,
    )
    .unwrap();
    let mut source = load_manifest(&path).unwrap();

    export_groups(&mut source, false, output.path(), CanvasHost::new(), PsdWriter::new());

    let header = read_header(&output.path().join("Frame.psd")).unwrap();
    assert_eq!(header.mode, NewDocumentMode::Rgb.psd_mode());
}

#[test]
fn test_unwritable_group_name_does_not_stop_the_run() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = input.path().join("doc.json");
    fs::write(
        &path,
        r#"{"width": 8, "height": 8, "layers": [
            {"kind": "group", "name": "missing/Logo"},
            {"kind": "group", "name": "Background"}
        ]}"#,
    )
    .unwrap();
    let mut source = load_manifest(&path).unwrap();
    let mut host = CanvasHost::new();

    let outcomes = export_groups(&mut source, false, output.path(), &mut host, PsdWriter::new());

    assert!(matches!(outcomes[0].status, GroupStatus::SaveFailed { .. }));
    assert!(outcomes[0].failure_message().unwrap().contains("missing/Logo"));
    assert!(outcomes[1].is_exported());
    assert_eq!(host.open_documents(), 0);
}

#[test]
fn test_bitmap_source_fails_every_group_at_creation() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = input.path().join("fax.json");
    fs::write(
        &path,
        r#"{"width": 8, "height": 8, "bits_per_channel": 1, "color_mode": "bitmap",
            "layers": [{"kind": "group", "name": "A"}, {"kind": "group", "name": "B"}]}"#,
    )
    .unwrap();
    let mut source = load_manifest(&path).unwrap();

    let outcomes = export_groups(&mut source, false, output.path(), CanvasHost::new(), PsdWriter::new());

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o.status, GroupStatus::CreateFailed { .. })));
    assert!(psd_files(output.path()).is_empty());
}

#[test]
fn test_coordinator_verifies_written_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let mut source = load(input.path());

    let mut config = GroupSplitConfig::default();
    config.verification.enable_verification = true;
    let mut coordinator = ExportCoordinator::new(config, ExportOptions::new(output.path(), true));
    let summary = coordinator.execute_export(&mut source).unwrap();

    assert!(summary.is_successful());
    assert_eq!(summary.successful_exports, 2);
    let report = summary.verification_report.unwrap();
    assert_eq!(report.passed, 2);
    assert_eq!(report.files.len(), 2);
}

#[test]
fn test_cli_export_writes_report_and_returns_exit_codes() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let manifest = write_poster(input.path());
    let config_path = input.path().join("groupsplit.toml");
    fs::write(&config_path, "").unwrap();
    let report_path = input.path().join("summary.json");

    let args = ExportArgs {
        manifest,
        output: Some(output.path().to_path_buf()),
        trim: true,
        verify: true,
        report: Some(report_path.clone()),
        ..ExportArgs::default()
    };
    let code = args.execute(config_path.to_str().unwrap()).unwrap();

    assert_eq!(code, 0);
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["total_groups"], 2);
    assert_eq!(report["verification_report"]["passed"], 2);
}

#[test]
fn test_cli_dry_run_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config_path = input.path().join("groupsplit.toml");
    fs::write(&config_path, "").unwrap();

    let args = ExportArgs {
        manifest: write_poster(input.path()),
        output: Some(output.path().to_path_buf()),
        dry_run: true,
        ..ExportArgs::default()
    };

    assert_eq!(args.execute(config_path.to_str().unwrap()).unwrap(), 0);
    assert!(psd_files(output.path()).is_empty());
}

#[test]
fn test_cli_partial_failure_exit_code() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let manifest = input.path().join("doc.json");
    fs::write(
        &manifest,
        r#"{"width": 8, "height": 8, "layers": [
            {"kind": "group", "name": "nested/Logo"},
            {"kind": "group", "name": "Background"}
        ]}"#,
    )
    .unwrap();
    let config_path = input.path().join("groupsplit.toml");
    fs::write(&config_path, "").unwrap();

    let args = ExportArgs {
        manifest,
        output: Some(output.path().to_path_buf()),
        ..ExportArgs::default()
    };

    assert_eq!(args.execute(config_path.to_str().unwrap()).unwrap(), 1);
    assert_eq!(psd_files(output.path()), vec!["Background.psd"]);
}

#[test]
fn test_same_named_groups_overwrite_without_verification_failure() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let manifest = input.path().join("twins.json");
    fs::write(
        &manifest,
        r#"{"width": 20, "height": 20, "layers": [
            {"kind": "group", "name": "Logo", "layers": [
                {"kind": "fill", "name": "small", "color": [255, 0, 0, 255], "width": 5, "height": 5}
            ]},
            {"kind": "group", "name": "Logo", "layers": [
                {"kind": "fill", "name": "large", "color": [0, 0, 255, 255], "width": 9, "height": 9}
            ]}
        ]}"#,
    )
    .unwrap();
    let config_path = input.path().join("groupsplit.toml");
    fs::write(&config_path, "").unwrap();

    let args = ExportArgs {
        manifest,
        output: Some(output.path().to_path_buf()),
        trim: true,
        verify: true,
        ..ExportArgs::default()
    };

    assert_eq!(args.execute(config_path.to_str().unwrap()).unwrap(), 0);
    assert_eq!(psd_files(output.path()), vec!["Logo.psd"]);
    let header = read_header(&output.path().join("Logo.psd")).unwrap();
    assert_eq!((header.width, header.height), (9, 9));
}

#[test]
fn test_cli_run_leaves_only_exported_files() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config_path = input.path().join("groupsplit.toml");
    fs::write(&config_path, "").unwrap();

    let args = ExportArgs {
        manifest: write_poster(input.path()),
        output: Some(output.path().to_path_buf()),
        ..ExportArgs::default()
    };

    assert_eq!(args.execute(config_path.to_str().unwrap()).unwrap(), 0);
    assert_eq!(fs::read_dir(output.path()).unwrap().count(), 2);
}
