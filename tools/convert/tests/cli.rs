use assert_cmd::cargo::cargo_bin_cmd;
use image::{GrayImage, Luma};
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// 写一张 (高, 宽) 排布的灰度 PNG.
fn write_png(path: &Path, rows: &[&[u8]]) {
    let (h, w) = (rows.len() as u32, rows[0].len() as u32);
    let img = GrayImage::from_fn(w, h, |x, y| Luma([rows[y as usize][x as usize]]));
    img.save(path).expect("write png");
}

fn read_png(path: &Path) -> Vec<u8> {
    image::open(path).expect("read png").into_luma8().into_raw()
}

#[test]
fn rejects_single_and_batch_together() {
    let tmp = TempDir::new().unwrap();
    let d = tmp.path();
    cargo_bin_cmd!("convert-raw-masks")
        .arg("--axon")
        .arg(d.join("a.png"))
        .arg("--myelin")
        .arg(d.join("m.png"))
        .arg("--output")
        .arg(d.join("o.png"))
        .arg("--dir")
        .arg(d)
        .assert()
        .failure()
        .stderr(contains("cannot be used with"));
}

#[test]
fn rejects_missing_mode() {
    cargo_bin_cmd!("convert-raw-masks").assert().failure();
}

#[test]
fn rejects_incomplete_triple() {
    let tmp = TempDir::new().unwrap();
    cargo_bin_cmd!("convert-raw-masks")
        .arg("--axon")
        .arg(tmp.path().join("a.png"))
        .assert()
        .failure();
}

#[test]
fn single_pair_writes_label() {
    let tmp = TempDir::new().unwrap();
    let d = tmp.path();
    write_png(&d.join("a.png"), &[&[0, 255], &[0, 0]]);
    write_png(&d.join("m.png"), &[&[255, 255], &[255, 0]]);

    cargo_bin_cmd!("convert-raw-masks")
        .arg("--axon")
        .arg(d.join("a.png"))
        .arg("--myelin")
        .arg(d.join("m.png"))
        .arg("--output")
        .arg(d.join("o.png"))
        .assert()
        .success();

    assert_eq!(read_png(&d.join("o.png")), [1, 2, 1, 0]);
}

#[test]
fn single_pair_failure_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let d = tmp.path();
    write_png(&d.join("a.png"), &[&[0, 255, 0, 0]]);
    write_png(&d.join("m.png"), &[&[0, 255, 0, 0, 0]]);

    cargo_bin_cmd!("convert-raw-masks")
        .arg("--axon")
        .arg(d.join("a.png"))
        .arg("--myelin")
        .arg(d.join("m.png"))
        .arg("--output")
        .arg(d.join("o.png"))
        .assert()
        .failure()
        .stderr(contains("differs from myelin mask shape"));

    assert!(!d.join("o.png").exists());
}

#[test]
fn batch_reports_isolated_failure() {
    let tmp = TempDir::new().unwrap();
    let d = tmp.path();
    write_png(&d.join("A_seg-axon.png"), &[&[0, 255]]);
    write_png(&d.join("A_seg-myelin.png"), &[&[255, 0]]);
    write_png(&d.join("B_seg-axon.png"), &[&[0, 255]]);

    cargo_bin_cmd!("convert-raw-masks")
        .arg("--dir")
        .arg(d)
        .arg("--jobs")
        .arg("2")
        .assert()
        .success()
        .stdout(contains("Fused 1 of 2 pairs."))
        .stdout(contains("B: [missing file]"));

    assert_eq!(read_png(&d.join("A_nnunet-label.png")), [1, 2]);
    assert!(!d.join("B_nnunet-label.png").exists());
}

#[test]
fn nnunet_dataset_is_reconstructed() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("data");
    let ds = root.join("nnUNet_raw").join("Dataset011_CARS_BRAIN");
    fs::create_dir_all(ds.join("imagesTr")).unwrap();
    fs::create_dir_all(ds.join("labelsTr")).unwrap();
    write_png(&ds.join("imagesTr").join("CARS_BRAIN_007_0000.png"), &[&[9, 8]]);
    write_png(&ds.join("labelsTr").join("CARS_BRAIN_007.png"), &[&[0, 1]]);

    let json = tmp.path().join("case_ids.json");
    fs::write(&json, r#"{"007": "2023-01-09-S09-trialA"}"#).unwrap();
    let out = tmp.path().join("converted_data");

    cargo_bin_cmd!("convert-nnunet-dataset")
        .arg(&json)
        .arg("--datapath")
        .arg(&root)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Conversion done for subjects [S09]"));

    let sub = out.join("S09");
    assert_eq!(read_png(&sub.join("2023-01-09-S09-trialA.png")), [9, 8]);
    assert_eq!(
        read_png(&sub.join("2023-01-09-S09-trialA_seg-axonmyelin.png")),
        [0, 127]
    );
}

#[test]
fn seg_visible_and_suffix_tools() {
    let tmp = TempDir::new().unwrap();
    let pred = tmp.path().join("pred");
    fs::create_dir(&pred).unwrap();
    write_png(&pred.join("x.png"), &[&[0, 1, 2]]);
    let vis = tmp.path().join("vis");

    cargo_bin_cmd!("make-seg-visible")
        .arg(&pred)
        .arg(&vis)
        .assert()
        .success();
    assert_eq!(read_png(&vis.join("x.png")), [0, 127, 255]);

    let subject = tmp.path().join("tree").join("S1");
    fs::create_dir_all(&subject).unwrap();
    fs::write(subject.join("x_seg-axon.png"), b"").unwrap();

    cargo_bin_cmd!("add-slice-suffix")
        .arg(tmp.path().join("tree"))
        .assert()
        .success()
        .stdout(contains("sub-S1 -> 1 files renamed"));
    assert!(subject.join("x_slice2_seg-axon.png").is_file());
}

#[test]
fn aggregate_morphometrics_tool() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("S1")).unwrap();

    cargo_bin_cmd!("aggregate-morphometrics")
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(contains("0 rows written"));
    assert!(tmp.path().join("aggregated_morphometrics.csv").is_file());

    cargo_bin_cmd!("aggregate-morphometrics")
        .arg(tmp.path().join("missing"))
        .assert()
        .failure();
}
