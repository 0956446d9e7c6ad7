//! 将 nnU-Net 预测 (像素值只有 0, 1, 2) 拉伸到完整 8-bit 范围, 便于肉眼检查.

use crate::dataset::list_png;
use crate::error::Result;
use crate::mask::{read_gray, save_gray};
use log::{debug, info};
use ndarray::{Array2, ArrayView2};
use std::fs;
use std::path::Path;

/// 线性拉伸: `(v - min) * 255 / (max - min)`, 向零取整.
///
/// 常数图像 (`max == min`) 返回全零.
pub fn stretch(gray: ArrayView2<u8>) -> Array2<u8> {
    let (min, max) = gray
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    if max <= min {
        return Array2::zeros(gray.dim());
    }
    let scale = 255.0 / f64::from(max - min);
    gray.mapv(|p| (f64::from(p - min) * scale) as u8)
}

/// 对 `input_dir` 下所有 `.png` 执行 [`stretch`], 以相同文件名写入 `output_dir`.
///
/// `output_dir` 不存在时自动创建. 返回写出的文件个数.
pub fn make_visible<P: AsRef<Path>, Q: AsRef<Path>>(input_dir: P, output_dir: Q) -> Result<usize> {
    let output_dir = output_dir.as_ref();
    let inputs = list_png(input_dir)?;
    fs::create_dir_all(output_dir)?;

    for path in inputs.iter() {
        let gray = read_gray(path)?;
        // list_png 只返回文件, 一定有文件名.
        if let Some(name) = path.file_name() {
            let out = output_dir.join(name);
            save_gray(stretch(gray.view()).view(), &out)?;
            debug!("{} -> {}", path.display(), out.display());
        }
    }
    info!("{} segmentations made visible in {}", inputs.len(), output_dir.display());
    Ok(inputs.len())
}

#[cfg(test)]
mod tests {
    use super::{make_visible, stretch};
    use crate::mask::{read_gray, save_gray};
    use crate::ErrorKind;
    use ndarray::{array, Array2};
    use std::fs;

    #[test]
    fn test_stretch_labels() {
        let g = array![[0u8, 1], [2, 2]];
        assert_eq!(stretch(g.view()), array![[0u8, 127], [255, 255]]);

        let g = array![[3u8, 5]];
        assert_eq!(stretch(g.view()), array![[0u8, 255]]);
    }

    #[test]
    fn test_stretch_constant_is_zero() {
        let g = Array2::from_elem((2, 3), 7u8);
        assert_eq!(stretch(g.view()), Array2::<u8>::zeros((2, 3)));
    }

    #[test]
    fn test_make_visible_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pred");
        let output = dir.path().join("vis").join("nested");
        fs::create_dir(&input).unwrap();
        save_gray(array![[0u8, 2]].view(), input.join("a.png")).unwrap();
        save_gray(array![[1u8, 1]].view(), input.join("b.png")).unwrap();
        fs::write(input.join("notes.txt"), b"skip").unwrap();

        assert_eq!(make_visible(&input, &output).unwrap(), 2);
        assert_eq!(read_gray(output.join("a.png")).unwrap(), array![[0u8, 255]]);
        assert_eq!(read_gray(output.join("b.png")).unwrap(), array![[0u8, 0]]);
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn test_make_visible_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = make_visible(dir.path().join("nope"), dir.path().join("out")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingFile);
    }
}
