//! 预测结果与输出目录的后处理.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

mod morphometrics;
mod suffix;
mod visible;

pub use morphometrics::{aggregate_morphometrics, read_sheet, MorphometricsSheet, MorphometricsTable};
pub use suffix::{add_slice_suffix, suffixed_name};
pub use visible::{make_visible, stretch};

/// 按名称顺序列出 `root` 下 (仅一层) 的受试者目录.
///
/// `root` 不是目录时返回 [`Error::MissingFile`].
fn subject_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::MissingFile(root.to_owned()));
    }
    let mut ans = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            ans.push(path);
        }
    }
    ans.sort();
    Ok(ans)
}
