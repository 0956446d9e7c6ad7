//! 在受试者目录下批量为文件名插入后缀, 同时保留已知的分割/形态学后缀.
//!
//! 例如插入 `_slice2` 时:
//!
//! ```text
//! x.png                       -> x_slice2.png
//! x_seg-axonmyelin.png        -> x_slice2_seg-axonmyelin.png
//! x_axon_morphometrics.xlsx   -> x_slice2_axon_morphometrics.xlsx
//! ```

use super::subject_dirs;
use crate::error::Result;
use log::{debug, info};
use std::fs;
use std::path::Path;

/// 计算插入 `suffix` 后的新文件名.
///
/// `preserved` 顺序敏感: 使用第一个匹配的后缀. 均不匹配时插入到 `.png` 之前;
/// 既不匹配任何保留后缀也不是 `.png` 的文件名返回 `None`.
pub fn suffixed_name(file_name: &str, suffix: &str, preserved: &[&str]) -> Option<String> {
    preserved
        .iter()
        .find_map(|p| file_name.strip_suffix(*p).map(|stem| format!("{stem}{suffix}{p}")))
        .or_else(|| {
            file_name
                .strip_suffix(".png")
                .map(|stem| format!("{stem}{suffix}.png"))
        })
}

/// 对 `root` 下每个受试者目录 (仅一层) 中的 `.png` / `.xlsx` 文件执行 [`suffixed_name`] 重命名.
///
/// 返回每个受试者 (按名称排序) 实际重命名的文件个数.
pub fn add_slice_suffix<P: AsRef<Path>>(
    root: P,
    suffix: &str,
    preserved: &[&str],
) -> Result<Vec<(String, usize)>> {
    let root = root.as_ref();
    let subjects = subject_dirs(root)?;
    info!("found {} subjects in {}", subjects.len(), root.display());

    let mut ans = Vec::with_capacity(subjects.len());
    for subject in subjects.iter() {
        let mut renames = Vec::new();
        for entry in fs::read_dir(subject)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !(name.ends_with(".png") || name.ends_with(".xlsx")) {
                continue;
            }
            if let Some(new_name) = suffixed_name(name, suffix, preserved) {
                renames.push((path.clone(), subject.join(new_name)));
            }
        }

        // 先收集再重命名, 避免 read_dir 迭代中看到新文件.
        for (from, to) in renames.iter() {
            fs::rename(from, to)?;
            debug!("{} -> {}", from.display(), to.display());
        }
        let name = subject
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("sub-{name} -> {} files renamed", renames.len());
        ans.push((name, renames.len()));
    }
    Ok(ans)
}
