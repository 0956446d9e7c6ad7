//! 数据集操作.

use crate::consts::PNG_EXT;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

mod batch;
mod case_index;
mod pair;
mod reconstruct;

pub use batch::{convert_pair, run_batch, BatchReport};
pub use case_index::{subject_of, CaseIndex, CaseRecord};
pub use pair::{discover, FilePairTriple, PairNaming};
pub use reconstruct::{
    parse_case_file, reconstruct, reconstruct_case, rescale_label, CaseFile, CaseOutcome,
    ReconstructConfig, ReconstructReport,
};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        pub use batch::par_run_batch;
        pub use reconstruct::par_reconstruct;
    }
}

/// 获取 `{用户主目录}/dataset` 目录.
pub fn home_dataset_dir() -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    Some(ans)
}

/// 获取 `{用户主目录}/dataset` 目录下给定继续项组成的全路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = home_dataset_dir()?;
    ans.extend(it);
    Some(ans)
}

/// 按文件名顺序列出 `dir` 下 (不递归) 所有 `.png` 文件.
///
/// `dir` 不是目录时返回 [`Error::MissingFile`].
pub fn list_png<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::MissingFile(dir.to_owned()));
    }
    let mut ans = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == PNG_EXT) {
            ans.push(path);
        }
    }
    ans.sort();
    Ok(ans)
}
