//! 对 `am_berry::dataset` 的更一层封装. 提供默认数据路径.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// 数据根目录的环境变量名.
pub const DATA_DIR_VAR: &str = "NNUNET_DATA_DIR";

/// 环境变量值非空时使用它, 否则退回到 `$HOME/dataset`.
fn env_or_home(var: Option<OsString>) -> Option<PathBuf> {
    match var {
        Some(d) if !d.is_empty() => Some(PathBuf::from(d)),
        _ => am_berry::dataset::home_dataset_dir(),
    }
}

/// 获取 nnU-Net 数据根目录 (其下为 `nnUNet_raw/...`).
///
/// 1. 若环境变量 `$NNUNET_DATA_DIR` 非空, 则返回其值;
/// 2. 否则, 返回 `$HOME/dataset`. 无法确定用户主目录时返回 `None`.
pub fn data_root_from_env_or_home() -> Option<PathBuf> {
    env_or_home(env::var_os(DATA_DIR_VAR))
}
