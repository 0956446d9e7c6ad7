//! 轴突/髓鞘掩膜文件配对.

use crate::consts::{AXON_SUFFIX, MYELIN_SUFFIX, NNUNET_LABEL_SUFFIX};
use crate::error::{Error, Result};
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// 批量模式的文件命名规则. 文件名形如 `<base><suffix>`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PairNaming {
    /// 轴突掩膜后缀, 默认 `_seg-axon.png`.
    pub axon_suffix: String,

    /// 髓鞘掩膜后缀, 默认 `_seg-myelin.png`.
    pub myelin_suffix: String,

    /// 融合标签输出后缀, 默认 `_nnunet-label.png`.
    pub output_suffix: String,
}

impl Default for PairNaming {
    fn default() -> Self {
        Self {
            axon_suffix: AXON_SUFFIX.to_owned(),
            myelin_suffix: MYELIN_SUFFIX.to_owned(),
            output_suffix: NNUNET_LABEL_SUFFIX.to_owned(),
        }
    }
}

impl PairNaming {
    /// 若 `file_name` 是轴突或髓鞘掩膜, 返回其 `<base>`.
    pub fn base_of<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.axon_suffix.as_str())
            .or_else(|| file_name.strip_suffix(self.myelin_suffix.as_str()))
            .filter(|base| !base.is_empty())
    }
}

/// 一次融合所需的三个路径. 只在单次融合期间存在.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilePairTriple {
    /// 共同的文件名前缀.
    pub base: String,

    /// 轴突掩膜路径.
    pub axon: PathBuf,

    /// 髓鞘掩膜路径.
    pub myelin: PathBuf,

    /// 融合标签输出路径.
    pub output: PathBuf,
}

impl FilePairTriple {
    /// 在 `dir` 下按 `naming` 为 `base` 构造三个路径. 不检查文件是否存在.
    pub fn from_base<P: AsRef<Path>>(dir: P, base: &str, naming: &PairNaming) -> Self {
        let dir = dir.as_ref();
        Self {
            base: base.to_owned(),
            axon: dir.join(format!("{base}{}", naming.axon_suffix)),
            myelin: dir.join(format!("{base}{}", naming.myelin_suffix)),
            output: dir.join(format!("{base}{}", naming.output_suffix)),
        }
    }
}

/// 扫描 `dir` (不递归), 为每个出现过的 `<base>` 生成一个 [`FilePairTriple`].
///
/// 只要轴突或髓鞘掩膜之一存在, 就会生成该 `<base>` 的三元组;
/// 另一半是否存在留给融合阶段检查. 返回值按 `<base>` 排序.
pub fn discover<P: AsRef<Path>>(dir: P, naming: &PairNaming) -> Result<Vec<FilePairTriple>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::MissingFile(dir.to_owned()));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        // 非 UTF-8 文件名不可能匹配命名规则.
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(names
        .iter()
        .filter_map(|name| naming.base_of(name))
        .sorted_unstable()
        .dedup()
        .map(|base| FilePairTriple::from_base(dir, base, naming))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{discover, FilePairTriple, PairNaming};
    use crate::ErrorKind;
    use std::fs;

    #[test]
    fn test_base_of() {
        let n = PairNaming::default();
        assert_eq!(n.base_of("A_seg-axon.png"), Some("A"));
        assert_eq!(n.base_of("sub-01_x_seg-myelin.png"), Some("sub-01_x"));
        assert_eq!(n.base_of("A_seg-axonmyelin.png"), None);
        assert_eq!(n.base_of("A_nnunet-label.png"), None);
        assert_eq!(n.base_of("_seg-axon.png"), None);
        assert_eq!(n.base_of("A.png"), None);
    }

    #[test]
    fn test_discover_groups_by_base() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "A_seg-axon.png",
            "A_seg-myelin.png",
            "B_seg-axon.png",
            "C_seg-myelin.png",
            "A_nnunet-label.png",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let naming = PairNaming::default();
        let triples = discover(dir.path(), &naming).unwrap();
        let bases: Vec<_> = triples.iter().map(|t| t.base.as_str()).collect();
        assert_eq!(bases, ["A", "B", "C"]);

        // 即使髓鞘掩膜不存在, 也会生成完整路径.
        assert_eq!(
            triples[1],
            FilePairTriple {
                base: "B".into(),
                axon: dir.path().join("B_seg-axon.png"),
                myelin: dir.path().join("B_seg-myelin.png"),
                output: dir.path().join("B_nnunet-label.png"),
            }
        );
    }

    #[test]
    fn test_discover_custom_naming() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x-ax.png"), b"").unwrap();
        let naming = PairNaming {
            axon_suffix: "-ax.png".into(),
            myelin_suffix: "-my.png".into(),
            output_suffix: "-lbl.png".into(),
        };
        let triples = discover(dir.path(), &naming).unwrap();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].output, dir.path().join("x-lbl.png"));
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(dir.path().join("nope"), &PairNaming::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingFile);
    }
}
