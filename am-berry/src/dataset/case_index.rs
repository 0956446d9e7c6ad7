//! case-ID 到原始文件名的映射表.
//!
//! 表来自外部 JSON 文件, 形如 `{"001": "2021-05-12-SUB01-run-a", ...}`.
//!
//! 原始文件名必须满足 `<date>-<subject_id>-<...>` 的约定: 第二个字段即受试者标识.
//! `<date>` 可以是不含 `-` 的紧凑日期, 也可以是 `YYYY-MM-DD`.
//! 该约定属于外部数据契约, 本模块不做任何推断.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// 原始文件名开头 `<date>` 字段的字节长度.
///
/// `YYYY-MM-DD-` 形式的 ISO 日期自身含有 `-`, 整体视为一个字段;
/// 否则 `<date>` 是第一个 `-` 之前的部分.
fn date_len(name: &str) -> usize {
    let b = name.as_bytes();
    let iso = b.len() > 10
        && b[10] == b'-'
        && b[..10].iter().enumerate().all(|(i, c)| match i {
            4 | 7 => *c == b'-',
            _ => c.is_ascii_digit(),
        });
    if iso {
        10
    } else {
        name.find('-').unwrap_or(name.len())
    }
}

/// `name` 能否作为单级路径使用? 不能为空, 不能是 `.` / `..`, 不能含有路径分隔符.
///
/// 表中的值来自外部文件, 拼接进输出路径前必须通过该检查.
pub(crate) fn is_path_component(name: &str) -> bool {
    !matches!(name, "" | "." | "..") && !name.contains(['/', '\\'])
}

/// 从原始文件名中取出受试者标识, 即 `<date>` 之后的第一个 `-` 分割字段.
///
/// 字段不足, 或受试者字段不能作为单级目录名时返回 [`Error::MalformedFilename`].
pub fn subject_of(original_filename: &str) -> Result<&str> {
    let rest = &original_filename[date_len(original_filename)..];
    match rest.strip_prefix('-').and_then(|r| r.split('-').next()) {
        Some(subject) if is_path_component(subject) => Ok(subject),
        _ => Err(Error::MalformedFilename(original_filename.to_owned())),
    }
}

/// 一条 case 记录. 受试者标识由 `original_filename` 推导, 不单独存储.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CaseRecord {
    /// nnU-Net case-ID, 如 `"007"`.
    pub case_id: String,

    /// 原始文件名, 如 `"2023-01-09-S09-trialA"`.
    pub original_filename: String,
}

impl CaseRecord {
    /// 受试者标识.
    #[inline]
    pub fn subject_id(&self) -> Result<&str> {
        subject_of(&self.original_filename)
    }
}

/// case-ID 到原始文件名的映射表.
#[derive(Clone, Debug, Default)]
pub struct CaseIndex {
    table: HashMap<String, String>,
}

impl CaseIndex {
    /// 打开 `path` 处的 JSON 表. 文件不存在时返回 [`Error::MissingFile`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingFile(path.to_owned()));
        }
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// 从任意 reader 解析 JSON 表. 表必须是 "字符串 -> 字符串" 的扁平对象.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let table: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self { table })
    }

    /// 查询 `case_id` 对应的原始文件名. 未知 case-ID 返回 [`Error::UnresolvedCaseId`].
    pub fn resolve(&self, case_id: &str) -> Result<&str> {
        self.table
            .get(case_id)
            .map(String::as_str)
            .ok_or_else(|| Error::UnresolvedCaseId(case_id.to_owned()))
    }

    /// 表中的记录条数.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// 表是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// 按 case-ID 顺序迭代所有记录.
    pub fn records(&self) -> impl Iterator<Item = CaseRecord> + '_ {
        let mut ids: Vec<_> = self.table.keys().collect();
        ids.sort_unstable();
        ids.into_iter().map(|id| CaseRecord {
            case_id: id.clone(),
            original_filename: self.table[id].clone(),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CaseIndex {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            table: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
