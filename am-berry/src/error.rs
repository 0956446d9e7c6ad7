//! 运行时错误.

use crate::Idx2d;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 掩膜融合与数据集重建的统一错误类型.
#[derive(Error, Debug)]
pub enum Error {
    /// 轴突掩膜与髓鞘掩膜的形状 (高, 宽) 不一致.
    #[error("axon mask shape {axon:?} differs from myelin mask shape {myelin:?}")]
    ShapeMismatch {
        /// 轴突掩膜形状.
        axon: Idx2d,
        /// 髓鞘掩膜形状.
        myelin: Idx2d,
    },

    /// 掩膜中出现了两种以上的灰度值.
    #[error("mask is not binary: found {distinct} distinct intensity values")]
    NonBinaryContent {
        /// 实际出现的不同灰度值个数.
        distinct: usize,
    },

    /// case-ID 不在 case-ID 表中.
    #[error("case-ID `{0}` has no entry in the case index")]
    UnresolvedCaseId(String),

    /// 期望存在的文件 (或目录) 不存在.
    #[error("expected file `{}` does not exist", .0.display())]
    MissingFile(PathBuf),

    /// 文件名不符合位置约定 (nnU-Net 命名, 或 `<date>-<subject>-...` 原始命名).
    #[error("filename `{0}` does not follow the expected naming convention")]
    MalformedFilename(String),

    /// 其他底层 I/O 错误.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 图像编解码错误.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// case-ID 表解析错误.
    #[error("case index is not a flat JSON string map: {0}")]
    Json(#[from] serde_json::Error),

    /// 形态学统计表格读取错误.
    #[error("cannot read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// 汇总 CSV 写出错误.
    #[error("cannot write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// 本 crate 的运行结果.
pub type Result<T> = std::result::Result<T, Error>;

/// [`Error`] 的种类, 用于报告和匹配. 不携带上下文.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// 见 [`Error::ShapeMismatch`].
    ShapeMismatch,

    /// 见 [`Error::NonBinaryContent`].
    NonBinaryContent,

    /// 见 [`Error::UnresolvedCaseId`].
    UnresolvedCaseId,

    /// 见 [`Error::MissingFile`].
    MissingFile,

    /// 见 [`Error::MalformedFilename`].
    MalformedFilename,

    /// 见 [`Error::Io`].
    Io,

    /// 见 [`Error::Image`].
    Image,

    /// 见 [`Error::Json`].
    Json,

    /// 见 [`Error::Spreadsheet`].
    Spreadsheet,

    /// 见 [`Error::Csv`].
    Csv,
}

impl Error {
    /// 错误种类.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::NonBinaryContent { .. } => ErrorKind::NonBinaryContent,
            Self::UnresolvedCaseId(_) => ErrorKind::UnresolvedCaseId,
            Self::MissingFile(_) => ErrorKind::MissingFile,
            Self::MalformedFilename(_) => ErrorKind::MalformedFilename,
            Self::Io(_) => ErrorKind::Io,
            Self::Image(_) => ErrorKind::Image,
            Self::Json(_) => ErrorKind::Json,
            Self::Spreadsheet(_) => ErrorKind::Spreadsheet,
            Self::Csv(_) => ErrorKind::Csv,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ShapeMismatch => "shape mismatch",
            Self::NonBinaryContent => "non-binary content",
            Self::UnresolvedCaseId => "unresolved case-ID",
            Self::MissingFile => "missing file",
            Self::MalformedFilename => "malformed filename",
            Self::Io => "I/O",
            Self::Image => "image codec",
            Self::Json => "JSON",
            Self::Spreadsheet => "spreadsheet",
            Self::Csv => "CSV",
        };
        f.write_str(name)
    }
}

/// 批处理中单个工作单元的失败记录.
///
/// `unit` 是该单元的标识: 批量融合时为 `<base>`, 数据集重建时为 case-ID
/// (无法解析 case-ID 时退化为文件名).
#[derive(Debug)]
pub struct UnitFailure {
    /// 工作单元标识.
    pub unit: String,

    /// 失败原因.
    pub error: Error,
}

impl UnitFailure {
    /// 失败种类.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.unit, self.kind(), self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind, UnitFailure};
    use std::path::PathBuf;

    #[test]
    fn test_kind_matches_variant() {
        let e = Error::ShapeMismatch {
            axon: (4, 4),
            myelin: (4, 5),
        };
        assert_eq!(e.kind(), ErrorKind::ShapeMismatch);
        assert_eq!(
            Error::NonBinaryContent { distinct: 3 }.kind(),
            ErrorKind::NonBinaryContent
        );
        assert_eq!(
            Error::UnresolvedCaseId("042".into()).kind(),
            ErrorKind::UnresolvedCaseId
        );
        assert_eq!(
            Error::MissingFile(PathBuf::from("B_seg-myelin.png")).kind(),
            ErrorKind::MissingFile
        );
    }

    #[test]
    fn test_unit_failure_display_carries_unit_and_kind() {
        let f = UnitFailure {
            unit: "B".into(),
            error: Error::MissingFile(PathBuf::from("B_seg-myelin.png")),
        };
        let s = f.to_string();
        assert!(s.starts_with("B: [missing file]"));
        assert!(s.contains("B_seg-myelin.png"));
    }
}
