//! 单对/批量掩膜融合.
//!
//! 单对模式下任何错误直接返回给调用者; 批量模式下每一对都是独立的工作单元,
//! 失败会被记录进 [`BatchReport`], 然后继续处理下一对.

use super::pair::{discover, FilePairTriple};
use crate::error::{Result, UnitFailure};
use crate::mask::{fuse, BinaryMask, FusionConfig, ImgWriteRaw, LabelMask};
use log::{debug, info, warn};
use std::path::Path;

/// 批量融合结果. 两个列表都按 `<base>` 排序.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 成功融合的 `<base>`.
    pub succeeded: Vec<String>,

    /// 失败的 `<base>` 及原因.
    pub failed: Vec<UnitFailure>,
}

impl BatchReport {
    /// 一次性汇总所有单元的结果.
    fn from_outcomes<I: IntoIterator<Item = (String, Result<()>)>>(it: I) -> Self {
        let mut report = Self::default();
        for (unit, outcome) in it {
            match outcome {
                Ok(()) => report.succeeded.push(unit),
                Err(error) => report.failed.push(UnitFailure { unit, error }),
            }
        }
        report.succeeded.sort_unstable();
        report.failed.sort_unstable_by(|a, b| a.unit.cmp(&b.unit));
        report
    }

    /// 成功个数.
    #[inline]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// 失败个数.
    #[inline]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// 处理的单元总数.
    #[inline]
    pub fn total(&self) -> usize {
        self.succeeded_count() + self.failed_count()
    }

    /// 是否全部成功. 空批次也视为全部成功.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 融合单个三元组并将结果按原样写入 `triple.output`.
///
/// 任一掩膜缺失、非二值, 或两者形状不一致时返回错误, 且不会写出任何文件.
pub fn convert_pair(triple: &FilePairTriple, cfg: &FusionConfig) -> Result<LabelMask> {
    let axon = BinaryMask::open(&triple.axon, cfg.threshold)?;
    let myelin = BinaryMask::open(&triple.myelin, cfg.threshold)?;
    let label = fuse(&axon, &myelin)?;
    label.save_raw(&triple.output)?;
    Ok(label)
}

/// 批处理中的一个单元. 永不返回 `Err`, 错误留在结果里.
fn convert_unit(triple: &FilePairTriple, cfg: &FusionConfig) -> (String, Result<()>) {
    let outcome = convert_pair(triple, cfg).map(|_| ());
    match &outcome {
        Ok(()) => debug!("fused `{}` -> {}", triple.base, triple.output.display()),
        Err(e) => warn!("skipping `{}`: {e}", triple.base),
    }
    (triple.base.clone(), outcome)
}

#[inline]
fn log_summary(dir: &Path, report: &BatchReport) {
    info!(
        "batch fusion in {}: {} succeeded, {} failed",
        dir.display(),
        report.succeeded_count(),
        report.failed_count()
    );
}

/// 对 `dir` 下发现的所有三元组依次执行融合.
///
/// 只有目录本身无法读取时才返回 `Err`. 单对失败 (哪怕全部失败)
/// 只会出现在 [`BatchReport::failed`] 中.
pub fn run_batch<P: AsRef<Path>>(dir: P, cfg: &FusionConfig) -> Result<BatchReport> {
    let dir = dir.as_ref();
    let triples = discover(dir, &cfg.naming)?;
    let report = BatchReport::from_outcomes(triples.iter().map(|t| convert_unit(t, cfg)));
    log_summary(dir, &report);
    Ok(report)
}

/// 借助 `rayon`, 并行地执行 [`run_batch`]. 结果与串行版本一致.
#[cfg(feature = "rayon")]
pub fn par_run_batch<P: AsRef<Path>>(dir: P, cfg: &FusionConfig) -> Result<BatchReport> {
    use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    let dir = dir.as_ref();
    let triples = discover(dir, &cfg.naming)?;
    let outcomes: Vec<_> = triples.par_iter().map(|t| convert_unit(t, cfg)).collect();
    let report = BatchReport::from_outcomes(outcomes);
    log_summary(dir, &report);
    Ok(report)
}
