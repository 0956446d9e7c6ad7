//! 从扁平的 nnU-Net 训练集重建按受试者组织的目录树.
//!
//! 输入布局:
//!
//! ```text
//! <root>/<dataset_subdir>/imagesTr/<DATASET>_<case_id>_0000.png
//! <root>/<dataset_subdir>/labelsTr/<DATASET>_<case_id>.png
//! ```
//!
//! 输出布局:
//!
//! ```text
//! <output_dir>/<subject_id>/<original_filename>.png
//! <output_dir>/<subject_id>/<original_filename>_seg-axonmyelin.png
//! ```

use super::case_index::{is_path_component, subject_of, CaseIndex};
use super::list_png;
use crate::consts::*;
use crate::error::{Error, Result, UnitFailure};
use crate::mask::{read_gray, save_gray};
use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// 数据集重建配置.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconstructConfig {
    /// 数据集目录, 相对于数据根目录.
    pub dataset_subdir: PathBuf,

    /// 训练图像目录名, 默认 `imagesTr`.
    pub images_dir: String,

    /// 训练标签目录名, 默认 `labelsTr`. 与 `images_dir` 同级.
    pub labels_dir: String,

    /// 训练图像文件名中紧跟 case-ID 的通道标记, 默认 `_0000`.
    pub channel_token: String,

    /// 输出根目录, 默认 `converted_data`.
    pub output_dir: PathBuf,

    /// 标签像素放大倍数, 默认 127. 乘积按 8-bit 回绕, 不做范围检查.
    pub label_multiplier: u8,

    /// 输出标签文件名后缀, 默认 `_seg-axonmyelin.png`.
    pub label_suffix: String,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            dataset_subdir: NNUNET_DATASET_SUBDIR.iter().collect(),
            images_dir: NNUNET_IMAGES_DIR.to_owned(),
            labels_dir: NNUNET_LABELS_DIR.to_owned(),
            channel_token: NNUNET_CHANNEL_TOKEN.to_owned(),
            output_dir: PathBuf::from(CONVERTED_DATA_DIR),
            label_multiplier: LABEL_MULTIPLIER,
            label_suffix: AXONMYELIN_SUFFIX.to_owned(),
        }
    }
}

impl ReconstructConfig {
    /// 训练图像目录的全路径.
    pub fn images_path<P: AsRef<Path>>(&self, root: P) -> PathBuf {
        let mut ans = root.as_ref().join(&self.dataset_subdir);
        ans.push(&self.images_dir);
        ans
    }

    /// 训练标签目录的全路径.
    pub fn labels_path<P: AsRef<Path>>(&self, root: P) -> PathBuf {
        let mut ans = root.as_ref().join(&self.dataset_subdir);
        ans.push(&self.labels_dir);
        ans
    }
}

/// 训练图像文件名的解析结果.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseFile {
    /// case-ID, 即通道标记之前的最后一个 `_` 分割字段.
    pub case_id: String,

    /// 同一 case 的标签文件名, 即去掉通道标记后的文件名.
    pub label_name: String,
}

/// 解析 `<DATASET>_<case_id><channel_token>.<ext>` 形式的训练图像文件名.
///
/// `<DATASET>` 自身可以含有 `_`. 不符合该形式时返回 [`Error::MalformedFilename`].
pub fn parse_case_file(file_name: &str, channel_token: &str) -> Result<CaseFile> {
    let malformed = || Error::MalformedFilename(file_name.to_owned());

    let (stem, ext) = file_name.rsplit_once('.').ok_or_else(malformed)?;
    let case_stem = stem.strip_suffix(channel_token).ok_or_else(malformed)?;
    match case_stem.rsplit_once('_') {
        Some((dataset, case_id)) if !dataset.is_empty() && !case_id.is_empty() => Ok(CaseFile {
            case_id: case_id.to_owned(),
            label_name: format!("{case_stem}.{ext}"),
        }),
        _ => Err(malformed()),
    }
}

/// 将标签每个像素乘以 `multiplier`. 溢出时按 8-bit 回绕.
#[inline]
pub fn rescale_label(raw: ArrayView2<u8>, multiplier: u8) -> Array2<u8> {
    raw.mapv(|v| v.wrapping_mul(multiplier))
}

/// 由原始文件名得到输出的 (图像文件名, 标签文件名).
fn output_names(original_filename: &str, label_suffix: &str) -> (String, String) {
    let stem = original_filename
        .strip_suffix(".png")
        .unwrap_or(original_filename);
    (format!("{stem}.{PNG_EXT}"), format!("{stem}{label_suffix}"))
}

/// 单个 case 的重建结果.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseOutcome {
    /// case-ID.
    pub case_id: String,

    /// 所属受试者.
    pub subject_id: String,

    /// 复制出的图像路径.
    pub image: PathBuf,

    /// 写出的放大后标签路径.
    pub label: PathBuf,
}

/// 重建单个训练图像 `image_path` 及其标签. 任何错误直接返回.
///
/// 标签位于 `image_path` 上两级目录下的 `cfg.labels_dir` 中.
/// 标签在复制图像之前读取并放大, 因此标签缺失时不会留下孤立的图像;
/// 标签写出失败时, 已复制的图像会被删除.
/// 原始文件名和受试者标识必须能作为单级路径使用, 否则返回 [`Error::MalformedFilename`].
/// 受试者目录按需创建, 已存在时不报错; 已存在的同名输出文件会被覆盖.
pub fn reconstruct_case<P: AsRef<Path>>(
    image_path: P,
    index: &CaseIndex,
    cfg: &ReconstructConfig,
) -> Result<CaseOutcome> {
    let image_path = image_path.as_ref();
    let file_name = image_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::MalformedFilename(image_path.display().to_string()))?;

    let case = parse_case_file(file_name, &cfg.channel_token)?;
    let original = index.resolve(&case.case_id)?;
    if !is_path_component(original) {
        return Err(Error::MalformedFilename(original.to_owned()));
    }
    let subject_id = subject_of(original)?;

    let dataset_dir = image_path
        .parent()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let mut label_path = dataset_dir.join(&cfg.labels_dir);
    label_path.push(&case.label_name);
    let label = rescale_label(read_gray(&label_path)?.view(), cfg.label_multiplier);

    let subject_dir = cfg.output_dir.join(subject_id);
    fs::create_dir_all(&subject_dir)?;

    let (image_name, label_name) = output_names(original, &cfg.label_suffix);
    let image_out = subject_dir.join(image_name);
    fs::copy(image_path, &image_out)?;

    // 图像和标签要么都写出, 要么都不留下.
    let label_out = subject_dir.join(label_name);
    if let Err(e) = save_gray(label.view(), &label_out) {
        if let Err(rm) = fs::remove_file(&image_out) {
            warn!("cannot remove {}: {rm}", image_out.display());
        }
        return Err(e.into());
    }

    debug!("case {} -> {}", case.case_id, image_out.display());
    Ok(CaseOutcome {
        case_id: case.case_id,
        subject_id: subject_id.to_owned(),
        image: image_out,
        label: label_out,
    })
}

/// 数据集重建结果.
#[derive(Debug, Default)]
pub struct ReconstructReport {
    /// 成功重建的 case 所属的受试者 (去重).
    pub subjects: BTreeSet<String>,

    /// 成功重建的 case, 按 case-ID 排序.
    pub converted: Vec<CaseOutcome>,

    /// 失败的 case, 按单元标识排序.
    pub failed: Vec<UnitFailure>,
}

impl ReconstructReport {
    /// 一次性汇总所有单元的结果.
    fn from_outcomes<I: IntoIterator<Item = (String, Result<CaseOutcome>)>>(it: I) -> Self {
        let mut report = Self::default();
        for (unit, outcome) in it {
            match outcome {
                Ok(case) => {
                    report.subjects.insert(case.subject_id.clone());
                    report.converted.push(case);
                }
                Err(error) => report.failed.push(UnitFailure { unit, error }),
            }
        }
        report.converted.sort_unstable_by(|a, b| a.case_id.cmp(&b.case_id));
        report.failed.sort_unstable_by(|a, b| a.unit.cmp(&b.unit));
        report
    }

    /// 是否全部成功.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 批处理中的一个单元. 单元标识优先使用 case-ID, 无法解析时使用文件名.
fn reconstruct_unit(
    image_path: &Path,
    index: &CaseIndex,
    cfg: &ReconstructConfig,
) -> (String, Result<CaseOutcome>) {
    let file_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let unit = parse_case_file(&file_name, &cfg.channel_token)
        .map(|c| c.case_id)
        .unwrap_or(file_name);

    let outcome = reconstruct_case(image_path, index, cfg);
    if let Err(e) = &outcome {
        warn!("skipping case `{unit}`: {e}");
    }
    (unit, outcome)
}

/// 检查输入目录并创建输出根目录, 返回待处理的训练图像.
fn prepare<P: AsRef<Path>>(root: P, cfg: &ReconstructConfig) -> Result<Vec<PathBuf>> {
    let images = list_png(cfg.images_path(root))?;
    fs::create_dir_all(&cfg.output_dir)?;
    Ok(images)
}

#[inline]
fn log_summary(report: &ReconstructReport) {
    info!(
        "reconstructed {} cases for subjects {:?}, {} failed",
        report.converted.len(),
        report.subjects,
        report.failed.len()
    );
}

/// 重建 `root` 下整个训练集.
///
/// 只有训练图像目录不存在或输出根目录无法创建时才返回 `Err`.
/// 单个 case 的失败 (未知 case-ID, 标签缺失等) 只会出现在 [`ReconstructReport::failed`] 中.
/// 重复运行是幂等的: 目录不会重复创建报错, 输出文件集合不变.
pub fn reconstruct<P: AsRef<Path>>(
    root: P,
    index: &CaseIndex,
    cfg: &ReconstructConfig,
) -> Result<ReconstructReport> {
    let images = prepare(root, cfg)?;
    let report = ReconstructReport::from_outcomes(
        images.iter().map(|p| reconstruct_unit(p, index, cfg)),
    );
    log_summary(&report);
    Ok(report)
}

/// 借助 `rayon`, 并行地执行 [`reconstruct`]. 结果与串行版本一致.
///
/// 多个 case 可能同时创建同一受试者目录, `create_dir_all` 允许这种竞争.
#[cfg(feature = "rayon")]
pub fn par_reconstruct<P: AsRef<Path>>(
    root: P,
    index: &CaseIndex,
    cfg: &ReconstructConfig,
) -> Result<ReconstructReport> {
    use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    let images = prepare(root, cfg)?;
    let outcomes: Vec<_> = images
        .par_iter()
        .map(|p| reconstruct_unit(p, index, cfg))
        .collect();
    let report = ReconstructReport::from_outcomes(outcomes);
    log_summary(&report);
    Ok(report)
}
