//! 轴突/髓鞘双掩膜融合为三类标签.

use super::{BinaryMask, LabelMask};
use crate::consts::gray::*;
use crate::consts::BINARY_THRESHOLD;
use crate::dataset::PairNaming;
use crate::error::{Error, Result};
use ndarray::Zip;

/// 掩膜融合配置.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FusionConfig {
    /// 二值化阈值. 灰度值 `>= threshold` 视为前景.
    pub threshold: u8,

    /// 批量模式下的文件命名规则.
    pub naming: PairNaming,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            threshold: BINARY_THRESHOLD,
            naming: PairNaming::default(),
        }
    }
}

/// 单个像素的分类规则.
///
/// 轴突优先于髓鞘, 髓鞘优先于背景. 两者同时为前景时结果为轴突.
#[inline]
pub const fn classify(axon: bool, myelin: bool) -> u8 {
    match (axon, myelin) {
        (true, _) => AM_AXON,
        (false, true) => AM_MYELIN,
        (false, false) => AM_BACKGROUND,
    }
}

/// 将形状相同的轴突掩膜和髓鞘掩膜融合为三类标签掩膜.
///
/// 结果由两个输入逐像素经 [`classify`] 构造, 不修改任何输入.
/// 形状不一致时返回 [`Error::ShapeMismatch`], 不做任何裁剪或填充.
pub fn fuse(axon: &BinaryMask, myelin: &BinaryMask) -> Result<LabelMask> {
    if axon.shape() != myelin.shape() {
        return Err(Error::ShapeMismatch {
            axon: axon.shape(),
            myelin: myelin.shape(),
        });
    }
    let data = Zip::from(axon.array_view())
        .and(myelin.array_view())
        .map_collect(|&a, &m| classify(a, m));
    Ok(LabelMask::new(data))
}
