use super::save::read_gray;
use crate::consts::gray::is_label;
use crate::error::{Error, Result};
use crate::Idx2d;
use ndarray::{Array2, ArrayView2};
use std::ops::Index;
use std::path::Path;

/// 统计灰度图中不同像素值的个数.
fn distinct_values(gray: ArrayView2<u8>) -> usize {
    let mut seen = [false; 256];
    for &p in gray.iter() {
        seen[p as usize] = true;
    }
    seen.iter().filter(|&&s| s).count()
}

/// 拥有所有权的二维二值掩膜. `true` 代表前景.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryMask {
    data: Array2<bool>,
}

impl BinaryMask {
    /// 直接初始化.
    #[inline]
    pub fn new(data: Array2<bool>) -> Self {
        Self { data }
    }

    /// 从 8-bit 灰度图构造二值掩膜. 灰度值 `>= threshold` 的像素视为前景.
    ///
    /// 灰度图最多只能出现两种不同的像素值, 否则返回 [`Error::NonBinaryContent`].
    /// 全背景 (只有一种像素值) 的掩膜是合法的.
    pub fn from_gray(gray: ArrayView2<u8>, threshold: u8) -> Result<Self> {
        let distinct = distinct_values(gray);
        if distinct > 2 {
            return Err(Error::NonBinaryContent { distinct });
        }
        Ok(Self::new(gray.mapv(|p| p >= threshold)))
    }

    /// 读取 `path` 处的灰度 PNG 并二值化. 文件不存在时返回 [`Error::MissingFile`].
    pub fn open<P: AsRef<Path>>(path: P, threshold: u8) -> Result<Self> {
        let gray = read_gray(path)?;
        Self::from_gray(gray.view(), threshold)
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<bool> {
        self.data.view()
    }

    /// 掩膜的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 前景像素个数.
    #[inline]
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&p| p).count()
    }
}

impl Index<Idx2d> for BinaryMask {
    type Output = bool;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

/// 拥有所有权的二维三类标签掩膜. 像素值只可能是 [`AM_BACKGROUND`](crate::consts::gray::AM_BACKGROUND),
/// [`AM_MYELIN`](crate::consts::gray::AM_MYELIN) 或 [`AM_AXON`](crate::consts::gray::AM_AXON).
///
/// 该结构只能由 [`crate::fuse`] 产生, 创建后不可修改.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabelMask {
    data: Array2<u8>,
}

impl LabelMask {
    /// 直接初始化. 调用者保证所有像素都是合法标签值.
    #[inline]
    pub(crate) fn new(data: Array2<u8>) -> Self {
        debug_assert!(data.iter().copied().all(is_label));
        Self { data }
    }

    /// 获得底层数据的一份不可变 shallow copy.
    #[inline]
    pub fn array_view(&self) -> ArrayView2<u8> {
        self.data.view()
    }

    /// 图像的分辨率 (高, 宽).
    #[inline]
    pub fn shape(&self) -> Idx2d {
        self.data.dim()
    }

    /// 统计图像中值为 `label` 的像素总个数.
    #[inline]
    pub fn count(&self, label: u8) -> usize {
        self.data.iter().filter(|&p| *p == label).count()
    }
}

impl Index<Idx2d> for LabelMask {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx2d) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::BinaryMask;
    use crate::consts::BINARY_THRESHOLD;
    use crate::ErrorKind;
    use ndarray::{array, Array2};

    #[test]
    fn test_binary_from_gray_threshold() {
        let gray = array![[0u8, 255], [255, 0]];
        let mask = BinaryMask::from_gray(gray.view(), BINARY_THRESHOLD).unwrap();
        assert_eq!(mask.shape(), (2, 2));
        assert!(!mask[(0, 0)]);
        assert!(mask[(0, 1)]);
        assert_eq!(mask.foreground_count(), 2);

        // 阈值本身算前景.
        let gray = array![[0u8, 127]];
        let mask = BinaryMask::from_gray(gray.view(), BINARY_THRESHOLD).unwrap();
        assert!(mask[(0, 1)]);
    }

    #[test]
    fn test_binary_single_value_is_allowed() {
        let gray = Array2::<u8>::zeros((4, 4));
        let mask = BinaryMask::from_gray(gray.view(), BINARY_THRESHOLD).unwrap();
        assert_eq!(mask.foreground_count(), 0);
    }

    #[test]
    fn test_binary_rejects_three_values() {
        let gray = array![[0u8, 128], [255, 0]];
        let err = BinaryMask::from_gray(gray.view(), BINARY_THRESHOLD).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonBinaryContent);
        assert!(matches!(
            err,
            crate::Error::NonBinaryContent { distinct: 3 }
        ));
    }

    #[test]
    fn test_binary_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BinaryMask::open(dir.path().join("nope.png"), BINARY_THRESHOLD).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingFile);
    }
}
