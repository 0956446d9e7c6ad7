//! 图像的读取与持久化存储.

use super::{BinaryMask, LabelMask};
use crate::error::{Error, Result};
use image::ImageResult;
use ndarray::{Array2, ArrayView2};
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 对于 [`LabelMask`] 这类仅存在 0, 1, 2 像素值的图像, 在保存时会映射到肉眼较易区分的形式;
/// 对于 [`BinaryMask`], 前景保存为白色, 背景保存为黑色.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 表明一个可以通过 **按原样** 模式持久化存储的图像对象.
///
/// 这是训练器期望的格式: 标签值不做任何映射.
pub trait ImgWriteRaw {
    /// 按原样将图片保存到 `path` 路径.
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 使标签像素更有利于单通道可视化.
#[inline]
pub(crate) fn pretty_label(label: u8) -> u8 {
    use crate::consts::gray::*;
    match label {
        // 背景为黑色
        AM_BACKGROUND => BLACK,

        // 髓鞘为灰色
        AM_MYELIN => GRAY,

        // 轴突为白色
        AM_AXON => WHITE,

        any_else => panic!("只允许图像存在 0, 1, 2 像素, 但发现了 `{any_else}`"),
    }
}

/// 前景为白色, 背景为黑色.
#[inline]
pub(crate) fn pretty_binary(fg: bool) -> u8 {
    use crate::consts::gray::{BLACK, WHITE};
    if fg {
        WHITE
    } else {
        BLACK
    }
}

/// 以单通道 8-bit 灰度 PNG 读取 `path`. 多通道图像会被转为灰度.
///
/// 文件不存在时返回 [`Error::MissingFile`].
pub fn read_gray<P: AsRef<Path>>(path: P) -> Result<Array2<u8>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_owned()));
    }
    let img = image::open(path)?.into_luma8();
    let (width, height) = img.dimensions();
    Ok(Array2::from_shape_fn(
        (height as usize, width as usize),
        |(h, w)| img.get_pixel(w as u32, h as u32)[0],
    ))
}

/// 将 (高, 宽) 排布的灰度数据按原样保存到 `path`.
pub fn save_gray<P: AsRef<Path>>(data: ArrayView2<u8>, path: P) -> ImageResult<()> {
    let (height, width) = data.dim();
    let mut buf = image::GrayImage::new(width as u32, height as u32);
    for ((h, w), &pix) in data.indexed_iter() {
        buf.put_pixel(w as u32, h as u32, image::Luma([pix]));
    }
    buf.save(path)
}

macro_rules! impl_mask_vis {
    ($($mask: ty => $pretty: ident),+) => {
        $(
            impl ImgWriteVis for $mask {
                fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
                    let (height, width) = self.shape();
                    let mut buf = image::GrayImage::new(width as u32, height as u32);
                    for ((h, w), &pix) in self.array_view().indexed_iter() {
                        buf.put_pixel(w as u32, h as u32, image::Luma([$pretty(pix)]));
                    }
                    buf.save(path)
                }
            }
        )+
    };
}

impl_mask_vis!(LabelMask => pretty_label, BinaryMask => pretty_binary);

/// 按原样存储.
impl ImgWriteRaw for LabelMask {
    #[inline]
    fn save_raw<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        save_gray(self.array_view(), path)
    }
}
