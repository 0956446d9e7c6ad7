#![warn(missing_docs)]

//! 核心库. 提供轴突 (axon) / 髓鞘 (myelin) 电镜分割掩膜的标签编码,
//! 以及 nnU-Net 扁平训练集到按受试者组织的目录树的重建.
//!
//! 该 crate 仅提供 `safe` 接口.
//!
//! # 注意
//!
//! 1. 所有输入掩膜均为单通道 8-bit 灰度 PNG. 彩色图像在读取时会被转为灰度.
//! 2. 非期望输入 **不会** panic, 而是返回 [`Error`].
//!   批处理模式下, 单个单元的错误会被记录在报告中, 不会中断整批任务.
//!
//! # 开发计划
//!
//! ### 双掩膜融合为三类标签 ✅
//!
//! 背景/髓鞘/轴突分别编码为 0/1/2. 重叠区域按轴突优先.
//!
//! 实现位于 `am-berry/src/mask`.
//!
//! ### 目录级批量融合 ✅
//!
//! 按 `<base>_seg-{axon, myelin}.png` 配对, 单对失败不影响其他配对.
//!
//! 实现位于 `am-berry/src/dataset/pair.rs` 和 `am-berry/src/dataset/batch.rs`.
//!
//! ### nnU-Net 数据集重建 ✅
//!
//! 通过 case-ID 到原始文件名的 JSON 表, 将 `imagesTr` / `labelsTr`
//! 还原为 `converted_data/<subject>/...` 结构, 并将标签值乘以 127.
//!
//! 实现位于 `am-berry/src/dataset/case_index.rs` 和 `am-berry/src/dataset/reconstruct.rs`.
//!
//! ### 预测结果可视化 & 批量文件名后缀 ✅
//!
//! 实现位于 `am-berry/src/post_proc`.
//!
//! ### 形态学统计表格汇总 ✅
//!
//! 读取每个受试者的 `*axon_morphometrics.xlsx`, 追加 `subject` 列后一次性写出一个 CSV.
//!
//! 实现位于 `am-berry/src/post_proc/morphometrics.rs`.

/// 二维索引 (高, 宽), 同时也用作图像形状.
pub type Idx2d = (usize, usize);

pub mod consts;
pub mod dataset;
pub mod error;
pub mod mask;
pub mod post_proc;
pub mod prelude;

pub use error::{Error, ErrorKind, Result, UnitFailure};
pub use mask::{fuse, BinaryMask, FusionConfig, ImgWriteRaw, ImgWriteVis, LabelMask};
