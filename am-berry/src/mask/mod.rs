//! 二维分割掩膜对象及其融合.

mod core;
mod fuse;
mod save;

pub use self::core::{BinaryMask, LabelMask};

pub use fuse::{classify, fuse, FusionConfig};

pub use save::{read_gray, save_gray, ImgWriteRaw, ImgWriteVis};
