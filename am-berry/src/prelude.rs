//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx2d;

pub use crate::error::{Error, ErrorKind, Result, UnitFailure};

pub use crate::mask::{fuse, BinaryMask, FusionConfig, ImgWriteRaw, ImgWriteVis, LabelMask};

pub use crate::consts::gray::{AM_AXON, AM_BACKGROUND, AM_MYELIN};

pub use crate::dataset::{
    convert_pair, discover, reconstruct, reconstruct_case, run_batch, subject_of, BatchReport,
    CaseIndex, FilePairTriple, PairNaming, ReconstructConfig, ReconstructReport,
};

#[cfg(feature = "rayon")]
pub use crate::dataset::{par_reconstruct, par_run_batch};

pub use crate::dataset::home_dataset_dir_with;

pub use crate::post_proc::{add_slice_suffix, aggregate_morphometrics, make_visible};
