//! 通用常量.
//!
//! 这些值只作为各配置结构的默认值使用, 组件本身不直接读取它们.

/// 单通道颜色.
pub mod gray {
    /// 融合标签中, 背景的像素值.
    pub const AM_BACKGROUND: u8 = 0;

    /// 融合标签中, 髓鞘的像素值.
    pub const AM_MYELIN: u8 = 1;

    /// 融合标签中, 轴突的像素值.
    pub const AM_AXON: u8 = 2;

    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道灰色.
    pub const GRAY: u8 = 0b_1000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 像素是否是合法的融合标签值?
    #[inline]
    pub const fn is_label(p: u8) -> bool {
        matches!(p, AM_BACKGROUND | AM_MYELIN | AM_AXON)
    }
}

/// 二值掩膜的前景阈值. 灰度值 `>=` 该值视为前景.
pub const BINARY_THRESHOLD: u8 = 127;

/// 重建数据集时, 标签像素的放大倍数.
pub const LABEL_MULTIPLIER: u8 = 127;

/// 轴突掩膜文件名后缀.
pub const AXON_SUFFIX: &str = "_seg-axon.png";

/// 髓鞘掩膜文件名后缀.
pub const MYELIN_SUFFIX: &str = "_seg-myelin.png";

/// 批量融合输出文件名后缀.
pub const NNUNET_LABEL_SUFFIX: &str = "_nnunet-label.png";

/// 重建数据集中, 标签文件名后缀.
pub const AXONMYELIN_SUFFIX: &str = "_seg-axonmyelin.png";

/// nnU-Net 训练图像的通道标记. 形如 `<DATASET>_<case_id>_0000.png`.
pub const NNUNET_CHANNEL_TOKEN: &str = "_0000";

/// 原始数据集目录 (相对于数据根目录) 的各级组成.
pub const NNUNET_DATASET_SUBDIR: [&str; 2] = ["nnUNet_raw", "Dataset011_CARS_BRAIN"];

/// nnU-Net 训练图像目录名.
pub const NNUNET_IMAGES_DIR: &str = "imagesTr";

/// nnU-Net 训练标签目录名.
pub const NNUNET_LABELS_DIR: &str = "labelsTr";

/// 重建数据集的默认输出目录.
pub const CONVERTED_DATA_DIR: &str = "converted_data";

/// 统一使用的图像扩展名.
pub const PNG_EXT: &str = "png";

/// 批量添加切片后缀时, 默认的后缀.
pub const SLICE_SUFFIX: &str = "_slice2";

/// 批量添加切片后缀时, 需要保留在文件名末尾的后缀. **顺序敏感**, 越靠前越先匹配.
pub const PRESERVED_SUFFIXES: [&str; 6] = [
    "_seg-axon.png",
    "_seg-myelin.png",
    "_seg-axonmyelin.png",
    "_axonmyelin_index.png",
    "_index.png",
    "_axon_morphometrics.xlsx",
];

/// 形态学统计表格文件名的结尾.
pub const MORPHOMETRICS_SUFFIX: &str = "axon_morphometrics.xlsx";

/// 汇总 CSV 的文件名, 位于受试者目录的上一级.
pub const AGGREGATED_CSV: &str = "aggregated_morphometrics.csv";

/// 汇总 CSV 中记录受试者的列名.
pub const SUBJECT_COLUMN: &str = "subject";
