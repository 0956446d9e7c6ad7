//! 命令行工具依赖的通用组件.

use log::LevelFilter;
use simple_logger::SimpleLogger;

pub mod loader;
pub mod report;

const SEP: &str = "--------------------------------------------------------";

/// 简单分隔线.
#[inline]
pub fn sep() {
    println!("{SEP}");
}

/// 简单分隔线.
#[inline]
pub fn sep_to<W: std::io::Write>(mut w: W) -> std::io::Result<()> {
    writeln!(&mut w, "{SEP}")
}

/// 获得可并行核心数.
pub fn cpus() -> usize {
    std::thread::available_parallelism().map_or_else(|_| num_cpus::get(), usize::from)
}

/// `-v` 出现次数到日志等级的映射.
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// 初始化 stderr 日志. `RUST_LOG` 存在时优先使用其等级.
///
/// 重复初始化会被忽略.
pub fn init_logger(verbose: u8) {
    let _ = SimpleLogger::new()
        .with_level(level_from_verbosity(verbose))
        .env()
        .init();
}

/// 配置 `rayon` 全局线程池. `jobs` 为 `None` 时使用全部核心.
///
/// 全局线程池已初始化时保持原状.
pub fn init_thread_pool(jobs: Option<usize>) {
    let threads = jobs.filter(|&j| j > 0).unwrap_or_else(cpus);
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        log::debug!("keeping existing thread pool: {e}");
    }
}
