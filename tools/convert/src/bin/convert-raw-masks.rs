//! 将两张 8-bit 二值掩膜 (轴突, 髓鞘) 融合为 nnU-Net 训练用的三类标签
//! (背景 0, 髓鞘 1, 轴突 2).
//!
//! 两种互斥的模式:
//!
//! 1. `--axon A --myelin M --output O`: 单对模式, 任何错误都以非零状态退出;
//! 2. `--dir D`: 批量模式, 按 `<base>_seg-{axon, myelin}.png` 配对,
//!   单对失败只记录在报告中.

use am_berry::consts::BINARY_THRESHOLD;
use am_berry::dataset::{convert_pair, par_run_batch, FilePairTriple};
use am_berry::FusionConfig;
use clap::{ArgAction, ArgGroup, Parser};
use log::{error, info};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "convert-raw-masks",
    version,
    about = "Fuse axon and myelin binary masks into a 3-class nnU-Net label"
)]
#[command(group(ArgGroup::new("mode").required(true).args(["axon", "dir"])))]
struct Cli {
    /// Path to the axon mask
    #[arg(long, requires_all = ["myelin", "output"])]
    axon: Option<PathBuf>,

    /// Path to the myelin mask
    #[arg(long, requires_all = ["axon", "output"])]
    myelin: Option<PathBuf>,

    /// Path to the output label mask
    #[arg(long, requires_all = ["axon", "myelin"])]
    output: Option<PathBuf>,

    /// Directory holding `<base>_seg-axon.png` / `<base>_seg-myelin.png` pairs
    #[arg(long, conflicts_with_all = ["axon", "myelin", "output"])]
    dir: Option<PathBuf>,

    /// Gray values at or above this threshold are foreground
    #[arg(long, default_value_t = BINARY_THRESHOLD)]
    threshold: u8,

    /// Worker threads for batch mode (defaults to all cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

enum Mode {
    Single(FilePairTriple),
    Batch(PathBuf),
}

impl Cli {
    /// 参数组保证: 没有 `--dir` 时, 三个单对路径一定同时存在.
    fn into_mode(self) -> Mode {
        match self.dir {
            Some(dir) => Mode::Batch(dir),
            None => {
                let axon = self.axon.unwrap_or_default();
                let base = axon
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Mode::Single(FilePairTriple {
                    base,
                    axon,
                    myelin: self.myelin.unwrap_or_default(),
                    output: self.output.unwrap_or_default(),
                })
            }
        }
    }
}

fn run(mode: Mode, cfg: &FusionConfig, jobs: Option<usize>) -> am_berry::Result<()> {
    match mode {
        Mode::Single(triple) => {
            let label = convert_pair(&triple, cfg)?;
            info!(
                "wrote {} ({}x{})",
                triple.output.display(),
                label.shape().0,
                label.shape().1
            );
        }
        Mode::Batch(dir) => {
            utils::init_thread_pool(jobs);
            let report = par_run_batch(&dir, cfg)?;
            utils::report::describe_batch_into(&report, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    let cfg = FusionConfig {
        threshold: cli.threshold,
        ..Default::default()
    };
    let jobs = cli.jobs;

    match run(cli.into_mode(), &cfg, jobs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
