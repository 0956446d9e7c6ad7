//! nnU-Net 数据集解析.
//!
//! 读取 nnU-Net 原始训练集, 借助 case-ID 到原始文件名的 JSON 表, 将其还原为
//! `<output_dir>/<subject>/...` 的可用格式. 受试者从原始文件名中提取.

use am_berry::consts::{CONVERTED_DATA_DIR, NNUNET_DATASET_SUBDIR};
use am_berry::dataset::{par_reconstruct, CaseIndex, ReconstructConfig};
use clap::{ArgAction, Parser};
use log::error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "convert-nnunet-dataset",
    version,
    about = "Convert an nnU-Net raw dataset back to a per-subject layout"
)]
struct Cli {
    /// Path to the JSON file mapping case-IDs to original filenames
    jsonpath: PathBuf,

    /// Root of the nnU-Net data (defaults to $NNUNET_DATA_DIR, then $HOME/dataset)
    #[arg(long)]
    datapath: Option<PathBuf>,

    /// Dataset directory relative to the data root
    #[arg(long, default_value_os_t = NNUNET_DATASET_SUBDIR.iter().collect::<PathBuf>())]
    dataset_subdir: PathBuf,

    /// Where the per-subject tree is written
    #[arg(long, default_value = CONVERTED_DATA_DIR)]
    output_dir: PathBuf,

    /// Worker threads (defaults to all cores)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn run(cli: Cli) -> am_berry::Result<()> {
    let index = CaseIndex::load(&cli.jsonpath)?;
    let root = match cli.datapath {
        Some(p) => p,
        None => utils::loader::data_root_from_env_or_home()
            .ok_or_else(|| am_berry::Error::MissingFile(PathBuf::from("$HOME/dataset")))?,
    };
    let cfg = ReconstructConfig {
        dataset_subdir: cli.dataset_subdir,
        output_dir: cli.output_dir,
        ..Default::default()
    };

    utils::init_thread_pool(cli.jobs);
    let report = par_reconstruct(&root, &index, &cfg)?;
    utils::report::describe_reconstruct_into(&report, &mut io::stdout().lock())?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
