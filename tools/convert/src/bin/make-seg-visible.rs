//! 将 nnU-Net 预测拉伸到完整 8-bit 范围, 使其肉眼可见.

use am_berry::post_proc::make_visible;
use clap::{ArgAction, Parser};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "make-seg-visible",
    version,
    about = "Map segmentation values to the full 8-bit range"
)]
struct Cli {
    /// Directory containing segmentation images
    input_dir: PathBuf,

    /// Directory to save mapped segmentation images
    output_dir: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    match make_visible(&cli.input_dir, &cli.output_dir) {
        Ok(n) => {
            println!("{n} segmentations written to {}", cli.output_dir.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
