//! 为每个受试者目录下的文件名添加后缀, 但保留末尾已有的分割/形态学后缀.

use am_berry::consts::{PRESERVED_SUFFIXES, SLICE_SUFFIX};
use am_berry::post_proc::add_slice_suffix;
use clap::{ArgAction, Parser};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "add-slice-suffix",
    version,
    about = "Add a suffix to filenames in every subject directory"
)]
struct Cli {
    /// Directory containing one sub-directory per subject
    directory: PathBuf,

    /// Suffix inserted before the preserved endings
    #[arg(long, default_value = SLICE_SUFFIX)]
    suffix: String,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    match add_slice_suffix(&cli.directory, &cli.suffix, &PRESERVED_SUFFIXES) {
        Ok(counts) => {
            for (subject, n) in counts.iter() {
                println!("sub-{subject} -> {n} files renamed");
            }
            utils::sep();
            println!(
                "Suffix '{}' added to filenames in '{}'.",
                cli.suffix,
                cli.directory.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
