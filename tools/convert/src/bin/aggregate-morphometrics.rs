//! 将每个受试者目录下的 `*axon_morphometrics.xlsx` 汇总为一个 CSV.

use am_berry::consts::AGGREGATED_CSV;
use am_berry::post_proc::aggregate_morphometrics;
use clap::{ArgAction, Parser};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "aggregate-morphometrics",
    version,
    about = "Aggregate morphometrics from every subject in a single csv file"
)]
struct Cli {
    /// Directory containing one sub-directory of morphometrics files per subject
    input_dir: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    utils::init_logger(cli.verbose);

    match aggregate_morphometrics(&cli.input_dir) {
        Ok(table) => {
            println!(
                "{} rows written to {}",
                table.rows.len(),
                cli.input_dir.join(AGGREGATED_CSV).display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
