mod logger;

use anyhow::Context;
use clap::{error::ErrorKind, Parser};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mppconv", version, about = "Конвертация файлов Microsoft Project в MSPDI XML")]
struct Cli {
    /// Входной файл проекта (MPP или MSPDI)
    #[arg(value_name = "INPUT_MPP_FILE")]
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    logger::init_cli_logger();
    tracing::debug!(input = %cli.input.display(), "starting conversion");

    match run(&cli.input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("conversion failed: {e:#}");
            eprintln!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path) -> anyhow::Result<()> {
    let xml = mppconvlib::convert_file(input)
        .with_context(|| format!("Error converting file: {}", input.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.write_all(&xml)
        .and_then(|_| out.flush())
        .with_context(|| format!("Error converting file: {}", input.display()))?;
    Ok(())
}
