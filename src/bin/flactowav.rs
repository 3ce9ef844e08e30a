//! Converts a FLAC file into a WAV file stored next to the source.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use directories::BaseDirs;
use flac_pcm::{ConvertOptions, convert_file, output_path_for};
use log::info;

const USAGE: &str = "usage: flactowav [--buffer-size SAMPLES] <PATH>";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    path: String,
    options: ConvertOptions,
}

/// Parse the command line (without the program name). `Ok(None)` means help
/// was requested.
fn parse_args<I>(args: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut path = None;
    let mut options = ConvertOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            // Single-dash -path is accepted as well.
            "-path" | "--path" => {
                let value = args.next().context("missing value for --path")?;
                path = Some(value);
            }
            "--buffer-size" => {
                let value = args.next().context("missing value for --buffer-size")?;
                options.buffer_size = value
                    .parse()
                    .with_context(|| format!("invalid buffer size {value:?}"))?;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => bail!("unknown flag {flag}"),
            _ => {
                if path.is_some() {
                    bail!("more than one input path given");
                }
                path = Some(arg);
            }
        }
    }

    match path {
        Some(path) if !path.is_empty() => Ok(Some(Args { path, options })),
        _ => bail!("you must give the path of the FLAC file to convert"),
    }
}

/// Replace a leading `~/` with the user's home directory.
fn expand_home(path: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = match path.strip_prefix("~/") {
        Some(rest) => rest,
        None if path == "~" => "",
        None => return Ok(PathBuf::from(path)),
    };
    let home = home.context("failed to get the user home directory")?;
    Ok(home.join(rest))
}

fn run() -> Result<Option<PathBuf>> {
    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(None);
    };

    let dirs = BaseDirs::new();
    let source = expand_home(&args.path, dirs.as_ref().map(BaseDirs::home_dir))?;
    let output = output_path_for(&source);

    let summary = convert_file(&source, &output, &args.options)
        .with_context(|| format!("unable to convert {}", source.display()))?;
    info!(
        "wrote {} samples per channel ({}ch, {}Hz, {}bit)",
        summary.frames_per_channel,
        summary.format.channels,
        summary.format.sample_rate,
        summary.bits_per_sample
    );
    Ok(Some(output))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(Some(output)) => {
            println!("FLAC file converted to {}", output.display());
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("flactowav: {e:#}");
            eprintln!("{USAGE}");
            ExitCode::FAILURE
        }
    }
}
