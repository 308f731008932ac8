mod cli;
mod config;
mod progress;
mod serial;

use anyhow::{Context, Result};
use blkdump_lib::utils::Utils;
use blkdump_lib::{ByteCount, ChannelConfig, DumpOptions, MonitorPort, dump, open_channel};
use clap::Parser;
use clap::error::ErrorKind;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

use crate::cli::{Cli, merge_config};
use crate::config::BlkdumpConfig;
use crate::progress::create_progress_callback;
use crate::serial::normalize_port_name;

fn run(args: Cli) -> Result<()> {
    let count = Utils::parse_byte_count(&args.bytecount)?;
    if count == 0 {
        // nothing to spit
        return Ok(());
    }
    // 在打开设备之前检查范围
    ByteCount::try_from(count)?;

    let config = args
        .config
        .as_deref()
        .map(BlkdumpConfig::from_file)
        .transpose()?;
    let merged = merge_config(&args, config)?;
    tracing::debug!("merged config: {:?}", merged);

    let channel = ChannelConfig {
        device: normalize_port_name(&args.device),
        baud: merged.baud,
        timeout: merged.port.timeout,
    };
    let port = open_channel(&channel)
        .with_context(|| format!("Failed to open {}", channel.device))?;
    let mut transport = MonitorPort::new(port, merged.port.clone());

    let mut sink: Box<dyn Write> = match args.output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let progress = create_progress_callback(merged.quiet);
    let options = DumpOptions {
        hex_mode: merged.hex_mode,
    };
    dump(
        &mut transport,
        count,
        &mut sink,
        &options,
        progress.as_ref(),
    )
    .context("Failed to read from monitor")?;

    Ok(())
}

/// Exit status for an argument error: help and version succeed, misuse exits 1.
fn parse_error_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn main() {
    // Log level can be controlled by setting the RUST_LOG environment variable, e.g.:
    // RUST_LOG=debug, RUST_LOG=blkdump_lib=trace, RUST_LOG=info
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(parse_error_exit_code(e.kind()));
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {:?}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(argv: &[&str]) -> Cli {
        Cli::try_parse_from(argv).unwrap()
    }

    fn exit_code_for(argv: &[&str]) -> i32 {
        let err = Cli::try_parse_from(argv).unwrap_err();
        parse_error_exit_code(err.kind())
    }

    #[test]
    fn wrong_argument_count_exits_one() {
        assert_eq!(exit_code_for(&["blkdump"]), 1);
        assert_eq!(exit_code_for(&["blkdump", "/dev/ttyS0"]), 1);
        assert_eq!(exit_code_for(&["blkdump", "/dev/ttyS0", "10", "extra"]), 1);
        assert_eq!(exit_code_for(&["blkdump", "--bogus", "/dev/ttyS0", "10"]), 1);
    }

    #[test]
    fn help_and_version_exit_zero() {
        assert_eq!(exit_code_for(&["blkdump", "--help"]), 0);
        assert_eq!(exit_code_for(&["blkdump", "--version"]), 0);
    }

    #[test]
    fn zero_count_exits_before_opening() {
        // the device does not exist; a zero count must never touch it
        let args = cli(&["blkdump", "/nonexistent/blkdump-device", "0"]);
        assert!(run(args).is_ok());

        let args = cli(&["blkdump", "/nonexistent/blkdump-device", "0x0"]);
        assert!(run(args).is_ok());
    }

    #[test]
    fn oversized_count_fails_before_opening() {
        let args = cli(&["blkdump", "/nonexistent/blkdump-device", "10000"]);
        let err = run(args).unwrap_err();
        let lib_err = err.downcast_ref::<blkdump_lib::Error>().unwrap();
        assert!(matches!(lib_err, blkdump_lib::Error::InvalidInput(_)));
    }

    #[test]
    fn non_hex_count_is_rejected() {
        let args = cli(&["blkdump", "/nonexistent/blkdump-device", "xyz"]);
        assert!(run(args).is_err());
    }
}
