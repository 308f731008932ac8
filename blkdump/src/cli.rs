use anyhow::Result;
use blkdump_lib::{HexMode, LineEnding, PortConfig};
use clap::Parser;
use std::time::Duration;

use crate::config::{BlkdumpConfig, parse_prompt};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Dump bytes at the device cursor through its debug monitor",
    long_about = None
)]
pub struct Cli {
    /// Monitor console device
    pub device: String,

    /// Number of bytes to read, in hex (at most ffff)
    pub bytecount: String,

    /// JSON configuration file path
    #[arg(long = "config", short = 'f')]
    pub config: Option<String>,

    /// Reconfigure the line at this baud rate (default: keep current line settings)
    #[arg(short = 'b', long = "baud")]
    pub baud: Option<u32>,

    /// Give up when the monitor is silent for this many milliseconds (default: wait forever).
    /// Only effective together with a baud rate, plain device reads always block
    #[arg(long = "timeout")]
    pub timeout_ms: Option<u64>,

    /// Line terminator sent after each command (default: cr)
    #[arg(long = "line-ending", value_enum)]
    pub line_ending: Option<LineEnding>,

    /// The monitor does not echo typed commands
    #[arg(long = "no-echo")]
    pub no_echo: bool,

    /// Expected two character prompt, checked after `i=0`
    #[arg(long = "prompt")]
    pub prompt: Option<String>,

    /// How malformed hex pairs are handled (default: strict)
    #[arg(long = "hex-mode", value_enum)]
    pub hex_mode: Option<HexMode>,

    /// Write the dump to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    /// Suppress progress bar output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub baud: Option<u32>,
    pub port: PortConfig,
    pub hex_mode: HexMode,
    pub quiet: bool,
}

/// Merge CLI arguments with configuration file, CLI args take precedence
pub fn merge_config(args: &Cli, config: Option<BlkdumpConfig>) -> Result<MergedConfig> {
    let base_config = config.unwrap_or_else(BlkdumpConfig::with_defaults);

    let line_ending = match args.line_ending {
        Some(l) => l,
        None => base_config.parse_line_ending()?,
    };

    let prompt = match args.prompt.as_ref().or(base_config.prompt.as_ref()) {
        Some(p) => Some(parse_prompt(p)?),
        None => None,
    };

    let timeout = args
        .timeout_ms
        .or(base_config.timeout_ms)
        .map(Duration::from_millis);

    let hex_mode = match args.hex_mode {
        Some(m) => m,
        None => base_config.parse_hex_mode()?,
    };

    Ok(MergedConfig {
        baud: args.baud.or(base_config.baud),
        port: PortConfig {
            line_ending,
            echo: base_config.echo && !args.no_echo,
            prompt,
            timeout,
        },
        hex_mode,
        quiet: args.quiet || base_config.quiet,
    })
}
