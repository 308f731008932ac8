//! Decoding of the hex pairs the monitor prints while the read loop runs.

use crate::progress::{ProgressCallback, ProgressHandler};
use crate::script::ByteCount;
use crate::transport::{MonitorTransport, PROMPT_LEN};
use crate::utils::Utils;
use crate::{Error, Result};
use std::io::Write;
use strum::{Display, EnumString};

/// How a pair that is not two hex digits is handled.
#[derive(EnumString, Display, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
pub enum HexMode {
    /// Fail with [`Error::MalformedHex`].
    #[default]
    Strict,
    /// Convert whatever prefix parses, like `strtol`, and carry on.
    Lenient,
}

impl HexMode {
    fn convert(self, pair: [u8; 2], offset: usize) -> Result<u8> {
        match self {
            HexMode::Strict => Utils::hex_pair_to_u8(pair).ok_or_else(|| Error::MalformedHex {
                offset,
                pair: String::from_utf8_lossy(&pair).into_owned(),
            }),
            HexMode::Lenient => Ok(Utils::lenient_hex_to_u8(&pair)),
        }
    }
}

/// Read `count` hex pairs from the channel and write each decoded byte to `sink`
/// before reading the next one. The prompt that follows the loop is read and
/// dropped afterwards, so exactly `2 * count + 2` characters are consumed.
/// On error the prompt is not drained and the channel is left mid-reply.
pub fn decode<T, W>(
    channel: &mut T,
    count: ByteCount,
    sink: &mut W,
    mode: HexMode,
    progress: &dyn ProgressCallback,
) -> Result<usize>
where
    T: MonitorTransport + ?Sized,
    W: Write + ?Sized,
{
    let total = count.as_usize();
    let bar = ProgressHandler::bar(progress, total as u64, format!("Reading {} bytes...", count));

    let mut pair = [0u8; 2];
    for offset in 0..total {
        channel.read_exact(&mut pair)?;
        let byte = mode.convert(pair, offset)?;
        tracing::trace!("{:#06x}: {:?} -> {:#04x}", offset, String::from_utf8_lossy(&pair), byte);
        sink.write_all(&[byte])?;
        bar.inc(1);
    }

    let mut prompt = [0u8; PROMPT_LEN];
    channel.read_exact(&mut prompt)?;
    tracing::debug!("discarded prompt: {:?}", String::from_utf8_lossy(&prompt));

    bar.finish_with_message("Read complete");
    Ok(total)
}
