pub mod channel;
pub mod decode;
pub mod error;
pub mod progress;
pub mod script;
pub mod transport;
pub mod utils;

pub use channel::{Channel, ChannelConfig, open_channel};
pub use decode::{HexMode, decode};
pub use error::{Error, Result};
pub use script::{ByteCount, CommandScript, MonitorCommand, synthesize};
pub use transport::{LineEnding, MonitorPort, MonitorTransport, PortConfig};

use crate::progress::ProgressCallback;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct DumpOptions {
    pub hex_mode: HexMode,
}

/// Read `count` bytes at the device's current cursor and write them to `sink`.
///
/// A zero count returns immediately without sending anything.
pub fn dump<T, W>(
    transport: &mut T,
    count: u32,
    sink: &mut W,
    options: &DumpOptions,
    progress: &dyn ProgressCallback,
) -> Result<usize>
where
    T: MonitorTransport + ?Sized,
    W: Write + ?Sized,
{
    if count == 0 {
        tracing::debug!("nothing to read");
        return Ok(0);
    }
    let count = ByteCount::try_from(count)?;

    let script = synthesize(count);
    transport.send_literal(&script.init)?;
    transport.send_formatted(&script.read_loop)?;

    let written = decode(transport, count, sink, options.hex_mode, progress)?;
    sink.flush()?;
    tracing::info!("read {} bytes", written);
    Ok(written)
}
