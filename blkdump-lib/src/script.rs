//! Command synthesis for the monitor's loop language.

use crate::{Error, Result};
use std::fmt;
use std::num::NonZeroU16;
use strum::Display;

/// Number of bytes to pull out of the device in one session.
///
/// The loop bound is rendered as a four digit hex literal, so only
/// `1..=0xFFFF` can be expressed. Zero never reaches the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteCount(NonZeroU16);

impl ByteCount {
    pub const MAX: u32 = u16::MAX as u32;

    pub fn get(self) -> u16 {
        self.0.get()
    }

    pub fn as_usize(self) -> usize {
        self.0.get() as usize
    }
}

impl TryFrom<u32> for ByteCount {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        if value > Self::MAX {
            return Err(Error::invalid_input(format!(
                "byte count {:#x} exceeds the monitor loop limit of {:#x}",
                value,
                Self::MAX
            )));
        }
        NonZeroU16::new(value as u16)
            .map(ByteCount)
            .ok_or_else(|| Error::invalid_input("byte count must be non-zero"))
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0.get())
    }
}

/// Statements understood by the monitor.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    #[strum(to_string = "i=0")]
    ResetCounter,

    /// Read `count` bytes at the cursor, each printed as a hex pair.
    #[strum(to_string = "while i<0x{count:04x} getb:puth a:i=i+1")]
    ReadLoop { count: u16 },
}

/// The two commands sent for one dump, in transmission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandScript {
    pub init: String,
    pub read_loop: String,
}

/// Build the command script that makes the monitor print `count` bytes.
pub fn synthesize(count: ByteCount) -> CommandScript {
    CommandScript {
        init: MonitorCommand::ResetCounter.to_string(),
        read_loop: MonitorCommand::ReadLoop { count: count.get() }.to_string(),
    }
}
