use crate::Result;
use serialport::SerialPort;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Upper bound for a single blocking serial read. Longer waits are handled by the transport.
const READ_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default)]
pub struct ChannelConfig {
    pub device: String,
    /// Reconfigure the line at this rate. `None` keeps the current termios settings.
    pub baud: Option<u32>,
    pub timeout: Option<Duration>,
}

/// Open handle to the monitor console.
pub enum Channel {
    /// Line configured through `serialport`.
    Serial(Box<dyn SerialPort>),
    /// Plain read-write open; line settings are left as they are.
    Device(File),
}

impl Read for Channel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Channel::Serial(port) => port.read(buf),
            Channel::Device(file) => file.read(buf),
        }
    }
}

impl Write for Channel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Channel::Serial(port) => port.write(buf),
            Channel::Device(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Channel::Serial(port) => port.flush(),
            Channel::Device(file) => file.flush(),
        }
    }
}

/// Open the monitor console read-write. The device does not become the
/// controlling terminal of this process.
pub fn open_channel(config: &ChannelConfig) -> Result<Channel> {
    match config.baud {
        Some(baud) => {
            tracing::info!("opening {} at {} baud", config.device, baud);
            let port = serialport::new(&config.device, baud)
                .timeout(poll_interval(config.timeout))
                .open()?;
            Ok(Channel::Serial(port))
        }
        None => {
            tracing::info!("opening {} with current line settings", config.device);
            Ok(Channel::Device(open_device(&config.device)?))
        }
    }
}

fn poll_interval(timeout: Option<Duration>) -> Duration {
    timeout.map_or(READ_POLL_INTERVAL, |t| t.min(READ_POLL_INTERVAL))
}

#[cfg(unix)]
fn open_device(path: &str) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
}

#[cfg(not(unix))]
fn open_device(path: &str) -> io::Result<File> {
    OpenOptions::new().read(true).write(true).open(path)
}
