use crate::{Error, Result};
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};
use strum::{Display, EnumString};

/// Length of the prompt the monitor prints once a command has finished.
pub const PROMPT_LEN: usize = 2;

/// Line terminator appended to every command.
#[derive(EnumString, Display, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[strum(serialize_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Cr,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            LineEnding::Cr => b"\r",
            LineEnding::Lf => b"\n",
            LineEnding::Crlf => b"\r\n",
        }
    }
}

/// Framing options for a monitor console.
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub line_ending: LineEnding,
    /// The monitor echoes every typed line back, terminated by `\n`.
    pub echo: bool,
    /// Expected prompt. When unset the prompt characters are discarded unchecked.
    pub prompt: Option<[u8; PROMPT_LEN]>,
    /// `None` blocks forever on a silent channel.
    pub timeout: Option<Duration>,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Cr,
            echo: true,
            prompt: None,
            timeout: None,
        }
    }
}

/// Command channel to the monitor.
pub trait MonitorTransport {
    /// Send a statement and wait until the monitor prompts again.
    fn send_literal(&mut self, command: &str) -> Result<()>;

    /// Send a fully rendered command whose output is read by the caller.
    fn send_formatted(&mut self, command: &str) -> Result<()>;

    /// Block until `buf` is filled from the channel.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// [`MonitorTransport`] over any byte stream, usually a serial port.
pub struct MonitorPort<P> {
    port: P,
    config: PortConfig,
}

impl<P: Read + Write> MonitorPort<P> {
    pub fn new(port: P, config: PortConfig) -> Self {
        Self { port, config }
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    fn write_command(&mut self, command: &str) -> Result<()> {
        tracing::debug!("command: {:?}", command);
        self.port.write_all(command.as_bytes())?;
        self.port.write_all(self.config.line_ending.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }

    /// 丢弃命令回显，直到换行符
    fn skip_echo(&mut self) -> Result<()> {
        if !self.config.echo {
            return Ok(());
        }

        let mut echo = Vec::new();
        loop {
            let mut byte = [0u8; 1];
            self.read_exact_with_timeout(&mut byte, "command echo")?;
            if byte[0] == b'\n' {
                break;
            }
            echo.push(byte[0]);
        }
        tracing::trace!("echo: {:?}", String::from_utf8_lossy(&echo));
        Ok(())
    }

    fn wait_for_prompt(&mut self) -> Result<()> {
        let mut prompt = [0u8; PROMPT_LEN];
        self.read_exact_with_timeout(&mut prompt, "prompt")?;
        tracing::debug!("prompt: {:?}", String::from_utf8_lossy(&prompt));

        if let Some(expected) = self.config.prompt
            && prompt != expected
        {
            return Err(Error::protocol(format!(
                "expected prompt {:?}, got {:?}",
                String::from_utf8_lossy(&expected),
                String::from_utf8_lossy(&prompt)
            )));
        }
        Ok(())
    }

    fn read_exact_with_timeout(&mut self, buf: &mut [u8], context: &str) -> Result<()> {
        let mut offset = 0;
        let mut last_activity = Instant::now();

        while offset < buf.len() {
            match self.port.read(&mut buf[offset..]) {
                Ok(0) => return Err(Error::channel_closed(format!("reading {}", context))),
                Ok(n) => {
                    offset += n;
                    last_activity = Instant::now();
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    if let Some(timeout) = self.config.timeout
                        && last_activity.elapsed() > timeout
                    {
                        return Err(Error::timeout(format!("waiting for {}", context)));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

impl<P: Read + Write> MonitorTransport for MonitorPort<P> {
    fn send_literal(&mut self, command: &str) -> Result<()> {
        self.write_command(command)?;
        self.skip_echo()?;
        self.wait_for_prompt()
    }

    fn send_formatted(&mut self, command: &str) -> Result<()> {
        self.write_command(command)?;
        self.skip_echo()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read_exact_with_timeout(buf, "monitor output")
    }
}
