use thiserror::Error;

/// Convenient result type for `blkdump-lib`.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serial(#[from] serialport::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("malformed hex pair {pair:?} at byte offset {offset:#x}")]
    MalformedHex { offset: usize, pair: String },

    #[error("timeout while {0}")]
    Timeout(String),

    #[error("channel closed while {0}")]
    ChannelClosed(String),
}

impl Error {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn channel_closed(msg: impl Into<String>) -> Self {
        Self::ChannelClosed(msg.into())
    }
}
