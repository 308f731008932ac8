use anyhow::{Context, Result, bail};
use blkdump_lib::{HexMode, LineEnding};
use blkdump_lib::transport::PROMPT_LEN;
use serde::{Deserialize, Serialize};

/// 应用程序的默认配置值
pub struct Defaults;

impl Defaults {
    pub const LINE_ENDING: &'static str = "cr";
    pub const ECHO: bool = true;
    pub const HEX_MODE: &'static str = "strict";
}

/// JSON 配置文件的根结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BlkdumpConfig {
    /// 设置后按该波特率重新配置串口，缺省时保持当前线路设置
    #[serde(default)]
    pub baud: Option<u32>,
    /// 读超时（毫秒），缺省时无限等待
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_line_ending")]
    pub line_ending: String,
    #[serde(default = "default_echo")]
    pub echo: bool,
    /// 两个字符的提示符，例如 "> "
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default = "default_hex_mode")]
    pub hex_mode: String,
    #[serde(default)]
    pub quiet: bool,
}

fn default_line_ending() -> String {
    Defaults::LINE_ENDING.to_string()
}
fn default_echo() -> bool {
    Defaults::ECHO
}
fn default_hex_mode() -> String {
    Defaults::HEX_MODE.to_string()
}

impl Default for BlkdumpConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl BlkdumpConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: BlkdumpConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_defaults() -> Self {
        Self {
            baud: None,
            timeout_ms: None,
            line_ending: Defaults::LINE_ENDING.to_string(),
            echo: Defaults::ECHO,
            prompt: None,
            hex_mode: Defaults::HEX_MODE.to_string(),
            quiet: false,
        }
    }

    pub fn parse_line_ending(&self) -> Result<LineEnding> {
        self.line_ending
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid line ending: {}", self.line_ending))
    }

    pub fn parse_hex_mode(&self) -> Result<HexMode> {
        self.hex_mode
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid hex mode: {}", self.hex_mode))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        self.parse_line_ending()?;
        self.parse_hex_mode()?;
        if let Some(ref prompt) = self.prompt {
            parse_prompt(prompt)?;
        }
        if self.baud == Some(0) {
            bail!("Baud rate must be non-zero");
        }
        Ok(())
    }
}

pub fn parse_prompt(prompt: &str) -> Result<[u8; PROMPT_LEN]> {
    prompt.as_bytes().try_into().map_err(|_| {
        anyhow::anyhow!(
            "Prompt {:?} must be exactly {} characters",
            prompt,
            PROMPT_LEN
        )
    })
}
