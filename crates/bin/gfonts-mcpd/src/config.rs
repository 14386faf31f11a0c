use clap::{Parser, builder::BoolishValueParser};
use gfonts_core::layout::DataLayout;
use gfonts_mcp::server::Transports;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ROOT: &str = ".";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

#[derive(Parser, Debug)]
#[command(name = "gfonts-mcpd", version, about = "Google Fonts and icons MCP daemon.")]
struct CliArgs {
    /// Data root holding the store built by `gfonts-etl build-db`.
    #[arg(long, env = "GFONTS_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Store file; defaults to `google_fonts.sqlite` under the data root.
    #[arg(long, env = "GFONTS_DB_PATH")]
    db_path: Option<PathBuf>,

    #[arg(
        long = "stdio",
        env = "GFONTS_ENABLE_STDIO",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long = "http",
        env = "GFONTS_MCP_SERVE",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long = "http-addr", env = "GFONTS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct McpdConfig {
    pub db_path: PathBuf,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl McpdConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }

    pub const fn transports(&self) -> Transports {
        Transports {
            stdio: self.enable_stdio,
            http: if self.mcp_serve { Some(self.mcp_http_addr) } else { None },
        }
    }
}

impl TryFrom<CliArgs> for McpdConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.enable_stdio && !args.mcp_serve {
            return Err(ConfigError::InvalidSetting {
                name: "GFONTS_ENABLE_STDIO",
                value: "false (no transport enabled)".to_string(),
            });
        }

        let db_path = match args.db_path {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::MissingSetting("GFONTS_DB_PATH"));
            }
            Some(path) => path,
            None => DataLayout::new(args.root).database(),
        };

        Ok(Self {
            db_path,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
        })
    }
}
