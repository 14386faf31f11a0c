use clap::{Parser, Subcommand, builder::BoolishValueParser};
use gfonts_core::layout::DataLayout;
use gfonts_core::store::{FontFilter, IconFilter};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_ROOT: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "gfonts-etl", version, about = "Google Fonts and icons catalog pipeline.")]
struct CliArgs {
    /// Data root holding the catalogs, tag files, and icon assets.
    #[arg(long, global = true, env = "GFONTS_ROOT", default_value = DEFAULT_ROOT)]
    root: PathBuf,

    /// Store file; defaults to `google_fonts.sqlite` under the data root.
    #[arg(long, global = true, env = "GFONTS_DB_PATH")]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Download the font catalog to `google-fonts.json`
    FetchFonts {
        #[arg(long, env = "GOOGLE_FONTS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Override the catalog endpoint URL.
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Walk the icon asset tree and write `icons.json`
    CollectIcons,
    /// Rebuild the store from the catalogs and tag files
    BuildDb,
    /// Print font, variant, and icon counts
    Stats,
    /// Search fonts and print the matches as JSON
    SearchFonts {
        name: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = BoolishValueParser::new())]
        is_variable: Option<bool>,
    },
    /// Search icons and print the matches as JSON
    SearchIcons {
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
}

/// Validated pipeline step to run.
#[derive(Debug, Clone)]
pub enum EtlCommand {
    FetchFonts {
        api_key: String,
        endpoint: Option<String>,
    },
    CollectIcons,
    BuildDb,
    Stats,
    SearchFonts(FontFilter),
    SearchIcons(IconFilter),
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub layout: DataLayout,
    pub db_path: PathBuf,
    pub command: EtlCommand,
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

impl EtlConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for EtlConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let layout = DataLayout::new(args.root);
        let db_path = match args.db_path {
            Some(path) if path.as_os_str().is_empty() => {
                return Err(ConfigError::MissingSetting("GFONTS_DB_PATH"));
            }
            Some(path) => path,
            None => layout.database(),
        };

        let command = match args.command {
            CliCommand::FetchFonts { api_key, endpoint } => {
                let api_key = api_key
                    .filter(|value| !value.trim().is_empty())
                    .ok_or(ConfigError::MissingSetting("GOOGLE_FONTS_API_KEY"))?;
                let endpoint = endpoint.filter(|value| !value.trim().is_empty());
                if let Some(endpoint) = &endpoint
                    && !endpoint.starts_with("http://")
                    && !endpoint.starts_with("https://")
                {
                    return Err(ConfigError::InvalidSetting {
                        name: "endpoint",
                        value: endpoint.clone(),
                    });
                }
                EtlCommand::FetchFonts { api_key, endpoint }
            }
            CliCommand::CollectIcons => EtlCommand::CollectIcons,
            CliCommand::BuildDb => EtlCommand::BuildDb,
            CliCommand::Stats => EtlCommand::Stats,
            CliCommand::SearchFonts {
                name,
                tag,
                category,
                is_variable,
            } => EtlCommand::SearchFonts(FontFilter {
                name,
                tag,
                category,
                is_variable,
            }),
            CliCommand::SearchIcons { name, category } => {
                EtlCommand::SearchIcons(IconFilter { name, category })
            }
        };

        Ok(Self {
            layout,
            db_path,
            command,
        })
    }
}
