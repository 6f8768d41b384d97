use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Devfile and Dockerfile discovery for monorepo components
#[derive(Parser, Debug)]
#[command(
    name = "devscout",
    about = "Devfile and Dockerfile discovery for monorepo components",
    version,
    author,
    long_about = "devscout looks at every component directory of a repository and reports \
                  which devfile and which Dockerfile represent it. Components without either \
                  are matched against the samples of a devfile registry."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Scan a repository for devfiles and Dockerfiles",
        long_about = "Treats every immediate sub-directory of PATH as one component and \
                      resolves its devfile, Dockerfile and exposed ports.\n\n\
                      Examples:\n  \
                      devscout scan .\n  \
                      devscout scan . --source-url https://github.com/org/repo --revision main\n  \
                      devscout scan ./service --single --format json"
    )]
    Scan(ScanArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ScanArgs {
    #[arg(value_name = "PATH", help = "Path to the repository checkout")]
    pub path: PathBuf,

    #[arg(
        long,
        value_name = "URL",
        help = "Hosted repository URL used to link discovered devfiles"
    )]
    pub source_url: Option<String>,

    #[arg(
        long,
        value_name = "REV",
        default_value = "",
        help = "Revision for devfile links (defaults to main)"
    )]
    pub revision: String,

    #[arg(
        long,
        value_name = "TOKEN",
        help = "Token for private repositories (defaults to DEVSCOUT_GIT_TOKEN)"
    )]
    pub token: Option<String>,

    #[arg(
        long,
        value_name = "URL",
        help = "Devfile registry URL (defaults to DEVSCOUT_REGISTRY_URL)"
    )]
    pub registry: Option<String>,

    #[arg(
        long,
        value_name = "PREFIX",
        default_value = "",
        help = "Path of PATH inside the repository, prepended to component contexts"
    )]
    pub context: String,

    #[arg(long, help = "Treat PATH itself as a single component")]
    pub single: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECONDS",
        help = "HTTP request timeout in seconds (defaults to DEVSCOUT_REQUEST_TIMEOUT)"
    )]
    pub timeout: Option<u64>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
