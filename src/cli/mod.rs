pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, OutputFormatArg, ScanArgs};
pub use output::{ComponentReport, OutputFormat, OutputFormatter, ScanReport};
