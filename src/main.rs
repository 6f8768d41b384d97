use devscout::cli::{
    CliArgs, Commands, ConfigArgs, OutputFormat, OutputFormatter, ScanArgs, ScanReport,
};
use devscout::config::DevscoutConfig;
use devscout::scan::{ContentResolver, ScanRequest};
use devscout::util::{init_logging, parse_level, LoggingConfig};
use devscout::{NAME, VERSION};

use clap::Parser;
use std::env;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Scan(scan_args) => handle_scan(scan_args, args.quiet).await,
        Commands::Config(config_args) => handle_config(config_args),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        env::var("DEVSCOUT_LOG_LEVEL")
            .map(|v| parse_level(&v))
            .unwrap_or(Level::INFO)
    };

    let use_json = env::var("DEVSCOUT_LOG_JSON")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);

    init_logging(LoggingConfig {
        level,
        use_json,
        ..LoggingConfig::default()
    });
}

async fn handle_scan(args: &ScanArgs, quiet: bool) -> i32 {
    let default_config = DevscoutConfig::default();
    let config = DevscoutConfig {
        registry_url: args
            .registry
            .clone()
            .unwrap_or(default_config.registry_url),
        request_timeout_secs: args.timeout.unwrap_or(default_config.request_timeout_secs),
        git_token: args.token.clone().or(default_config.git_token),
        ..default_config
    };

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your environment variables and command-line arguments.");
        return 1;
    }

    let root = match args.path.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            error!("Repository path {} is not accessible: {}", args.path.display(), e);
            return 1;
        }
    };
    if !root.is_dir() {
        error!("Repository path is not a directory: {}", root.display());
        return 1;
    }

    let mut request = ScanRequest::new(&root, &config.registry_url)
        .with_context_prefix(&args.context);
    if let Some(source_url) = &args.source_url {
        request = request.with_source(source_url, &args.revision);
    }
    if let Some(token) = &config.git_token {
        request = request.with_auth_token(token);
    }

    let resolver = match ContentResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Failed to initialize: {:#}", e);
            return 1;
        }
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = if args.single {
        tokio::select! {
            _ = cancel.cancelled() => Err(devscout::ScanError::Cancelled),
            result = resolver.analyze_path(&request) => result,
        }
    } else {
        resolver.scan_with_cancel(&request, &cancel).await
    };

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!("Scan failed: {}", e);
            eprintln!("\n{}", e.help_message());
            return 1;
        }
    };

    let report = ScanReport::new(root.display().to_string(), &result);
    let format: OutputFormat = args.format.into();
    let output = match OutputFormatter::new(format).format(&report) {
        Ok(out) => out,
        Err(e) => {
            error!("Failed to format output: {}", e);
            return 1;
        }
    };

    if let Some(output_file) = &args.output {
        match std::fs::write(output_file, &output) {
            Ok(_) => {
                info!("Output written to: {}", output_file.display());
                if !quiet {
                    println!("Output written to: {}", output_file.display());
                }
            }
            Err(e) => {
                error!("Failed to write output to file: {}", e);
                return 1;
            }
        }
    } else {
        println!("{}", output);
    }

    0
}

fn handle_config(args: &ConfigArgs) -> i32 {
    let config = DevscoutConfig::default();
    if let Err(e) = config.validate() {
        eprintln!("Warning: {}", e);
    }

    match OutputFormatter::new(args.format.into()).format_config(&config) {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("Failed to format configuration: {}", e);
            1
        }
    }
}
