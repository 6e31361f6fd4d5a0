//! Shellgate Daemon - device-side remote shell agent.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shellgate::config::Config;
use shellgate::daemon::Supervisor;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_PKG_NAME");

/// Default path of the main configuration file.
const DEFAULT_CONFIG_FILE: &str = "/etc/shellgate/shellgate.conf";
/// Default path of the fallback configuration file.
const DEFAULT_FALLBACK_CONFIG_FILE: &str = "/var/lib/shellgate/shellgate.conf";

struct RunOptions {
    config: String,
    fallback_config: String,
}

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let options = get_run_options(&args);

    init_logging();

    info!("Starting {} v{}", NAME, VERSION);
    info!("Configuration file: {}", options.config);
    info!("Fallback configuration file: {}", options.fallback_config);

    // Load and validate the configuration. Any fatal condition here aborts
    // before the daemon is ever constructed.
    let mut config = match Config::load(
        Path::new(&options.config),
        Path::new(&options.fallback_config),
    ) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    // Run the supervised daemon; its terminal outcome is the process result.
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    let supervisor = Supervisor::new(config);
    match runtime.block_on(supervisor.run()) {
        Ok(()) => {
            info!("Daemon stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Daemon failed");
            ExitCode::FAILURE
        }
    }
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Device-side remote shell agent daemon.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -c, --config <PATH>             Path to the main configuration file
                                    [default: {}]
        --fallback-config <PATH>    Path to the fallback configuration file
                                    [default: {}]
    -h, --help                      Print help information
    -V, --version                   Print version information
"#,
        NAME, VERSION, NAME, DEFAULT_CONFIG_FILE, DEFAULT_FALLBACK_CONFIG_FILE
    );
}

/// Get configuration file paths from command line arguments.
fn get_run_options(args: &[String]) -> RunOptions {
    RunOptions {
        config: get_flag(args, "--config", "-c").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
        fallback_config: get_flag(args, "--fallback-config", "")
            .unwrap_or_else(|| DEFAULT_FALLBACK_CONFIG_FILE.to_string()),
    }
}

/// Look up a `--flag value` or `--flag=value` argument.
fn get_flag(args: &[String], long: &str, short: &str) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if (arg == long || (!short.is_empty() && arg == short)) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(&format!("{}=", long)) {
            return Some(value.to_string());
        }
    }
    None
}

/// Initialize logging.
///
/// The level can be overridden through the conventional environment filter;
/// the default is info.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .init();
}
