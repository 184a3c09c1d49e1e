use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use crossbeam_channel::bounded;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use fahhh::config::{ConfigStore, FileConfigStore};
use fahhh::error::AppResult;
use fahhh::host::stream::{self, StreamStats};
use fahhh::host::{Command, ConsoleNotifier, ConsoleStatusIndicator, Host, HostEvents, TracingOutputChannel};
use fahhh::paths::{default_storage_dir, executable_dir};
use fahhh::playback::{DetachedLauncher, PlaybackStrategy};
use fahhh::runner::run_wrapped;
use fahhh::{ActivationOptions, Session};

const LOG_TARGET_STARTUP: &str = "fahhh::startup";

#[derive(Parser)]
#[command(version, about = "Plays FAHHH! when your code breaks")]
struct Cli {
    /// Config file [default: <config dir>/fahhh/config.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing sound/fahhh_KcgAXfs.mp3 [default: next to the executable]
    #[arg(long, global = true)]
    install_root: Option<PathBuf>,

    /// Writable per-user directory [default: <data dir>/fahhh]
    #[arg(long, global = true)]
    storage_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command as a task and alert on failing tests or failure output
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Dispatch JSON-lines host events from an editor bridge
    Watch {
        /// Event file [default: stdin]
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// The host cannot observe raw terminal output
        #[arg(long)]
        no_terminal_data: bool,
    },
    /// Play the alert once
    Test,
    /// Enable or disable alerts
    Toggle,
    /// Show the config location and current settings
    Config,
}

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/fahhh/logs/fahhh.YYYY-MM-DD.log` and
/// mirrored to stderr, so stdout stays free for wrapped command output.
fn initialize_tracing() {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("fahhh").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "fahhh.log");

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(target: LOG_TARGET_STARTUP, "Log directory: {}", log_dir.display());
}

fn log_runtime_environment() {
    tracing::debug!(
        target: LOG_TARGET_STARTUP,
        "Starting fahhh v{} on {} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

fn open_config(cli: &Cli) -> AppResult<FileConfigStore> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => FileConfigStore::default_path()?,
    };
    Ok(FileConfigStore::open(path))
}

/// Build the terminal host and activation options from the command line
fn build_host(cli: &Cli, with_terminal_data: bool) -> AppResult<(Host, ActivationOptions)> {
    let install_root = match &cli.install_root {
        Some(root) => root.clone(),
        None => executable_dir().context("Could not locate the install directory")?,
    };
    let storage_root = cli.storage_root.clone().unwrap_or_else(default_storage_dir);

    let host = Host {
        config: Arc::new(open_config(cli)?),
        output: Arc::new(TracingOutputChannel),
        status: Arc::new(ConsoleStatusIndicator::new()),
        notifier: Arc::new(ConsoleNotifier),
        launcher: Arc::new(DetachedLauncher),
        events: HostEvents::new(with_terminal_data),
    };

    let options = ActivationOptions {
        install_root,
        storage_root,
        strategy: PlaybackStrategy::current(),
    };

    Ok((host, options))
}

fn activate(cli: &Cli, with_terminal_data: bool) -> AppResult<Session> {
    let (host, options) = build_host(cli, with_terminal_data)?;
    Session::activate(host, options).context("Activation failed")
}

/// `fahhh run -- <command...>`
fn run_command(cli: &Cli, command: &[String]) -> AppResult<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow!("No command given"))?;

    let (host, options) = build_host(cli, true)?;
    let events = host.events.clone();
    let mut session = Session::activate(host, options).context("Activation failed")?;

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    let dispatcher = thread::Builder::new()
        .name("fahhh-dispatch".to_string())
        .spawn(move || {
            session.run(&shutdown_rx);
            session.deactivate();
        })
        .context("Failed to start dispatch thread")?;

    let status = run_wrapped(&events, program, args);
    drop(shutdown_tx);

    dispatcher
        .join()
        .map_err(|_| anyhow!("Dispatch thread panicked"))?;

    let status = status.with_context(|| format!("Failed to run {}", program))?;
    Ok(status.code().unwrap_or(1))
}

/// `fahhh watch [--input FILE]`
fn watch(cli: &Cli, input: Option<PathBuf>, no_terminal_data: bool) -> AppResult<()> {
    let (host, options) = build_host(cli, !no_terminal_data)?;
    let events = host.events.clone();
    let mut session = Session::activate(host, options).context("Activation failed")?;

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    let reader = thread::Builder::new()
        .name("fahhh-host-events".to_string())
        .spawn(move || -> AppResult<StreamStats> {
            let result = match input {
                Some(path) => {
                    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
                    stream::pump(BufReader::new(file), &events)
                }
                None => stream::pump(std::io::stdin().lock(), &events),
            };
            let _ = shutdown_tx.send(());
            Ok(result?)
        })
        .context("Failed to start event reader")?;

    session.run(&shutdown_rx);
    session.deactivate();

    let stats = reader
        .join()
        .map_err(|_| anyhow!("Event reader panicked"))??;
    tracing::info!("Host stream ended: {} events, {} skipped", stats.dispatched, stats.skipped);
    Ok(())
}

fn run_single(cli: &Cli, command: Command) -> AppResult<()> {
    let mut session = activate(cli, false)?;
    session.execute(command);
    session.deactivate();
    Ok(())
}

fn show_config(cli: &Cli) -> AppResult<()> {
    let store = open_config(cli)?;
    let settings = store.settings();

    println!("Config file: {}", store.path().display());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    println!("Playback: {}", PlaybackStrategy::current().description());
    Ok(())
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();

    initialize_tracing();
    log_runtime_environment();

    match &cli.command {
        Commands::Run { command } => {
            let code = run_command(&cli, command)?;
            std::process::exit(code);
        }
        Commands::Watch { input, no_terminal_data } => watch(&cli, input.clone(), *no_terminal_data),
        Commands::Test => run_single(&cli, Command::Test),
        Commands::Toggle => run_single(&cli, Command::Toggle),
        Commands::Config => show_config(&cli),
    }
}
