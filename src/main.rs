use anyhow::{anyhow, Context, Result as AnyhowResult};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use trust::app::{Editor, Response};
use trust::config::Config;
use trust::config_io::DirectoryContext;
use trust::services::recovery::{RecoveryService, RecoveryStorage};
use trust::services::time_source::RealTimeSource;
use trust::services::{log_dirs, signal_handler, terminal_modes, tracing_setup};
use trust::view::reader::{LineSource, PlainReader, ReadOutcome, ReaderContext, TerminalReader};
use trust::view::render::Renderer;
use trust::view::theme::Theme;

/// Exit status when the editor cannot start.
const EXIT_STARTUP_FAILURE: u8 = 2;

/// A command-driven line editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "trust")]
#[command(about = "A command-driven line editor for the terminal", long_about = None)]
#[command(version)]
struct Args {
    /// File to open at startup
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Path to a config file (any error in it is fatal)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for editor diagnostics
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with this theme instead of the configured one
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Disable recovery snapshots for this session
    #[arg(long)]
    no_recovery: bool,
}

/// Everything the main loop needs, built by `initialize_app`.
struct SetupState {
    editor: Editor,
    reader: Box<dyn LineSource>,
    renderer: Renderer,
    file: Option<PathBuf>,
}

fn initialize_app(args: &Args) -> AnyhowResult<SetupState> {
    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("warning: could not open log file {}", log_file.display());
    }

    // Clean up stale log files from dead processes on startup
    log_dirs::cleanup_stale_logs();

    tracing::info!("Editor starting");

    signal_handler::install_signal_handlers();
    tracing::info!("Signal handlers installed");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine config directory")?;

    let mut config = match &args.config {
        Some(path) => Config::load_explicit(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_user(&dir_context),
    };
    if let Some(name) = &args.theme {
        let theme = Theme::from_name(name).ok_or_else(|| anyhow!("unknown theme: {name}"))?;
        config.theme = theme.name().to_string();
    }

    let time_source = RealTimeSource::shared();
    let mut editor = Editor::new(&config, dir_context.clone(), time_source.clone());

    if config.recovery.enabled && !args.no_recovery {
        let dir = dir_context
            .recovery_dir(&config)
            .context("No directory available for recovery snapshots")?;
        let storage = RecoveryStorage::with_dir(dir);
        storage.check_writable().with_context(|| {
            format!(
                "Recovery directory {} is not writable",
                storage.base_dir().display()
            )
        })?;
        tracing::info!("Recovery snapshots in {}", storage.base_dir().display());
        let interval = Duration::from_secs(config.recovery.auto_save_interval_secs);
        editor = editor.with_recovery(RecoveryService::new(storage, interval, time_source.now()));
    } else {
        tracing::info!("Recovery disabled");
    }

    let stdout_is_terminal = io::stdout().is_terminal();
    editor.set_color(config.editor.color && stdout_is_terminal);

    let reader: Box<dyn LineSource> = if io::stdin().is_terminal() {
        terminal_modes::probe_raw_mode().context("Terminal does not support raw mode")?;
        Box::new(TerminalReader::new(
            config.editor.history_limit,
            dir_context.home_dir.clone(),
            editor.painter(),
        ))
    } else {
        tracing::info!("stdin is not a terminal, reading plain lines");
        Box::new(PlainReader::new(io::stdin().lock()))
    };
    let renderer = Renderer::new(editor.painter(), stdout_is_terminal);

    Ok(SetupState {
        editor,
        reader,
        renderer,
        file: args.file.clone(),
    })
}

fn run_session(state: SetupState) -> AnyhowResult<()> {
    let SetupState {
        mut editor,
        mut reader,
        mut renderer,
        file,
    } = state;
    let mut out = io::stdout();

    renderer.response(&mut out, &editor.banner())?;
    if let Some(path) = file {
        match editor.open_path(&path) {
            Ok(response) => renderer.response(&mut out, &response)?,
            Err(e) => renderer.error(&mut out, Some("open"), &e)?,
        }
    }

    loop {
        if signal_handler::take_interrupt() {
            renderer.response(&mut out, &editor.interrupt())?;
        }
        let written = editor.tick();
        if written > 0 {
            tracing::debug!("Auto-saved {} recovery snapshot(s)", written);
        }

        let painter = editor.painter();
        renderer.set_painter(painter);
        reader.update_context(ReaderContext {
            names: editor.completion_names(),
            painter,
        });

        if let Some(status) = editor.status_line() {
            renderer.status(&mut out, &status)?;
        }
        let outcome = reader
            .read_line(&editor.prompt(), editor.read_mode())
            .context("Failed to read input")?;
        let line = match outcome {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                renderer.response(&mut out, &editor.interrupt())?;
                continue;
            }
            ReadOutcome::Eof => {
                tracing::info!("End of input");
                break;
            }
        };

        if dispatch_line(&mut editor, &mut renderer, &mut out, &line)? {
            break;
        }
    }

    editor.shutdown();
    renderer.goodbye(&mut out)?;
    tracing::info!("Editor exiting");
    Ok(())
}

/// Run one input line. Returns true when the editor should quit.
///
/// A SIGINT can land while a plain read is blocked; it belongs to the input
/// that was pending before this line, so it is applied first.
fn dispatch_line(
    editor: &mut Editor,
    renderer: &mut Renderer,
    out: &mut impl Write,
    line: &str,
) -> io::Result<bool> {
    if signal_handler::take_interrupt() {
        renderer.response(out, &editor.interrupt())?;
    }

    match editor.handle_line(line) {
        Ok(Response::Quit) => return Ok(true),
        Ok(response) => {
            renderer.set_painter(editor.painter());
            renderer.response(out, &response)?;
        }
        Err(e) => {
            tracing::debug!("Command failed: {}", e);
            renderer.error(out, editor.last_command(), &e)?;
        }
    }
    Ok(false)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let state = match initialize_app(&args) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Startup failed: {:#}", e);
            eprintln!("trust: {e:#}");
            return ExitCode::from(EXIT_STARTUP_FAILURE);
        }
    };

    match run_session(state) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            terminal_modes::emergency_cleanup();
            tracing::error!("Session failed: {:#}", e);
            eprintln!("trust: {e:#}");
            ExitCode::FAILURE
        }
    }
}
