use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hostbridge::clipboard::copy_to_clipboard;
use hostbridge::script::run_script;
use hostbridge::{
    ArityPolicy, ClipboardFacade, ComputationFacade, Config, Dispatcher, FendEngine, Invocation,
    SystemClipboard, Target, Value,
};

#[derive(Parser)]
#[command(
    name = "hostbridge",
    version,
    about = "Drive a computation engine and the clipboard through stable facades"
)]
struct Cli {
    /// Config file (defaults to <config dir>/hostbridge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore calls with an unsupported argument count instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Also copy printed markup to the clipboard
    #[arg(long, global = true)]
    copy: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate statements and print the current matrix as LaTeX
    Eval {
        #[arg(required = true)]
        statements: Vec<String>,
    },
    /// Evaluate a macro file and print the current matrix as LaTeX
    Macro { path: PathBuf },
    /// Fetch an array: NAME for markup, NAME ROWS COLS for a block
    Array {
        /// Statements evaluated first
        #[arg(short = 'w', long = "with")]
        setup: Vec<String>,
        args: Vec<String>,
    },
    /// Show the clipboard: no args, WIDTH HEIGHT, or WIDTH HEIGHT OFFSET
    Clipboard { args: Vec<String> },
    /// Run a JSON-lines invocation script ("-" reads stdin)
    Script { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hostbridge=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if cli.lenient {
        config.arity_policy = ArityPolicy::Lenient;
    }
    debug!(?config, "loaded config");

    let engine = FendEngine::with_markup(config.engine.markup);
    let clipboard = SystemClipboard::new().with_ellipsis(config.clipboard.ellipsis);
    let computation = ComputationFacade::new(&engine);
    let dispatcher = Dispatcher::new(computation, ClipboardFacade::new(&clipboard))
        .with_policy(config.arity_policy);

    match cli.command {
        Command::Eval { statements } => {
            for statement in &statements {
                computation.eval_expression(statement)?;
            }
            emit(&computation.matrix_to_markup()?, cli.copy)?;
        }
        Command::Macro { path } => {
            let path = path.to_str().context("macro path is not valid UTF-8")?;
            computation.eval_macro_file(path)?;
            emit(&computation.matrix_to_markup()?, cli.copy)?;
        }
        Command::Array { setup, args } => {
            for statement in &setup {
                computation.eval_expression(statement)?;
            }
            let invocation = Invocation::new(Target::Computation, "get_array", parse_args(&args));
            if let Some(value) = dispatcher.call(&invocation)? {
                emit(&format_value(&value)?, cli.copy)?;
            }
        }
        Command::Clipboard { args } => {
            let invocation =
                Invocation::new(Target::Clipboard, "show_clipboard", parse_args(&args));
            dispatcher.call(&invocation)?;
        }
        Command::Script { path } => {
            let stdout = std::io::stdout();
            let performed = if path.as_os_str() == "-" {
                run_script(&dispatcher, std::io::stdin().lock(), stdout.lock())?
            } else {
                let file = File::open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                run_script(&dispatcher, BufReader::new(file), stdout.lock())?
            };
            debug!(performed, "script finished");
        }
    }

    Ok(())
}

/// Numbers become numeric values, everything else text.
fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter()
        .map(|arg| match arg.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(arg.clone()),
        })
        .collect()
}

fn format_value(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Text(text) => Ok(text.clone()),
        other => Ok(serde_json::to_string(other)?),
    }
}

fn emit(text: &str, copy: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    if copy {
        copy_to_clipboard(text).context("failed to copy to clipboard")?;
    }
    Ok(())
}
