use actiongraph::prelude::*;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Build and render dependency graphs of ResWare action lists
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the records: a JSON table dump, or a `.bin` snapshot
    #[arg(short, long)]
    records: String,

    /// The action list to build
    #[arg(short, long, env = "ACTION_LIST_DEF_ID")]
    action_list: i64,

    /// Draw external trigger nodes and their edges
    #[arg(
        long,
        env = "INCLUDE_TRIGGERS",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    include_triggers: bool,

    /// Write the loaded records to a binary snapshot for faster reloads
    #[arg(long)]
    save_snapshot: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the full action list
    Digraph {
        /// Only draw what is reachable from the file's root triggers
        #[arg(long)]
        reachable: bool,

        /// Output format; anything but dot is rendered by the Graphviz `dot` tool
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,
    },
    /// Render a single group, with affects into and out of it
    Group {
        /// The group's ActionListGroupDefID
        id: i64,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
        format: OutputFormat,
    },
    /// Print the built action list as JSON
    Json,
    /// Print a plain-text summary of the action list
    Describe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Dot,
    Svg,
    Png,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    // --- 1. Loading ---
    let load_start = Instant::now();
    let records = load_records(&cli.records)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load '{}': {}", cli.records, e)));
    tracing::debug!(elapsed = ?load_start.elapsed(), "Loaded records");

    if let Some(path) = &cli.save_snapshot {
        records
            .save_snapshot(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save snapshot: {}", e)));
        tracing::info!(path = %path, "Saved records snapshot");
    }

    // --- 2. Building ---
    let build_start = Instant::now();
    let graph = GraphBuilder::new(&records)
        .build(cli.action_list)
        .unwrap_or_else(|e| exit_with_error(&format!("Build failed: {}", e)));
    tracing::debug!(elapsed = ?build_start.elapsed(), "Built graph");

    // --- 3. Output ---
    match cli.command {
        Commands::Digraph { reachable, format } => {
            let options = DigraphOptions {
                include_triggers: cli.include_triggers,
                scope: if reachable {
                    Scope::DefaultRoots
                } else {
                    Scope::Everything
                },
            };
            write_diagram(&render_action_list(&graph, &options), format);
        }
        Commands::Group { id, format } => {
            let group = graph
                .context
                .lookup_group(id)
                .unwrap_or_else(|| exit_with_error(&format!("Group {} does not exist", id)));
            write_diagram(&render_group(&graph, group, cli.include_triggers), format);
        }
        Commands::Json => {
            let json = ActionListDump::new(&graph)
                .to_json()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize: {}", e)));
            println!("{}", json);
        }
        Commands::Describe => print!("{}", describe(&graph)),
    }
}

/// Logs go to stderr so stdout only carries the diagram, JSON or summary.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_records(path: &str) -> std::result::Result<Records, RecordError> {
    if path.ends_with(".bin") {
        Records::from_snapshot(path)
    } else {
        Records::load(&JsonDump::from_file(path)?)
    }
}

fn write_diagram(dot: &str, format: OutputFormat) {
    let bytes = match format {
        OutputFormat::Dot => dot.as_bytes().to_vec(),
        OutputFormat::Svg => run_graphviz(dot, "svg"),
        OutputFormat::Png => run_graphviz(dot, "png"),
    };
    io::stdout()
        .write_all(&bytes)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write output: {}", e)));
}

/// Pipes dot text through the Graphviz `dot` tool and returns what it renders.
fn run_graphviz(dot: &str, format: &str) -> Vec<u8> {
    let mut child = Command::new("dot")
        .arg(format!("-T{}", format))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to run Graphviz 'dot': {}", e)));

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(dot.as_bytes())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to write to 'dot': {}", e)));
    }
    let output = child
        .wait_with_output()
        .unwrap_or_else(|e| exit_with_error(&format!("Graphviz 'dot' failed: {}", e)));
    if !output.status.success() {
        exit_with_error(&format!("Graphviz 'dot' exited with {}", output.status));
    }
    output.stdout
}

/// Prints an error message to stderr and exits the process.
fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
