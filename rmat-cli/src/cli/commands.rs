//! Command implementations and argument parsing for the rmat CLI.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use rmat_core::{
    DEFAULT_A, DEFAULT_B, DEFAULT_C, DEFAULT_NOISE, DEFAULT_SEED, RmatBuilder, RmatError,
    RmatGraph,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "rmat", about = "Generate directed R-MAT random graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a graph and print it.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Number of vertices; ids fall in `[0, vertex-count)`.
    #[arg(long = "vertex-count")]
    pub vertex_count: u64,

    /// Number of edges to generate.
    #[arg(long = "edge-count")]
    pub edge_count: u64,

    /// Likelihood of quadrant (0, 0).
    #[arg(long, default_value_t = DEFAULT_A)]
    pub a: f32,

    /// Likelihood of quadrant (0, 1).
    #[arg(long, default_value_t = DEFAULT_B)]
    pub b: f32,

    /// Likelihood of quadrant (1, 0).
    #[arg(long, default_value_t = DEFAULT_C)]
    pub c: f32,

    /// Enable per-bit noise with this magnitude, within `[0, 2]`.
    #[arg(long)]
    pub noise: Option<f32>,

    /// Base seed for the block generators.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Worker threads; defaults to one per core.
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// What to print.
    #[arg(long, value_enum, default_value_t = OutputFormat::Edges)]
    pub format: OutputFormat,
}

/// Output renderings supported by `generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `source<TAB>target` line per edge.
    Edges,
    /// Vertex, edge, scale and block counts.
    Summary,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Core configuration or generation failed.
    #[error(transparent)]
    Core(#[from] RmatError),
}

/// Outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Requested rendering.
    pub format: OutputFormat,
    /// Bit levels per edge.
    pub scale: u32,
    /// Number of blocks the edge budget was split into.
    pub blocks: u64,
    /// Base seed used.
    pub seed: u64,
    /// The generated graph.
    pub graph: RmatGraph,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration or generation fails.
///
/// # Examples
/// ```
/// use clap::Parser;
/// use rmat_cli::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["rmat", "generate", "--vertex-count", "8", "--edge-count", "20"]);
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.graph.edge_count(), 20);
/// # Ok::<(), rmat_cli::cli::CliError>(())
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(generate)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(vertex_count = command.vertex_count, edge_count = command.edge_count),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let (noise_enabled, noise) = command
        .noise
        .map_or((false, DEFAULT_NOISE), |magnitude| (true, magnitude));
    let mut builder = RmatBuilder::new(command.vertex_count, command.edge_count)
        .with_constants(command.a, command.b, command.c)
        .with_noise(noise_enabled, noise)
        .with_seed(command.seed);
    if let Some(threads) = command.parallelism {
        builder = builder.with_parallelism(threads);
    }
    let rmat = builder.build()?;

    let blocks = rmat.block_count();
    let graph = rmat.generate()?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        blocks,
        "command completed"
    );
    Ok(ExecutionSummary {
        format: command.format,
        scale: rmat.scale(),
        blocks,
        seed: rmat.seed(),
        graph,
    })
}

/// Renders `summary` to `writer` in the requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use rmat_cli::cli::{ExecutionSummary, OutputFormat, render_summary};
/// # use rmat_core::{Edge, RmatGraph};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     format: OutputFormat::Edges,
///     scale: 1,
///     blocks: 1,
///     seed: 0,
///     graph: RmatGraph::from_edges(vec![Edge::new(0, 1), Edge::new(1, 1)]),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "0\t1\n1\t1\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Edges => {
            for edge in summary.graph.edges() {
                writeln!(writer, "{}\t{}", edge.source(), edge.target())?;
            }
        }
        OutputFormat::Summary => {
            writeln!(writer, "vertices: {}", summary.graph.vertex_count())?;
            writeln!(writer, "edges: {}", summary.graph.edge_count())?;
            writeln!(writer, "scale: {}", summary.scale)?;
            writeln!(writer, "blocks: {}", summary.blocks)?;
            writeln!(writer, "seed: {}", summary.seed)?;
        }
    }
    Ok(())
}
