//! kubedraw - Draw the topology of a Kubernetes namespace
//!
//! Connects to a cluster through the local kubeconfig, lists the workloads
//! of one namespace, and writes a Graphviz diagram of how they relate.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kubedraw::diagram::DiagramBuilder;
use kubedraw::discovery::Discovery;
use kubedraw::kube::create_client;
use kubedraw::render::{self, Direction, RenderOptions};

/// kubedraw - Draw the topology of a Kubernetes namespace
#[derive(Parser, Debug)]
#[command(name = "kubedraw")]
#[command(about = "Draw the topology of a Kubernetes namespace as a Graphviz diagram", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Discover one namespace and write its diagram
    Diagram(DiagramArgs),
}

/// Options for the diagram command
#[derive(clap::Args, Debug)]
struct DiagramArgs {
    /// Namespace to draw
    #[arg(long, short = 'n', env = "KUBECTL_NAMESPACE", default_value = "default")]
    namespace: String,

    /// Path to the kubeconfig file (defaults to ~/.kube/config)
    #[arg(long, env = "KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Directory the diagram is written to
    #[arg(long, short = 'o', default_value = "diagrams")]
    output_dir: PathBuf,

    /// Artifact name, without the .dot extension
    #[arg(long, short = 'f', default_value = "k8s")]
    filename: String,

    /// Caption drawn under the diagram
    #[arg(long, default_value = "Kubernetes")]
    label: String,

    /// Minimum space between nodes of the same rank, in inches
    #[arg(long, default_value_t = 0.5)]
    nodesep: f64,
}

/// Initialize logging based on debug flag
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match args.command {
        Command::Diagram(diagram_args) => run_diagram(diagram_args).await,
    }
}

async fn run_diagram(args: DiagramArgs) -> Result<()> {
    tracing::debug!("Initializing Kubernetes client");
    let client = create_client(args.kubeconfig).await?;

    let store = Discovery::new(client).discover(&args.namespace).await?;
    let diagram = DiagramBuilder::build(&store, &args.namespace);

    let options = RenderOptions {
        output_dir: args.output_dir,
        filename: args.filename,
        label: args.label,
        direction: Direction::default(),
        nodesep: args.nodesep,
    };
    let path = render::render(&diagram, &options)?;
    tracing::info!("Diagram written to {}", path.display());

    Ok(())
}
