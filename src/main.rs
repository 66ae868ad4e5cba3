//! ownergraph - render the ownership lineage of a Kubernetes object
//!
//! Looks up an object's owner references, follows them up to the top-level
//! controller and prints the resulting graph in Graphviz DOT (or Mermaid or
//! JSON) on standard output.

use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ownergraph::cli::{self, ConfigSubcommand};
use ownergraph::config::ConfigLoader;
use ownergraph::lineage::{FailurePolicy, KubeObjectStore, LineageWalker};
use ownergraph::{GroupVersionResource, RenderFormat};

/// Render the ownership lineage of a Kubernetes object
#[derive(Parser, Debug)]
#[command(name = "ownergraph")]
#[command(about = "Render the ownership lineage of a Kubernetes object", long_about = None)]
struct Args {
    /// Path to the kubeconfig file (inferred when omitted)
    #[arg(long, global = true)]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[arg(long)]
    context: Option<String>,

    /// API group of the object (empty for the core group)
    #[arg(long, default_value = "")]
    group: String,

    /// API version of the object
    #[arg(long, default_value = "v1")]
    version: String,

    /// Resource collection of the object (plural, e.g. "pods")
    #[arg(long, default_value = "pods")]
    resource: String,

    /// Name of the object
    #[arg(long)]
    name: Option<String>,

    /// Namespace of the object (defaults to the configured namespace)
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<RenderFormat>,

    /// Name of the rendered graph
    #[arg(long)]
    graph_name: Option<String>,

    /// Keep going when an owner cannot be resolved, marking it in the graph
    #[arg(long)]
    skip_unresolved: bool,

    /// Do not expand owners beyond this depth (at least 1)
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_depth: Option<usize>,

    /// Configuration file (defaults to config.yaml in the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    cli::init_logging(args.verbose, args.log_file.as_deref())?;

    match args.command {
        Some(Command::Config { subcommand }) => {
            return cli::handle_config_command(subcommand, args.config.as_deref());
        }
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        None => {}
    }

    let name = args
        .name
        .context("--name is required to choose the object to trace")?;

    // Command-line flags override the config file and environment
    let config =
        ConfigLoader::load(args.config.as_deref()).context("Failed to load configuration")?;
    let namespace = args.namespace.unwrap_or(config.default_namespace.clone());
    let kubeconfig = args.kubeconfig.or(config.kubeconfig.clone());
    let context = args.context.or(config.context.clone());
    let format = args.format.unwrap_or(config.output.format);
    let graph_name = args.graph_name.unwrap_or(config.output.graph_name.clone());

    let mut options = config.traversal.walk_options();
    if args.skip_unresolved {
        options.on_error = FailurePolicy::SkipBranch;
    }
    if args.max_depth.is_some() {
        options.max_depth = args.max_depth;
    }

    tracing::debug!("Initializing Kubernetes client");
    let client = ownergraph::kube::create_client(kubeconfig.as_deref(), context.as_deref()).await?;

    tracing::debug!("Discovering API types");
    let catalog = ownergraph::kube::discover_types(&client).await?;

    let start = catalog.object_ref(
        GroupVersionResource::new(args.group, args.version, args.resource),
        &namespace,
        &name,
    );
    tracing::info!("Tracing owners of {}", start);

    let store = KubeObjectStore::new(client);
    let walker = LineageWalker::new(&catalog, &store, options);
    let graph = walker
        .walk(&start)
        .await
        .with_context(|| format!("Failed to resolve the lineage of {}", start))?;

    tracing::info!(
        "Lineage has {} nodes and {} edges",
        graph.nodes().len(),
        graph.edges().len()
    );

    let diagram = graph
        .render(format, &graph_name)
        .context("Failed to render graph")?;
    println!("{}", diagram);

    Ok(())
}
