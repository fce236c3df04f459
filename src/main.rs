use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use graph_landmarks::{
    ComponentSummary, DistanceOracle, Graph, Oracle, OracleKind, SelectionMethod, Settings,
    VertexId, estimate_characteristics, select_landmarks, split_graph, strong_components,
    weak_components,
};
use graph_landmarks::io::EdgeListFormat;

/// Graph Landmarks - component analysis and landmark distance estimation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Edge-list file, overrides `dataset.path`
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Treat edges as directed (`--directed=false` overrides the settings file)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    directed: Option<bool>,

    /// Read a third weight column
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    weighted: Option<bool>,

    /// First CSV row is a header
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    has_headers: Option<bool>,

    /// Edge-list format (whitespace, csv)
    #[arg(short, long, value_parser = parse_format)]
    format: Option<EdgeListFormat>,

    /// Seed for randomized steps
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize weak or strong components
    Components {
        /// Strong components instead of weak ones
        #[arg(long)]
        strong: bool,
    },
    /// Estimate degree, radius, diameter and distance percentile
    Characteristics {
        /// Number of sampled source vertices
        #[arg(long)]
        sample_size: Option<usize>,
    },
    /// Select landmarks on the largest weak component
    Landmarks(SelectionArgs),
    /// Answer approximate distance queries
    Distance {
        /// Oracle variant (basic, lca)
        #[arg(short, long)]
        oracle: Option<OracleKind>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Vertex pairs as `start:end`
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(VertexId, VertexId)>,
    },
    /// Print the effective settings
    Settings,
}

#[derive(Args)]
struct SelectionArgs {
    /// Number of landmarks
    #[arg(short = 'k', long)]
    count: Option<usize>,

    /// Selection method (rnd, max_deg, best_cov, manual)
    #[arg(short, long)]
    method: Option<SelectionMethod>,

    /// Sampled vertex pairs for best_cov
    #[arg(long)]
    path_samples: Option<usize>,

    /// Landmarks for the manual method
    #[arg(long, value_delimiter = ',')]
    manual: Vec<VertexId>,
}

impl SelectionArgs {
    fn apply(&self, settings: &mut Settings) {
        if let Some(count) = self.count {
            settings.landmarks.count = count;
        }
        if let Some(method) = self.method {
            settings.landmarks.method = method;
        }
        if let Some(samples) = self.path_samples {
            settings.landmarks.path_samples = samples;
        }
        if !self.manual.is_empty() {
            settings.landmarks.manual = self.manual.clone();
            settings.landmarks.method = SelectionMethod::Manual;
        }
    }
}

impl Cli {
    /// Command-line values win over the settings file and environment
    fn apply(&self, settings: &mut Settings) {
        if let Some(input) = &self.input {
            settings.dataset.path = Some(input.clone());
        }
        if let Some(directed) = self.directed {
            settings.dataset.directed = directed;
        }
        if let Some(weighted) = self.weighted {
            settings.dataset.weighted = weighted;
        }
        if let Some(has_headers) = self.has_headers {
            settings.dataset.has_headers = has_headers;
        }
        if let Some(format) = self.format {
            settings.dataset.format = format;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
    }
}

fn parse_format(s: &str) -> std::result::Result<EdgeListFormat, String> {
    match s {
        "whitespace" | "tsv" => Ok(EdgeListFormat::Whitespace),
        "csv" => Ok(EdgeListFormat::Csv),
        other => Err(format!("unknown edge-list format '{}'", other)),
    }
}

fn parse_pair(s: &str) -> std::result::Result<(VertexId, VertexId), String> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format!("expected start:end, got '{}'", s))?;
    let vertex = |v: &str| {
        v.trim()
            .parse::<VertexId>()
            .map_err(|e| format!("invalid vertex id '{}': {}", v, e))
    };
    Ok((vertex(start)?, vertex(end)?))
}

struct AnalysisContext {
    settings: Settings,
    rng: StdRng,
    json: bool,
}

impl AnalysisContext {
    fn new(cli: &Cli) -> Result<Self> {
        let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
        cli.apply(&mut settings);

        let rng = StdRng::seed_from_u64(settings.seed);
        Ok(AnalysisContext { settings, rng, json: cli.json })
    }

    fn load_graph(&self) -> Result<Graph> {
        let dataset = &self.settings.dataset;
        let Some(path) = dataset.path.as_ref() else {
            bail!("no input graph: pass --input or set dataset.path");
        };

        let start = Instant::now();
        let graph = dataset
            .reader()
            .load(path)
            .with_context(|| format!("reading {}", path.display()))?;
        info!(path = %path.display(), elapsed_ms = start.elapsed().as_millis() as u64, "graph loaded");
        Ok(graph)
    }

    /// Largest weak component, the graph the landmark oracles are built on
    fn largest_component(&self) -> Result<Graph> {
        let graph = self.load_graph()?;
        let components = weak_components(&graph);
        if components.len() > 1 {
            info!(components = components.len(), "restricting to the largest weak component");
        }
        split_graph(&graph, &components)
            .into_iter()
            .next()
            .context("input graph has no vertices")
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = AnalysisContext::new(&cli)?;

    match cli.command {
        Commands::Components { strong } => handle_components(&ctx, strong),
        Commands::Characteristics { sample_size } => handle_characteristics(&mut ctx, sample_size),
        Commands::Landmarks(args) => handle_landmarks(&mut ctx, &args),
        Commands::Distance { oracle, selection, pairs } => handle_distance(&mut ctx, oracle, &selection, &pairs),
        Commands::Settings => {
            print!("{}", ctx.settings.to_toml()?);
            Ok(())
        }
    }
}

fn handle_components(ctx: &AnalysisContext, strong: bool) -> Result<()> {
    let graph = ctx.load_graph()?;
    let start = Instant::now();
    let components = if strong {
        strong_components(&graph)
    } else {
        weak_components(&graph)
    };
    let summary = ComponentSummary::new(&components, graph.vertex_count());
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "components computed");

    let kind = if strong { "strong" } else { "weak" };
    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "kind": kind,
                "vertices": graph.vertex_count(),
                "edges": graph.edge_count(),
                "summary": summary,
            }))?
        );
    } else {
        println!("{} components: {}", kind, summary.count);
        println!("largest component: {} vertices ({:.2}%)", summary.largest, summary.largest_share * 100.0);
    }
    Ok(())
}

fn handle_characteristics(ctx: &mut AnalysisContext, sample_size: Option<usize>) -> Result<()> {
    let sample_size = sample_size.unwrap_or(ctx.settings.sample_size);
    let graph = ctx.largest_component()?;
    let characteristics = estimate_characteristics(&graph, sample_size, &mut ctx.rng)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&characteristics)?);
    } else {
        println!("vertices: {}", characteristics.vertex_count);
        println!("edges: {}", characteristics.edge_count);
        println!("density: {:.6}", characteristics.density);
        println!(
            "degree: min {} / max {} / mean {:.2}",
            characteristics.degree.min, characteristics.degree.max, characteristics.degree.mean
        );
        println!("radius: {}", characteristics.radius);
        println!("diameter: {}", characteristics.diameter);
        println!("90th percentile distance: {}", characteristics.percentile_90);
        println!("sampled sources: {}", characteristics.sampled);
    }
    Ok(())
}

fn handle_landmarks(ctx: &mut AnalysisContext, args: &SelectionArgs) -> Result<()> {
    args.apply(&mut ctx.settings);
    let graph = ctx.largest_component()?;

    let start = Instant::now();
    let selection = select_landmarks(&graph, &ctx.settings.landmarks, &mut ctx.rng)?;
    info!(
        method = %ctx.settings.landmarks.method,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "landmarks selected"
    );
    if !selection.is_complete() {
        warn!(shortfall = selection.shortfall(), "fewer landmarks than requested");
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        let ids: Vec<String> = selection.landmarks.iter().map(|v| v.to_string()).collect();
        println!("{} landmarks ({}): {}", selection.landmarks.len(), ctx.settings.landmarks.method, ids.join(" "));
    }
    Ok(())
}

fn handle_distance(
    ctx: &mut AnalysisContext,
    oracle: Option<OracleKind>,
    args: &SelectionArgs,
    pairs: &[(VertexId, VertexId)],
) -> Result<()> {
    args.apply(&mut ctx.settings);
    if let Some(kind) = oracle {
        ctx.settings.oracle = kind;
    }
    let graph = ctx.largest_component()?;

    let start = Instant::now();
    let oracle = Oracle::build(ctx.settings.oracle, &graph, &ctx.settings.landmarks, &mut ctx.rng)?;
    info!(
        oracle = %oracle.kind(),
        landmarks = oracle.landmarks().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "oracle ready"
    );

    let mut answers = Vec::with_capacity(pairs.len());
    for &(a, b) in pairs {
        let distance = oracle
            .distance(a, b)
            .with_context(|| format!("query {}:{}", a, b))?;
        answers.push((a, b, distance));
    }

    if ctx.json {
        let rows: Vec<_> = answers
            .iter()
            .map(|(a, b, d)| json!({ "start": a, "end": b, "distance": d.value() }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "oracle": oracle.kind(),
                "landmarks": oracle.landmarks(),
                "queries": rows,
            }))?
        );
    } else {
        for (a, b, distance) in answers {
            println!("{} {} {}", a, b, distance);
        }
    }
    Ok(())
}
