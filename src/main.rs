//! grape CLI - classify languages from a cognate table.
//!
//! Reads the table, runs the classification pipeline and prints the tree
//! as Newick, Nexus or ASCII. The sweep and all warnings are logged to
//! stderr.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use grape::config::{
    CommunityMethod, Delimiter, GraphMethod, MissingDataPolicy, SearchStrategy, SynonymPolicy,
};
use grape::nexus::NexusWriter;
use grape::{GrapeConfig, NewickStyle, classify_file, to_newick};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::Level;

/// Hierarchical language classification by resolution sweeping
///
/// Builds a similarity graph from cognate judgements, runs community
/// detection over a range of resolutions and stitches the partitions into
/// a tree.
///
/// Examples:
///   grape cognates.tsv                              # Newick to stdout
///   grape cognates.csv --format ascii --ladderize   # Readable tree
///   grape data.tsv --community greedy --strategy dynamic -o tree.nwk
#[derive(Parser, Debug)]
#[command(name = "grape")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Cognate table with a header row
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// TOML configuration file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Graph construction method
    #[arg(long, value_enum)]
    graph: Option<GraphMethod>,

    /// Community detection algorithm
    #[arg(long, value_enum)]
    community: Option<CommunityMethod>,

    /// Seed for stochastic community detection
    #[arg(long)]
    seed: Option<u64>,

    /// Resolution search strategy
    #[arg(long, value_enum)]
    strategy: Option<SearchStrategy>,

    /// Synonym policy (adjusted graph only)
    #[arg(long, value_enum)]
    synonyms: Option<SynonymPolicy>,

    /// Missing-data policy (adjusted graph only)
    #[arg(long, value_enum)]
    missing_data: Option<MissingDataPolicy>,

    /// First resolution to evaluate
    #[arg(long)]
    initial_value: Option<f64>,

    /// Resolution step of the fixed and adaptive strategies
    #[arg(long)]
    increment: Option<f64>,

    /// Resolution growth per step of the dynamic strategy
    #[arg(long)]
    growth_factor: Option<f64>,

    /// Target number of communities of the adaptive strategy
    #[arg(long)]
    target: Option<usize>,

    /// Maximal number of resolutions evaluated
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Weight of concept similarity in the adjusted graph
    #[arg(long)]
    proximity_weight: Option<f64>,

    /// Weight of concept dissimilarity in the adjusted graph
    #[arg(long)]
    sharing_factor: Option<f64>,

    /// Column holding the language
    #[arg(long)]
    language_column: Option<String>,

    /// Column holding the concept
    #[arg(long)]
    concept_column: Option<String>,

    /// Column holding the cognate set
    #[arg(long)]
    cognateset_column: Option<String>,

    /// Field delimiter of the table
    #[arg(long, value_enum)]
    delimiter: Option<Delimiter>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Newick)]
    format: OutputFormat,

    /// Order children by clade size before writing
    #[arg(long)]
    ladderize: bool,

    /// Write the tree to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// More logging (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Newick,
    Nexus,
    Ascii,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = load_config(&cli)?;
    let mut classification = classify_file(&cli.source, &config)
        .with_context(|| format!("Failed to classify '{}'", cli.source.display()))?;
    if cli.ladderize {
        classification.tree.ladderize();
    }

    let tree = &classification.tree;
    let languages = &classification.languages;
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create '{}'", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    match cli.format {
        OutputFormat::Newick => writeln!(out, "{}", to_newick(tree, languages, NewickStyle::Label))?,
        OutputFormat::Nexus => NexusWriter::new(&mut out).write_nexus(std::slice::from_ref(tree), languages)?,
        OutputFormat::Ascii => write!(out, "{}", tree.render_ascii(languages))?,
    }
    out.flush()?;

    if !classification.diagnostics.is_empty() {
        eprint!("{}", classification.diagnostics);
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Reads the configuration file, if any, applies flag overrides and
/// validates the result.
fn load_config(cli: &Cli) -> Result<GrapeConfig> {
    let mut config = match &cli.config {
        Some(path) => GrapeConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration '{}'", path.display()))?,
        None => GrapeConfig::default(),
    };

    let graph = &mut config.graph;
    if let Some(method) = cli.graph {
        graph.method = method;
    }
    if cli.synonyms.is_some() {
        graph.synonyms = cli.synonyms;
    }
    if cli.missing_data.is_some() {
        graph.missing_data = cli.missing_data;
    }
    if let Some(weight) = cli.proximity_weight {
        graph.proximity_weight = weight;
    }
    if let Some(factor) = cli.sharing_factor {
        graph.sharing_factor = factor;
    }

    if let Some(method) = cli.community {
        config.community.method = method;
    }
    if cli.seed.is_some() {
        config.community.seed = cli.seed;
    }

    let search = &mut config.search;
    if let Some(strategy) = cli.strategy {
        search.strategy = strategy;
    }
    if cli.initial_value.is_some() {
        search.initial_value = cli.initial_value;
    }
    if let Some(increment) = cli.increment {
        search.increment = increment;
    }
    if let Some(growth_factor) = cli.growth_factor {
        search.growth_factor = growth_factor;
    }
    if cli.target.is_some() {
        search.target = cli.target;
    }
    if let Some(max_iterations) = cli.max_iterations {
        search.max_iterations = max_iterations;
    }

    let input = &mut config.input;
    if let Some(column) = &cli.language_column {
        input.language_column = column.clone();
    }
    if let Some(column) = &cli.concept_column {
        input.concept_column = column.clone();
    }
    if let Some(column) = &cli.cognateset_column {
        input.cognateset_column = column.clone();
    }
    if let Some(delimiter) = cli.delimiter {
        input.delimiter = delimiter;
    }

    config.validate()?;
    Ok(config)
}
