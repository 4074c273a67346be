//! lexigraph CLI: workspace-aware thesaurus repository.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use oxigraph::io::RdfFormat;
use oxigraph::model::NamedNode;

use lexigraph::config::LexConfig;
use lexigraph::engine::Engine;
use lexigraph::export::{ImportOutcomeExport, SearchResultExport, WorkspaceExport};
use lexigraph::import::parse_media_type;
use lexigraph::model::{Asset, Term, Vocabulary};
use lexigraph::store::parse_iri;
use lexigraph::workspace::WorkspaceMetadataProvider;

#[derive(Parser)]
#[command(name = "lexigraph", version, about = "Workspace-aware thesaurus repository")]
struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for persistent storage. Overrides the config file.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Workspace IRI to open before running the command.
    #[arg(long, global = true)]
    workspace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk-load an RDF dataset (TriG, N-Quads, ...) keeping its graph names.
    Load {
        /// Dataset file.
        file: PathBuf,

        /// Media type of the file. Guessed from the extension when omitted.
        #[arg(long)]
        media_type: Option<String>,
    },

    /// Import a SKOS glossary into a vocabulary of the current workspace.
    Import {
        /// Vocabulary IRI.
        #[arg(long)]
        vocabulary: String,

        /// Media type of the input files, e.g. text/turtle.
        #[arg(long, default_value = "text/turtle")]
        media_type: String,

        /// Input files, parsed together as one glossary.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Full-text search in the current workspace.
    Search {
        /// Search string.
        query: String,

        /// Only return terms.
        #[arg(long)]
        terms: bool,

        /// Restrict term search to these vocabularies (repeatable).
        #[arg(long = "vocabulary")]
        vocabularies: Vec<String>,
    },

    /// Print a fresh term IRI for a label in a vocabulary's term namespace.
    Mint {
        /// Vocabulary IRI.
        vocabulary: String,
        /// Term label.
        label: String,
    },

    /// Show the current workspace's vocabularies and visible contexts.
    Contexts,

    /// Resolve or register change-tracking contexts.
    ChangeContext {
        #[command(subcommand)]
        action: ChangeContextAction,
    },

    /// Show or write configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show repository info and statistics.
    Info,
}

#[derive(Subcommand)]
enum ChangeContextAction {
    /// Print the change-tracking context of an asset.
    Resolve {
        /// Asset IRI.
        asset: String,

        /// Kind of asset.
        #[arg(long, value_enum, default_value_t = AssetKind::Vocabulary)]
        kind: AssetKind,

        /// Glossary IRI of the term. Resolves the vocabulary through the
        /// glossary instead of a direct term link.
        #[arg(long)]
        glossary: Option<String>,
    },
    /// Link a change-tracking context to a vocabulary of the current workspace.
    Register {
        /// Vocabulary IRI.
        vocabulary: String,
        /// Change-tracking context IRI.
        context: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML.
    Show,
    /// Write the effective configuration to a file.
    Init {
        /// Target file. Defaults to `--config`, then `lexigraph.toml`.
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AssetKind {
    Vocabulary,
    Term,
    Resource,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LexConfig::load(path)?,
        None => LexConfig::default(),
    };
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }

    let workspace = cli.workspace.as_deref();

    match cli.command {
        Commands::Load { file, media_type } => {
            let engine = open_engine(config, workspace)?;
            let format = match media_type {
                Some(media_type) => parse_media_type(&media_type)?,
                None => format_from_extension(&file)?,
            };
            let reader = BufReader::new(File::open(&file).into_diagnostic()?);
            let loaded = engine.load_dataset(format, reader)?;
            println!("Loaded {loaded} quads from {}", file.display());
        }

        Commands::Import {
            vocabulary,
            media_type,
            files,
        } => {
            let engine = open_engine(config, Some(require_workspace(workspace)?))?;
            let vocabulary = parse_iri(vocabulary)?;
            let readers = files
                .iter()
                .map(|f| File::open(f).map(BufReader::new))
                .collect::<std::io::Result<Vec<_>>>()
                .into_diagnostic()?;
            let outcome = engine.import_vocabulary(&vocabulary, &media_type, readers)?;
            let json = serde_json::to_string_pretty(&ImportOutcomeExport::from(&outcome))
                .into_diagnostic()?;
            println!("{json}");
        }

        Commands::Search {
            query,
            terms,
            vocabularies,
        } => {
            let engine = open_engine(config, Some(require_workspace(workspace)?))?;
            let results = if terms || !vocabularies.is_empty() {
                let vocabularies = vocabularies
                    .into_iter()
                    .map(parse_iri)
                    .collect::<Result<BTreeSet<NamedNode>, _>>()?;
                engine
                    .search()
                    .full_text_search_of_terms(&query, &vocabularies)?
            } else {
                engine.search().full_text_search(&query)?
            };
            let exports: Vec<SearchResultExport> =
                results.iter().map(SearchResultExport::from).collect();
            let json = serde_json::to_string_pretty(&exports).into_diagnostic()?;
            println!("{json}");
        }

        Commands::Mint { vocabulary, label } => {
            let engine = open_engine(config, workspace)?;
            let term = engine.mint_term_identifier(&parse_iri(vocabulary)?, &label)?;
            println!("{}", term.as_str());
        }

        Commands::Contexts => {
            let engine = open_engine(config, Some(require_workspace(workspace)?))?;
            let metadata = engine.workspaces().current_workspace_metadata()?;
            let visible = engine.resolver().current_workspace_vocabulary_contexts()?;
            let export = WorkspaceExport::new(&metadata, &visible);
            let json = serde_json::to_string_pretty(&export).into_diagnostic()?;
            println!("{json}");
        }

        Commands::ChangeContext { action } => {
            let engine = open_engine(config, Some(require_workspace(workspace)?))?;

            match action {
                ChangeContextAction::Resolve {
                    asset,
                    kind,
                    glossary,
                } => {
                    let asset = resolve_asset(&engine, parse_iri(asset)?, kind, glossary)?;
                    let context = engine
                        .change_tracking()
                        .resolve_change_tracking_context(&asset)?;
                    println!("{context}");
                }
                ChangeContextAction::Register {
                    vocabulary,
                    context,
                } => {
                    let vocabulary = parse_iri(vocabulary)?;
                    let context = parse_iri(context)?;
                    engine.change_tracking().register(&vocabulary, &context)?;
                    println!("Registered {context} for {vocabulary}");
                }
            }
        }

        Commands::Info => {
            let engine = open_engine(config, workspace)?;
            println!("{}", engine.info()?);
        }

        Commands::Config { action } => run_config(&action, &config, cli.config.as_deref())?,
    }

    Ok(())
}

fn run_config(action: &ConfigAction, config: &LexConfig, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml = config.to_toml().map_err(|e| miette::miette!(e))?;
            print!("{toml}");
        }
        ConfigAction::Init { path } => {
            let path = path
                .clone()
                .or_else(|| config_path.map(Path::to_path_buf))
                .unwrap_or_else(|| PathBuf::from("lexigraph.toml"));
            config.save(&path)?;
            println!("Wrote configuration to {}", path.display());
        }
    }
    Ok(())
}

/// Asset to resolve a change-tracking context for.
fn resolve_asset(
    engine: &Engine,
    uri: NamedNode,
    kind: AssetKind,
    glossary: Option<String>,
) -> Result<Asset> {
    let asset = match (kind, glossary) {
        (AssetKind::Term, glossary) => {
            let mut term = Term::new(uri);
            if let Some(glossary) = glossary {
                term = term.with_glossary(parse_iri(glossary)?);
            }
            Asset::from(term)
        }
        (_, Some(_)) => {
            return Err(miette::miette!(
                help = "Pass --kind term to resolve a term through its glossary.",
                "--glossary only applies to terms"
            ));
        }
        (AssetKind::Vocabulary, None) => {
            let metadata = engine.workspaces().current_workspace_metadata()?;
            let context = metadata.vocabulary_info(&uri)?.context.clone();
            Asset::from(Vocabulary::new(uri, context))
        }
        (AssetKind::Resource, None) => Asset::Resource(uri),
    };
    Ok(asset)
}

/// Open the repository and, when given, make `workspace` current.
fn open_engine(config: LexConfig, workspace: Option<&str>) -> Result<Engine> {
    let engine = Engine::new(config)?;
    if let Some(workspace) = workspace {
        engine.open_workspace(&parse_iri(workspace)?)?;
    }
    Ok(engine)
}

fn require_workspace(workspace: Option<&str>) -> Result<&str> {
    workspace.ok_or_else(|| {
        miette::miette!(
            help = "Pass --workspace <IRI> to select the workspace to operate on.",
            "no workspace selected"
        )
    })
}

fn format_from_extension(file: &Path) -> Result<RdfFormat> {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    RdfFormat::from_extension(extension).ok_or_else(|| {
        miette::miette!(
            help = "Pass --media-type explicitly.",
            "cannot guess the RDF format of {}",
            file.display()
        )
    })
}
