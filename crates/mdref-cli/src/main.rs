//! `mdref` command-line entrypoint
//!
//! Wires configuration, the address cache, the filesystem content provider
//! and the reference loader together, then dispatches one subcommand.

mod output;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mdref_address::{AddressParser, AddressingError};
use mdref_content::{AtReferenceExtractor, ContentProvider, FsContentProvider};
use mdref_resolve::{
    hierarchy_stats, AddressService, MdrefConfig, ReferenceLoader, ResolveError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("mdref")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Parse markdown document addresses and resolve @-references")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_parser(value_parser!(PathBuf))
                .global(true)
                .help("Document root directory (overrides docs_root)"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a document, section or task address and print it as JSON")
                .arg(Arg::new("address").required(true).help("Address to parse"))
                .arg(
                    Arg::new("context")
                        .long("context")
                        .help("Context document for bare or #-prefixed slugs"),
                )
                .arg(
                    Arg::new("task")
                        .long("task")
                        .action(ArgAction::SetTrue)
                        .help("Parse as a task address"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a document's references into a tree")
                .arg(Arg::new("document").required(true).help("Document path"))
                .arg(
                    Arg::new("max-depth")
                        .long("max-depth")
                        .value_parser(value_parser!(usize))
                        .help("Override the configured maximum depth"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Summarize the resolved reference tree of a document")
                .arg(Arg::new("document").required(true).help("Document path"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<MdrefConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => MdrefConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MdrefConfig::default(),
    };
    if let Some(root) = matches.get_one::<PathBuf>("root") {
        config = config.with_docs_root(root);
    }
    Ok(config)
}

/// Composition root: one cache, one provider, shared by every component
struct App {
    parser: AddressParser,
    service: AddressService,
    provider: Arc<dyn ContentProvider>,
    config: MdrefConfig,
}

impl App {
    fn new(config: MdrefConfig) -> Result<Self> {
        let cache = config.cache.build()?;
        let parser = AddressParser::new(cache);
        let provider: Arc<dyn ContentProvider> =
            Arc::new(FsContentProvider::new(config.docs_root.clone()));
        let service = AddressService::new(parser.clone(), Arc::clone(&provider));
        tracing::info!(root = %config.docs_root.display(), "mdref ready");

        Ok(Self {
            parser,
            service,
            provider,
            config,
        })
    }

    fn loader(&self, max_depth: Option<usize>) -> ReferenceLoader {
        let mut resolver = self.config.resolver.clone();
        if let Some(depth) = max_depth {
            resolver = resolver.with_max_depth(depth);
        }
        ReferenceLoader::new(
            Arc::clone(&self.provider),
            Arc::new(AtReferenceExtractor),
            resolver,
        )
        .with_parser(self.parser.clone())
    }

    fn parse(&self, matches: &ArgMatches) -> Result<String> {
        let address = required(matches, "address")?;
        let context = matches.get_one::<String>("context").map(String::as_str);

        let value = if matches.get_flag("task") {
            serde_json::to_value(&*self.parser.parse_task_address(address, context)?)?
        } else if context.is_some() || address.contains('#') {
            serde_json::to_value(&*self.parser.parse_section_address(address, context)?)?
        } else {
            serde_json::to_value(&*self.parser.parse_document_address(address)?)?
        };
        Ok(serde_json::to_string_pretty(&value)?)
    }

    async fn resolve(&self, matches: &ArgMatches) -> Result<String> {
        let document = required(matches, "document")?;
        let resolved = self.service.resolve_document(document).await?;
        let max_depth = matches.get_one::<usize>("max-depth").copied();
        let resolution = self
            .loader(max_depth)
            .load_document(resolved.address.path())
            .await?;

        if matches.get_flag("json") {
            Ok(serde_json::to_string_pretty(&resolution)?)
        } else {
            Ok(output::render_resolution(&resolution))
        }
    }

    async fn stats(&self, matches: &ArgMatches) -> Result<String> {
        let document = required(matches, "document")?;
        let resolved = self.service.resolve_document(document).await?;
        let resolution = self.loader(None).load_document(resolved.address.path()).await?;
        let stats = hierarchy_stats(&resolution.nodes);

        if matches.get_flag("json") {
            Ok(serde_json::to_string_pretty(&stats)?)
        } else {
            Ok(output::render_stats(&stats))
        }
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let app = App::new(load_config(matches)?)?;

    let rendered = match matches.subcommand() {
        Some(("parse", sub)) => app.parse(sub)?,
        Some(("resolve", sub)) => app.resolve(sub).await?,
        Some(("stats", sub)) => app.stats(sub).await?,
        _ => {
            cli().print_help()?;
            return Ok(());
        }
    };

    println!("{}", rendered.trim_end());
    Ok(())
}

/// Error code for display: addressing and resolution errors carry their own
fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<AddressingError>() {
        e.code()
    } else if let Some(e) = err.downcast_ref::<ResolveError>() {
        e.code()
    } else {
        "ERROR"
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {err:#}", error_code(&err));
            ExitCode::FAILURE
        }
    }
}
