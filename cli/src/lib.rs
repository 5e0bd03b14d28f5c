use anyhow::{anyhow, Error, Result};
use clap::{Parser, Subcommand};
use log::info;
use rdfobject::io::{format_from_name, open_quads, write_quads};
use rdfobject::{
    string_to_term, term_to_string, Context, LoaderConfig, RdfObjectLoader, Registry, ResourceId,
    Term,
};
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "rdfobject")]
#[command(about = "Inspect RDF files as linked resources")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
    /// JSON-LD context used to resolve short names: a file, inline JSON or a remote URL
    #[clap(long, short, global = true)]
    context: Option<String>,
    /// Do not reassemble rdf:first/rdf:rest chains into lists
    #[clap(long = "no-lists", action, global = true)]
    no_lists: bool,
    /// Offline mode - will not attempt to fetch remote contexts
    #[clap(long, short, action, default_value = "false", global = true)]
    offline: bool,
    /// Loader configuration file (JSON); command line flags take precedence
    #[clap(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the version of the rdfobject binary
    Version,
    /// Load a file and print resources as JSON
    Load {
        /// The RDF file to load
        file: PathBuf,
        /// Only print the resource for this term (IRI, compact IRI, _:blank or "literal")
        #[clap(long, short)]
        subject: Option<String>,
        /// Compact property IRIs with the context
        #[clap(long, action, default_value = "false")]
        compact: bool,
    },
    /// Print every RDF list found in a file
    Lists {
        /// The RDF file to load
        file: PathBuf,
    },
    /// Load a file and write the graph reachable from one resource back out
    Quads {
        /// The RDF file to load
        file: PathBuf,
        /// The resource to serialize
        #[clap(long, short)]
        subject: String,
        /// Output format: nquads, turtle or ntriples
        #[clap(long, short, default_value = "nquads")]
        format: String,
    },
    /// Check whether a resource is of a type, following rdf:type and rdfs:subClassOf
    IsA {
        /// The RDF file to load
        file: PathBuf,
        /// The resource to check
        subject: String,
        /// The type, as an IRI or a short name from the context
        r#type: String,
    },
    /// Expand a short name through the context
    Expand {
        /// The name to expand
        name: String,
        /// Expand as an identifier (prefixes and @base) instead of a property or type
        #[clap(long = "no-vocab", action)]
        no_vocab: bool,
    },
}

pub fn run() -> Result<()> {
    rdfobject::init_logging();
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    rdfobject::init_logging();
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn execute(cmd: Cli) -> Result<()> {
    // CLI flags for verbosity take precedence over RUST_LOG/RDFOBJECT_LOG.
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    let config = build_config(&cmd)?;
    if cmd.verbose || cmd.debug {
        config.print();
    }

    match cmd.command {
        Commands::Version => {
            println!("rdfobject {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Load {
            file,
            subject,
            compact,
        } => {
            let loader = load_file(config, &file)?;
            let resources = loader.resources();
            let output = match subject {
                Some(subject) => {
                    let id = require_resource(resources, &subject)?;
                    project(resources, id, compact)
                }
                None => {
                    let mut all = Map::new();
                    for (key, id) in resources.iter() {
                        let resource = &resources[id];
                        if resource.properties_uri().is_empty() && resource.list().is_none() {
                            continue;
                        }
                        all.insert(key.to_string(), project(resources, id, compact));
                    }
                    Value::Object(all)
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Lists { file } => {
            let loader = load_file(config, &file)?;
            let resources = loader.resources();
            for (key, id) in resources.iter() {
                let items = match resources[id].list() {
                    Some(items) if !items.is_empty() => items,
                    _ => continue,
                };
                let items: Vec<String> = items
                    .iter()
                    .map(|item| term_to_string(resources[*item].term()))
                    .collect();
                println!("{} ( {} )", key, items.join(" "));
            }
        }
        Commands::Quads {
            file,
            subject,
            format,
        } => {
            let format = format_from_name(&format)?;
            let loader = load_file(config, &file)?;
            let resources = loader.resources();
            let id = require_resource(resources, &subject)?;
            let quads = resources.to_quads(id);
            let stdout = std::io::stdout();
            let written = write_quads(&quads, stdout.lock(), format)?;
            info!("Wrote {} of {} quads", written, quads.len());
        }
        Commands::IsA {
            file,
            subject,
            r#type,
        } => {
            let loader = load_file(config, &file)?;
            let resources = loader.resources();
            let id = require_resource(resources, &subject)?;
            println!("{}", resources.is_a_named(id, &r#type));
        }
        Commands::Expand { name, no_vocab } => {
            let context = Context::parse(&config.context, config.offline)?;
            match context.expand_term(&name, !no_vocab) {
                Some(expanded) => println!("{}", expanded),
                None => return Err(anyhow!("Term '{}' is disabled in the context", name)),
            }
        }
    }

    Ok(())
}

fn build_config(cmd: &Cli) -> Result<LoaderConfig> {
    let mut config = match &cmd.config {
        Some(path) => LoaderConfig::from_file(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(context) = &cmd.context {
        config.context = read_context_arg(context)?;
    }
    if cmd.no_lists {
        config.normalize_lists = false;
    }
    if cmd.offline {
        config.offline = true;
    }
    Ok(config)
}

/// A context argument is a JSON file, inline JSON, or else a remote context URL.
fn read_context_arg(arg: &str) -> Result<Value> {
    let path = Path::new(arg);
    if path.is_file() {
        let content = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&content)?);
    }
    match serde_json::from_str(arg) {
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(arg.to_string())),
    }
}

fn load_file(config: LoaderConfig, file: &Path) -> Result<RdfObjectLoader> {
    let mut loader = RdfObjectLoader::new(config);
    loader.import(open_quads(file)?)?;
    Ok(loader)
}

fn resolve_term(resources: &Registry, name: &str) -> Term {
    match resources.context().expand_term(name, false) {
        Some(expanded) => string_to_term(&expanded),
        None => string_to_term(name),
    }
}

fn require_resource(resources: &Registry, name: &str) -> Result<ResourceId> {
    let term = resolve_term(resources, name);
    resources
        .find(&term)
        .ok_or_else(|| anyhow!("No resource found for {}", term_to_string(&term)))
}

fn project(resources: &Registry, id: ResourceId, compact: bool) -> Value {
    let mut json = resources.to_json(id);
    if compact {
        compact_properties(resources.context(), &mut json);
    }
    json
}

/// Rewrites the property keys of a projection to their compact form, recursively.
fn compact_properties(context: &Context, json: &mut Value) {
    let Value::Object(record) = json else {
        return;
    };
    if let Some(Value::Object(properties)) = record.get_mut("properties") {
        let compacted: Map<String, Value> = std::mem::take(properties)
            .into_iter()
            .map(|(key, mut values)| {
                if let Value::Array(items) = &mut values {
                    items
                        .iter_mut()
                        .for_each(|item| compact_properties(context, item));
                }
                (context.compact_iri(&key, true), values)
            })
            .collect();
        *properties = compacted;
    }
    if let Some(Value::Array(items)) = record.get_mut("list") {
        items
            .iter_mut()
            .for_each(|item| compact_properties(context, item));
    }
}
