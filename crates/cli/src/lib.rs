mod batch;
mod relations;
mod schema;
mod view;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use twigscope_core::ResolverConfig;
use twigscope_core::logging::{LogOptions, init_logging};

#[derive(Parser)]
#[command(
    name = "twigscope",
    version,
    about = "Relationship navigation for Twig templates",
    long_about = "Twigscope answers which templates include a template, which templates \
                  overwrite it, where its blocks are implemented or overridden and which \
                  controllers render it, based on an already-parsed corpus snapshot."
)]
pub struct Cli {
    /// Resolver settings (JSON). Missing keys fall back to defaults.
    #[arg(long, global = true, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Labels are shown relative to this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub project_root: Option<PathBuf>,

    /// Worker threads for batch resolution
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// How many levels of child templates are searched for block implementations
    #[arg(long, global = true)]
    pub max_child_depth: Option<usize>,

    /// Only use controllers the index knows about, not the template naming convention
    #[arg(long, global = true)]
    pub no_implicit_controllers: bool,

    /// Also write logs to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show everything related to one template
    Relations {
        /// Corpus snapshot (JSON)
        #[arg(value_name = "CORPUS")]
        corpus: PathBuf,
        /// Template path or logical name
        #[arg(value_name = "TEMPLATE")]
        template: String,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve every template of a corpus on the worker pool
    Batch {
        /// Corpus snapshot (JSON)
        #[arg(value_name = "CORPUS")]
        corpus: PathBuf,
    },
    /// Print the JSON schema of the corpus snapshot format
    Schema,
}

impl Cli {
    /// The config file (or defaults), with command-line flags taking precedence.
    fn resolver_config(&self) -> Result<ResolverConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ResolverConfig::from_file(path)?,
            None => ResolverConfig::default(),
        };
        if let Some(root) = &self.project_root {
            config.project_root = Some(root.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(depth) = self.max_child_depth {
            config.max_child_depth = depth;
        }
        if self.no_implicit_controllers {
            config.implicit_controllers = false;
        }
        Ok(config)
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Batch { .. } => "batch",
        _ => "cli",
    };
    let _guard = init_logging(&LogOptions::new(component).with_stderr(cli.verbose));

    match &cli.command {
        Commands::Relations {
            corpus,
            template,
            json,
        } => relations::run(corpus, template, cli.resolver_config()?, *json),
        Commands::Batch { corpus } => batch::run(corpus, cli.resolver_config()?),
        Commands::Schema => schema::run(),
    }
}
