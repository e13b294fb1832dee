use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mingit::commands;
use mingit::object::ObjectKind;

#[derive(Debug, Parser)]
#[command(name = "mingit")]
#[command(about = "A Git-compatible object store and reference resolver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// create a repository
    Init {
        /// path to create the repository at
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// print an object's content, resolving and type-following first
    #[command(name = "cat-file")]
    CatFile {
        #[arg(value_enum)]
        r#type: ObjectKind,
        object: String,
    },
    /// compute an object's OID, optionally writing it to the store
    #[command(name = "hash-object")]
    HashObject {
        #[arg(short = 't', long = "type", value_enum, default_value = "blob")]
        object_type: ObjectKind,
        #[arg(short = 'w')]
        write: bool,
        path: PathBuf,
    },
    /// emit a Graphviz digraph of commit ancestry
    Log {
        #[arg(default_value = "HEAD")]
        commit: String,
    },
    /// list a tree's entries
    #[command(name = "ls-tree")]
    LsTree {
        #[arg(short = 'r')]
        recursive: bool,
        tree_ish: String,
    },
    /// materialize a commit's tree into an empty directory
    Checkout {
        commit: String,
        dest: PathBuf,
    },
    /// print every resolved ref
    #[command(name = "show-ref")]
    ShowRef,
    /// list, or create, tags
    Tag {
        #[arg(short = 'a')]
        annotate: bool,
        name: Option<String>,
        object: Option<String>,
    },
    /// resolve a name to an OID
    #[command(name = "rev-parse")]
    RevParse {
        #[arg(long = "wyag-type", value_enum)]
        wyag_type: Option<ObjectKind>,
        name: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("mingit: error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> mingit::Result<()> {
    match cli.command {
        Commands::Init { path } => commands::init::run(Some(path)),
        Commands::CatFile { r#type, object } => commands::cat_file::run(r#type, &object),
        Commands::HashObject { object_type, write, path } => commands::hash_object::run(write, object_type, path),
        Commands::Log { commit } => commands::log::run(&commit),
        Commands::LsTree { recursive, tree_ish } => commands::ls_tree::run(&tree_ish, recursive),
        Commands::Checkout { commit, dest } => commands::checkout::run(&commit, &dest),
        Commands::ShowRef => commands::show_ref::run(),
        Commands::Tag { annotate, name, object } => commands::tag::run(annotate, name, object),
        Commands::RevParse { wyag_type, name } => commands::rev_parse::run(&name, wyag_type),
    }
}
