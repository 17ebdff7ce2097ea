use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::assemble::{AllNonDist, DependencyFilesOnly, ExclusionPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "capsule-dist",
    about = "Compile an isolated component capsule and assemble its dist artifacts, locating the compiled entry point.",
    version
)]
pub struct Cli {
    /// Print compiled operator.json and exit.
    #[arg(long, global = true)]
    pub describe: bool,

    /// Print capsule-dist.v0 JSON Schema and exit.
    #[arg(long, global = true)]
    pub schema: bool,

    /// Log debug output to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Isolate a component, run the compiler, and assemble its dists.
    Build {
        /// Component source directory.
        component_dir: PathBuf,

        /// Entry point relative to the component (default: package.json main).
        #[arg(long)]
        main: Option<String>,

        /// Component name (default: package.json name, then directory name).
        #[arg(long)]
        name: Option<String>,

        /// JSON build config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compiler executable (overrides config).
        #[arg(long)]
        compiler: Option<String>,

        /// Keep the capsule on disk after the build.
        #[arg(long)]
        keep_capsule: bool,

        /// Do not copy node_modules into the capsule.
        #[arg(long)]
        no_dependencies: bool,

        /// Parent directory for capsules (default: system temp).
        #[arg(long)]
        capsule_root: Option<PathBuf>,

        #[command(flatten)]
        emit: EmitArgs,

        /// Arguments passed to the compiler (overrides config).
        #[arg(last = true)]
        compiler_args: Vec<String>,
    },

    /// Assemble dists from an already-compiled working directory.
    Assemble {
        /// Working directory containing `dist`.
        working_dir: PathBuf,

        /// Entry point source path.
        #[arg(long)]
        main: String,

        #[command(flatten)]
        emit: EmitArgs,
    },
}

/// Output options shared by `build` and `assemble`.
#[derive(clap::Args, Debug)]
pub struct EmitArgs {
    /// Which non-source files are passed through.
    #[arg(long, value_enum, default_value_t = Passthrough::Dependencies)]
    pub passthrough: Passthrough,

    /// Write the dists into this (empty or new) directory.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Embed base64 file contents in the report.
    #[arg(long)]
    pub embed: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// Files inside node_modules only.
    Dependencies,
    /// Every non-source file outside dist.
    All,
}

impl Passthrough {
    /// Exclusion policy selected by this flag value.
    pub fn policy(self) -> &'static dyn ExclusionPolicy {
        match self {
            Passthrough::Dependencies => &DependencyFilesOnly,
            Passthrough::All => &AllNonDist,
        }
    }
}
