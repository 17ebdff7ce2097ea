pub mod artifact;
pub mod assemble;
pub mod build;
pub mod cli;
pub mod compile;
pub mod config;
pub mod isolate;
pub mod operator;
pub mod output;
pub mod refusal;
pub mod schema;

use clap::Parser;
use cli::{Cli, Command, EmitArgs, ExitCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::artifact::Artifact;
use crate::config::{BuildConfig, BuildOptions};
use crate::isolate::DirectoryIsolator;
use crate::output::DistReport;
use crate::refusal::{RefusalEnvelope, ToRefusal};

/// Run the capsule-dist CLI and return an exit code.
pub fn run() -> u8 {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // --describe short-circuits before input validation.
    if cli.describe {
        let op = operator::operator_json();
        println!(
            "{}",
            serde_json::to_string_pretty(&op).expect("operator json serialization cannot fail")
        );
        return ExitCode::Success.into();
    }

    // --schema short-circuits before input validation.
    if cli.schema {
        let s = schema::report_schema();
        println!(
            "{}",
            serde_json::to_string_pretty(&s).expect("schema serialization cannot fail")
        );
        return ExitCode::Success.into();
    }

    let Some(command) = cli.command else {
        eprintln!("capsule-dist: no command provided. Try --help.");
        return ExitCode::Refusal.into();
    };

    let outcome = match command {
        Command::Build {
            component_dir,
            main,
            name,
            config,
            compiler,
            keep_capsule,
            no_dependencies,
            capsule_root,
            emit,
            compiler_args,
        } => {
            let options = match config {
                Some(path) => BuildConfig::load(&path)
                    .map(BuildOptions::from)
                    .map_err(|e| Box::new(e.to_refusal())),
                None => Ok(BuildOptions::default()),
            };
            options.and_then(|mut options| {
                if let Some(compiler) = compiler {
                    options.compiler = compiler;
                }
                if !compiler_args.is_empty() {
                    options.args = compiler_args;
                }
                options.keep_capsule |= keep_capsule;
                options.build_dependencies &= !no_dependencies;
                options.capsule_root = capsule_root;

                let mut isolator = DirectoryIsolator::new(&component_dir);
                if let Some(main) = main {
                    isolator = isolator.with_main_file(main);
                }
                if let Some(name) = name {
                    isolator = isolator.with_name(name);
                }
                execute_build_command(&isolator, &options, &emit)
            })
        }
        Command::Assemble {
            working_dir,
            main,
            emit,
        } => execute_assemble_command(&working_dir, &main, &emit),
    };

    match outcome {
        Ok(report) => {
            println!("{}", report.to_json());
            ExitCode::Success.into()
        }
        Err(envelope) => {
            tracing::error!("{}", envelope.refusal.message);
            println!("{}", envelope.to_json());
            ExitCode::Refusal.into()
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn execute_build_command(
    isolator: &DirectoryIsolator,
    options: &BuildOptions,
    emit: &EmitArgs,
) -> Result<DistReport, Box<RefusalEnvelope>> {
    let result = build::execute_build(isolator, options, emit.passthrough.policy())
        .map_err(|e| Box::new(e.to_refusal()))?;

    write_out(&result.dists, emit)?;
    Ok(DistReport::new(&result.dists, result.main_file, emit.embed)
        .with_component(result.component)
        .with_dependencies(result.dependencies)
        .with_capsule_dir(result.kept_capsule.as_deref()))
}

fn execute_assemble_command(
    working_dir: &std::path::Path,
    main: &str,
    emit: &EmitArgs,
) -> Result<DistReport, Box<RefusalEnvelope>> {
    let (dists, main_file) = assemble::assemble(working_dir, main, emit.passthrough.policy())
        .map_err(|e| Box::new(e.to_refusal()))?
        .into_dists();

    write_out(&dists, emit)?;
    Ok(DistReport::new(&dists, Some(main_file), emit.embed))
}

fn write_out(dists: &[Artifact], emit: &EmitArgs) -> Result<(), Box<RefusalEnvelope>> {
    if let Some(out) = &emit.out {
        output::write_dists(dists, out).map_err(|e| Box::new(e.to_refusal()))?;
    }
    Ok(())
}
