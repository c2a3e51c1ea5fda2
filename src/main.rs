use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use fsnap::cli::{Cli, Commands};
use fsnap::commands::diff::DiffOptions;
use fsnap::output::{self, Verbosity};
use fsnap::{SnapshotContext, commands};
use std::io;
use std::process;

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{e:#}"));
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    output::set_verbosity(verbosity);
    output::init_logging(verbosity);

    // Completion needs no store or config
    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    let ctx = SnapshotContext::new(cli.store)?;
    if !ctx.config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Scan { path, name } => {
            commands::scan::execute(&ctx, &path, name.as_deref())?;
        }
        Commands::List { long } => {
            commands::list::execute(&ctx, long)?;
        }
        Commands::Show { name, json } => {
            commands::show::execute(&ctx, &name, json)?;
        }
        Commands::Diff {
            from,
            to,
            unchanged,
            json,
        } => {
            let options = DiffOptions {
                show_unchanged: unchanged,
                json,
            };
            commands::diff::execute(&ctx, &from, &to, options)?;
        }
        Commands::Completion { .. } => {}
    }

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
