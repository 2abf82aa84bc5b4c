mod commands;
mod error;

use std::path::PathBuf;

use nib_format::DecodeOptions;
use structopt::clap::AppSettings::*;
use structopt::StructOpt;
use tracing::Level;

#[derive(Debug, StructOpt)]
enum Commands {
    #[structopt(
        name = "i",
        visible_alias = "info",
        about = "Show the version and table of contents of an archive"
    )]
    Info {
        #[structopt(name = "nibfile", parse(from_os_str), help = "Path to the .nib archive")]
        path: PathBuf,
    },

    #[structopt(
        name = "d",
        visible_alias = "dump",
        about = "Print the objects and entries of an archive"
    )]
    Dump {
        #[structopt(short, long, help = "Print the archive as JSON")]
        json: bool,

        #[structopt(name = "nibfile", parse(from_os_str), help = "Path to the .nib archive")]
        path: PathBuf,
    },

    #[structopt(
        name = "v",
        visible_alias = "validate",
        about = "Check that archives re-encode to exactly the same bytes"
    )]
    Validate {
        #[structopt(short, long, help = "Search directories for .nib files")]
        recursive: bool,

        #[structopt(
            name = "paths",
            parse(from_os_str),
            required = true,
            help = "Archives (or directories, with -r) to validate"
        )]
        paths: Vec<PathBuf>,
    },
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "nib",
    about = "Inspect and validate NIBArchive interface files.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "nib (i|d|v) [FLAGS] <nibfile>..."
)]
struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    verbose: bool,

    #[structopt(
        long,
        help = "Read archives newer than the newest known version",
        global = true
    )]
    no_version_check: bool,

    #[structopt(subcommand)]
    cmd: Commands,
}

fn main() {
    let opts = CliOpts::from_iter(wild::args_os());

    let level = if opts.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = DecodeOptions {
        check_version: !opts.no_version_check,
    };

    let result = match opts.cmd {
        Commands::Info { path } => commands::info(path, &options),
        Commands::Dump { path, json } => commands::dump(path, json, &options),
        Commands::Validate { paths, recursive } => {
            commands::validate(paths, recursive, opts.verbose, &options)
        }
    };

    if let Err(e) = result {
        eprintln!("{:?}", anyhow::Error::new(e));
        std::process::exit(1);
    }
}
