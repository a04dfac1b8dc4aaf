//TODO: update clap to remove the need for this
#![allow(dangerous_implicit_autorefs)]

use std::path::Path;

use clap::{crate_description, crate_name, crate_version, App, AppSettings, Arg, SubCommand};
use pfs::{extract, key, list, verify};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("pfs=debug,pfs_core=debug,pfs_keys=debug")
    } else {
        EnvFilter::new("pfs=info,pfs_core=info,pfs_keys=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", verbose);
}

fn main() -> anyhow::Result<()> {
    let arg_archive = Arg::with_name("archive")
        .help("Archive file")
        .short("a")
        .long("archive")
        .required(true)
        .takes_value(true)
        .value_name("FILE");

    let arg_key = Arg::with_name("key")
        .help("Key file saved by `key --file` (recovered from the archive if omitted)")
        .short("k")
        .long("key")
        .takes_value(true)
        .value_name("FILE");

    let arg_basedir = Arg::with_name("basedir")
        .help("Directory to unpack to (defaults to '.')")
        .required(true)
        .value_name("DIR")
        .default_value(".");

    let arg_verbose = Arg::with_name("verbose")
        .help("Log debug output")
        .short("v")
        .long("verbose")
        .global(true);

    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(&arg_verbose)
        .subcommand(
            SubCommand::with_name("extract")
                .about("Recover the key and extract every entry")
                .arg(&arg_archive)
                .arg(&arg_key)
                .arg(&arg_basedir),
        )
        .subcommand(
            SubCommand::with_name("key")
                .about("Recover and print the key")
                .arg(&arg_archive)
                .arg(
                    Arg::with_name("file")
                        .help("Also save the key to a file")
                        .short("f")
                        .long("file")
                        .takes_value(true)
                        .value_name("FILE"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List archive entries")
                .arg(&arg_archive),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Compare extracted files with the archive")
                .arg(&arg_archive)
                .arg(&arg_key)
                .arg(&arg_basedir),
        )
        .get_matches();

    let verbose = matches.is_present("verbose")
        || matches
            .subcommand()
            .1
            .map_or(false, |sub| sub.is_present("verbose"));
    init_logging(verbose);

    if let Some(matches) = matches.subcommand_matches("extract") {
        extract(
            matches.value_of("archive").unwrap(),
            matches.value_of("key").map(Path::new),
            matches.value_of("basedir").unwrap(),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("key") {
        key(
            matches.value_of("archive").unwrap(),
            matches.value_of("file").map(Path::new),
        )?;
    } else if let Some(matches) = matches.subcommand_matches("list") {
        list(matches.value_of("archive").unwrap())?;
    } else if let Some(matches) = matches.subcommand_matches("verify") {
        verify(
            matches.value_of("archive").unwrap(),
            matches.value_of("key").map(Path::new),
            matches.value_of("basedir").unwrap(),
        )?;
    }
    Ok(())
}
