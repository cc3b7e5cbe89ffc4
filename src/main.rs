use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;

use apimark::config::{SummaryOption, UserOptions};
use apimark::{load_tree, write_docs, Output};

fn cli() -> Command {
    Command::new("apimark")
        .about("Render a resolved API tree (JSON) into a Markdown document")
        .arg(
            Arg::new("input")
                .help("Input JSON file holding the API tree")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("JSON file with rendering options"),
        )
        .arg(
            Arg::new("heading-level")
                .long("heading-level")
                .value_name("N")
                .value_parser(clap::value_parser!(u8))
                .help("Heading level of the root object"),
        )
        .arg(
            Arg::new("members-order")
                .long("members-order")
                .value_name("ORDER")
                .help("Member order: alphabetical or source"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .conflicts_with("no-summary")
                .help("Emit summary tables for every member group"),
        )
        .arg(
            Arg::new("no-summary")
                .long("no-summary")
                .action(ArgAction::SetTrue)
                .help("Do not emit summary tables"),
        )
        .arg(
            Arg::new("filter")
                .long("filter")
                .short('f')
                .value_name("PATTERN")
                .action(ArgAction::Append)
                .allow_hyphen_values(true)
                .help("Member name filter; prefix with ! to exclude. Repeatable, last match wins"),
        )
        .arg(
            Arg::new("docstring-style")
                .long("docstring-style")
                .value_name("STYLE")
                .help("Docstring style the tree was parsed with"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("FILE")
                .help("Write the document to FILE instead of stdout"),
        )
}

/// Options given on the command line, to be laid over the config file
fn cli_options(matches: &ArgMatches) -> UserOptions {
    let summary = if matches.get_flag("summary") {
        Some(SummaryOption::All(true))
    } else if matches.get_flag("no-summary") {
        Some(SummaryOption::All(false))
    } else {
        None
    };

    UserOptions {
        heading_level: matches.get_one::<u8>("heading-level").copied(),
        members_order: matches.get_one::<String>("members-order").cloned(),
        summary,
        filters: matches
            .get_many::<String>("filter")
            .map(|filters| filters.cloned().collect()),
        docstring_style: matches.get_one::<String>("docstring-style").cloned(),
        ..UserOptions::default()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();

    let input_file = matches
        .get_one::<String>("input")
        .context("missing input file")?;
    let tree = load_tree(input_file).with_context(|| format!("failed to load {}", input_file))?;

    let file_options = match matches.get_one::<String>("config") {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path))?;
            serde_json::from_str::<UserOptions>(&content)
                .with_context(|| format!("invalid config {}", path))?
        }
        None => UserOptions::default(),
    };
    let options = file_options.merge(cli_options(&matches));

    let output = match matches.get_one::<String>("output") {
        Some(path) => Output::File(PathBuf::from(path)),
        None => Output::Stdout,
    };

    write_docs(&tree, &options, output)?;

    Ok(())
}
