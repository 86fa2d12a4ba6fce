//! campus-nav: inspect saved campus maps and query routes from the shell.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use campus::config::{load_config_or_default, Config};
use campus::CampusMap;
use clap::{Arg, ArgMatches, Command};
use log::{debug, info};

fn cli() -> Command {
    Command::new("campus-nav")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Campus map inspection and shortest-route queries.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("map-dir")
                .long("map-dir")
                .value_name("DIR")
                .global(true)
                .help("Directory holding .map files"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .subcommand(Command::new("list").about("List the maps in the map directory"))
        .subcommand(
            Command::new("info")
                .about("Summarize a map")
                .arg(Arg::new("map").required(true).help("Map name or path")),
        )
        .subcommand(
            Command::new("route")
                .about("Shortest route between two buildings")
                .arg(Arg::new("map").required(true).help("Map name or path"))
                .arg(Arg::new("from").required(true).help("Start building name"))
                .arg(Arg::new("to").required(true).help("End building name")),
        )
}

fn init_logging(matches: &ArgMatches) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = matches.get_one::<String>("log-level") {
        builder.parse_filters(level);
    }
    builder.init();
}

fn load_settings(matches: &ArgMatches) -> Config {
    let path = matches.get_one::<String>("config").map(Path::new);
    let mut config = load_config_or_default(path);
    if let Some(dir) = matches.get_one::<String>("map-dir") {
        config.map_directory = PathBuf::from(dir);
    }
    config
}

/// An existing path is used as is; anything else names a map in the map directory.
fn resolve_map(config: &Config, arg: &str) -> PathBuf {
    let direct = Path::new(arg);
    if direct.is_file() {
        return direct.to_path_buf();
    }
    config.map_path(arg)
}

fn open_map(config: &Config, arg: &str) -> Result<CampusMap> {
    let path = resolve_map(config, arg);
    debug!("opening {}", path.display());
    CampusMap::load(&path).with_context(|| format!("failed to load map {}", path.display()))
}

fn cmd_list(config: &Config) -> Result<()> {
    let dir = config
        .ensure_map_directory()
        .context("map directory is unavailable")?;
    let names = campus::list_maps(&dir)
        .with_context(|| format!("failed to list {}", dir.display()))?;
    if names.is_empty() {
        info!("no maps in {}", dir.display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_info(config: &Config, matches: &ArgMatches) -> Result<()> {
    let arg = matches.get_one::<String>("map").context("missing map")?;
    let map = open_map(config, arg)?;
    let buildings = map.building_names();
    println!("buildings: {}", buildings.len());
    println!("junctions: {}", map.node_count() - buildings.len());
    println!("roads:     {}", map.edge_count());
    for name in buildings {
        let id = campus::model::building_id(&name);
        println!("  {} ({} roads)", name, map.neighbors(&id).count());
    }
    Ok(())
}

fn cmd_route(config: &Config, matches: &ArgMatches) -> Result<()> {
    let arg = matches.get_one::<String>("map").context("missing map")?;
    let from = matches.get_one::<String>("from").context("missing start building")?;
    let to = matches.get_one::<String>("to").context("missing end building")?;
    let map = open_map(config, arg)?;
    let path = map.route_between_buildings(from, to);
    if path.is_empty() {
        bail!("no path found between {} and {}", from, to);
    }
    for id in &path {
        match map.node(id).and_then(|n| n.building_name()) {
            Some(name) => println!("{}", name),
            None => println!("  via {}", id),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    // global flags propagate down, so the subcommand sees them wherever they were given
    let Some((name, sub)) = matches.subcommand() else {
        bail!("a subcommand is required");
    };
    init_logging(sub);
    let config = load_settings(sub);

    match name {
        "list" => cmd_list(&config),
        "info" => cmd_info(&config, sub),
        "route" => cmd_route(&config, sub),
        other => bail!("unknown subcommand {}", other),
    }
}
