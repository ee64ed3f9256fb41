use narwhal::{ConnectionSet, LayoutConfig, RegionLayout};
use serde::Serialize;
use starchart_core::{ConnectionSource, RegionId, Universe};
use std::io::Read;
use tracing_subscriber::EnvFilter;

const DEFAULT_WIDTH: f64 = 1200.0;
const DEFAULT_HEIGHT: f64 = 800.0;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Universe(starchart_core::Error),
    Config(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Universe(err) => write!(f, "{err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<starchart_core::Error> for CliError {
    fn from(value: starchart_core::Error) -> Self {
        Self::Universe(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Regions,
    Layout,
    Connections,
}

#[derive(Debug, Default)]
struct Args {
    command: Option<Command>,
    input: Option<String>,
    region: Option<RegionId>,
    width: f64,
    height: f64,
    config: Option<String>,
    pretty: bool,
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    region_id: RegionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(flatten)]
    layout: &'a RegionLayout,
}

#[derive(Serialize)]
struct ConnectionsOut<'a> {
    region_id: RegionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(flatten)]
    connections: &'a ConnectionSet,
}

fn usage() -> &'static str {
    "starchart\n\
\n\
USAGE:\n\
  starchart regions [--pretty] [<path>|-]\n\
  starchart layout --region <id> [--width <w>] [--height <h>] [--config <path>] [--pretty] [<path>|-]\n\
  starchart connections --region <id> [--width <w>] [--height <h>] [--config <path>] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - <path> is a universe cache JSON file; if omitted or '-', it is read from stdin.\n\
  - --width/--height bound the layout canvas (default 1200x800); layouts only ever shrink to fit.\n\
  - connections lays the region out on that canvas to resolve constellation membership.\n\
  - --config reads a JSON LayoutConfig; sections and fields it omits keep their defaults.\n\
  - Set STARCHART_LOG (e.g. STARCHART_LOG=debug) to see pipeline diagnostics on stderr.\n\
"
}

fn parse_dimension(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "regions" if args.command.is_none() => args.command = Some(Command::Regions),
            "layout" if args.command.is_none() => args.command = Some(Command::Layout),
            "connections" if args.command.is_none() => args.command = Some(Command::Connections),
            "--pretty" => args.pretty = true,
            "--region" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let id = id
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                args.region = Some(RegionId(id));
            }
            "--width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.width = parse_dimension(w)?;
            }
            "--height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.height = parse_dimension(h)?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" if args.input.is_none() => args.input = Some("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    match args.command {
        None => return Err(CliError::Usage(usage())),
        Some(Command::Layout | Command::Connections) if args.region.is_none() => {
            return Err(CliError::Usage(usage()));
        }
        _ => {}
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_config(path: Option<&str>) -> Result<LayoutConfig, CliError> {
    match path {
        None => Ok(LayoutConfig::default()),
        Some(path) => Ok(LayoutConfig::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STARCHART_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let Some(command) = args.command else {
        return Err(CliError::Usage(usage()));
    };

    let text = read_input(args.input.as_deref())?;
    let universe = Universe::from_json_str(&text)?;
    tracing::debug!(
        connections = universe.connections().len(),
        skipped_connections = universe.skipped_connections(),
        "loaded universe"
    );

    if let Command::Regions = command {
        return write_json(&universe.region_summaries(), args.pretty);
    }

    let Some(region_id) = args.region else {
        return Err(CliError::Usage(usage()));
    };
    let cfg = read_config(args.config.as_deref())?;
    let region = universe.require_region(region_id)?;
    let layout = narwhal::layout_region_from(&region, &universe, args.width, args.height, &cfg);
    let name = region.name.as_deref();

    match command {
        Command::Connections => {
            let connections =
                narwhal::calculate_connections_from(&region, &universe, &layout.constellations);
            write_json(
                &ConnectionsOut {
                    region_id,
                    name,
                    connections: &connections,
                },
                args.pretty,
            )
        }
        _ => write_json(
            &LayoutOut {
                region_id,
                name,
                layout: &layout,
            },
            args.pretty,
        ),
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_logging();

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err @ CliError::Universe(starchart_core::Error::UnknownRegion { .. })) => {
            eprintln!("{err}");
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
