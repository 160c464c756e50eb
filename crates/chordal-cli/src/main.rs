use chordal_core::{ChordConfig, Direction, FlowTable};
use chordal_render::highlight::{HighlightEvent, RecordingListener};
use chordal_render::scene::ChordScene;
use chordal_render::{ChordDiagram, LayoutOptions};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(chordal_core::Error),
    Render(chordal_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<chordal_core::Error> for CliError {
    fn from(value: chordal_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<chordal_render::Error> for CliError {
    fn from(value: chordal_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Highlight,
}

#[derive(Debug, Clone)]
enum HoverSpec {
    Node(String),
    Zone(String, Direction),
    Chord(String, String),
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    diagram_id: Option<String>,
    hover: Option<HoverSpec>,
    pretty: bool,
    verbosity: u8,
}

#[derive(Serialize)]
struct HighlightOut<'a> {
    focused: bool,
    events: &'a [HighlightEvent],
    scene: &'a ChordScene,
}

fn usage() -> &'static str {
    "chordal-cli\n\
\n\
USAGE:\n\
  chordal-cli [layout] [--pretty] [--config <path>] [--id <prefix>] [-v] [<path>|-]\n\
  chordal-cli highlight (--node <name> | --zone <name>:<out|in> | --chord <source>:<target>) [--pretty] [--config <path>] [--id <prefix>] [-v] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', flow records are read from stdin as a JSON array.\n\
  - --config takes a partial JSON object merged over the default configuration.\n\
  - highlight prints the scene in the focused state plus the emitted highlight events.\n\
  - Logs go to stderr; -v enables debug output, -vv trace. RUST_LOG overrides both.\n\
"
}

fn parse_zone(spec: &str) -> Option<HoverSpec> {
    let (name, dir) = spec.rsplit_once(':')?;
    let direction = match dir.trim().to_ascii_lowercase().as_str() {
        "out" | "outgoing" => Direction::Outgoing,
        "in" | "incoming" => Direction::Incoming,
        _ => return None,
    };
    Some(HoverSpec::Zone(name.to_string(), direction))
}

fn parse_chord(spec: &str) -> Option<HoverSpec> {
    let (source, target) = spec.split_once(':')?;
    Some(HoverSpec::Chord(source.to_string(), target.to_string()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "highlight" => args.command = Command::Highlight,
            "--pretty" => args.pretty = true,
            "-v" | "--verbose" => args.verbosity = args.verbosity.saturating_add(1),
            "-vv" => args.verbosity = args.verbosity.saturating_add(2),
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--node" | "--zone" | "--chord" => {
                let Some(spec) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if args.hover.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                let hover = match a.as_str() {
                    "--node" => Some(HoverSpec::Node(spec.clone())),
                    "--zone" => parse_zone(spec),
                    _ => parse_chord(spec),
                };
                args.hover = Some(hover.ok_or(CliError::Usage(usage()))?);
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
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    match (args.command, &args.hover) {
        (Command::Highlight, None) => Err(CliError::Usage(usage())),
        (Command::Layout, Some(_)) => Err(CliError::Usage(usage())),
        _ => Ok(args),
    }
}

fn setup_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    // Keep an already-installed subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
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

fn load_config(path: Option<&str>) -> Result<ChordConfig, CliError> {
    match path {
        None => Ok(ChordConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(ChordConfig::from_json_str(&text)?)
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    std::io::Write::write_all(&mut out, b"\n")?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(args.input.as_deref())?;
    let table = FlowTable::from_json_str(&text, &config.name_key)?;
    tracing::debug!(entities = table.len(), "read flow records");

    let mut diagram =
        ChordDiagram::with_listener(config, LayoutOptions::default(), RecordingListener::default())?;
    if let Some(id) = args.diagram_id {
        diagram = diagram.with_id(id)?;
    }
    diagram.set_data(table)?;

    match args.command {
        Command::Layout => write_json(&diagram.scene(), args.pretty),
        Command::Highlight => {
            let focused = match &args.hover {
                Some(HoverSpec::Node(name)) => diagram.hover_node(name),
                Some(HoverSpec::Zone(name, direction)) => diagram.hover_zone(name, *direction),
                Some(HoverSpec::Chord(source, target)) => diagram.hover_chord(source, target),
                None => false,
            };
            if !focused {
                tracing::warn!("hover target does not exist in this layout");
            }
            let scene = diagram.scene();
            let out = HighlightOut {
                focused,
                events: &diagram.listener().events,
                scene: &scene,
            };
            write_json(&out, args.pretty)
        }
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
    setup_logging(args.verbosity);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
