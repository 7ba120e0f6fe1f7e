mod app;
mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{Level, info};
use tracklane_core::svg::render_timeline_svg;
use tracklane_core::views::header::HEADER_HEIGHT;
use tracklane_core::{TimelineConfig, TimelineController, load_tracks};

const USAGE: &str =
    "Usage: tracklane <items.json> [--config cfg.json] [--svg out.svg] [--width px] [--dark] [--verbose]";

#[derive(Debug, Default)]
struct Args {
    items: PathBuf,
    config: Option<PathBuf>,
    svg: Option<PathBuf>,
    width: Option<f64>,
    dark: bool,
    verbose: bool,
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> Result<Self> {
        let mut args = Self::default();
        let mut items = None;
        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--config" => args.config = Some(raw.next().context(USAGE)?.into()),
                "--svg" => args.svg = Some(raw.next().context(USAGE)?.into()),
                "--width" => {
                    let value = raw.next().context(USAGE)?;
                    let width = value
                        .parse()
                        .with_context(|| format!("bad width {value:?}"))?;
                    args.width = Some(width);
                }
                "--dark" => args.dark = true,
                "--verbose" | "-v" => args.verbose = true,
                "--help" | "-h" => bail!(USAGE),
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
                _ if items.is_none() => items = Some(PathBuf::from(&arg)),
                _ => bail!(USAGE),
            }
        }
        args.items = items.context(USAGE)?;
        Ok(args)
    }
}

fn main() -> Result<()> {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let data = std::fs::read(&args.items)
        .with_context(|| format!("reading {}", args.items.display()))?;
    let tracks = load_tracks(&data).with_context(|| format!("loading {}", args.items.display()))?;

    let config = match &args.config {
        Some(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            TimelineConfig::from_json(&bytes)?
        }
        None => TimelineConfig::default(),
    };
    info!(tracks = tracks.len(), "loaded");

    let mut ctl = TimelineController::new(config, tracks);
    if args.dark {
        ctl.toggle_dark_mode();
    }

    if let Some(out) = &args.svg {
        let width = args.width.unwrap_or(1400.0);
        ctl.zoom_to_fit(width);
        let (_, lanes_height) = ctl.canvas_size();
        let svg = render_timeline_svg(&ctl, width, HEADER_HEIGHT + lanes_height);
        std::fs::write(out, svg).with_context(|| format!("writing {}", out.display()))?;
        info!(path = %out.display(), "svg written");
        return Ok(());
    }

    renderer::run(app::App::new(ctl))
}
