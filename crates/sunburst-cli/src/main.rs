use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use sunburst::render::raster::{RasterError, RasterOptions, svg_to_pdf, svg_to_png};
use sunburst::render::sanitize_chart_id;
use sunburst::{ChartConfig, TaxonomyNode, normalize};
use sunburst_render::svg::{SvgRenderOptions, render_sunburst_svg};
use sunburst_render::{LayoutOptions, layout_taxonomy};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Core(sunburst::Error),
    Render(sunburst_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Core(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<sunburst::Error> for CliError {
    fn from(value: sunburst::Error) -> Self {
        Self::Core(value)
    }
}

impl From<sunburst_render::Error> for CliError {
    fn from(value: sunburst_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
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
    Render,
    Normalize,
    Layout,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Pdf,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    radius: Option<f64>,
    bounds: Option<String>,
    chart_id: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
    verbosity: u8,
}

fn usage() -> &'static str {
    "sunburst-cli\n\
\n\
USAGE:\n\
  sunburst-cli normalize [--pretty] [<path>|-]\n\
  sunburst-cli layout [--pretty] [--config <path>] [--radius <r>] [--bounds actual|theoretical] [--id <chart-id>] [<path>|-]\n\
  sunburst-cli [render] [--format svg|png|pdf] [--scale <n>] [--background <css-color>] [--config <path>] [--radius <r>] [--bounds actual|theoretical] [--id <chart-id>] [--out <path>] [<path>|-]\n\
\n\
OPTIONS:\n\
  -v, -vv, -vvv   log to stderr at info, debug or trace level\n\
\n\
NOTES:\n\
  - <path> is a taxonomy JSON document; if omitted or '-', input is read from stdin.\n\
  - --config accepts a JSON or YAML (.yaml/.yml) file holding `sunburst.*` settings.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/PDF output defaults to writing next to the input file (or ./out.png|pdf for stdin).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "normalize" => args.command = Command::Normalize,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" => args.verbosity = args.verbosity.saturating_add(1),
            v if v.len() > 1 && v.starts_with('-') && v[1..].chars().all(|c| c == 'v') => {
                args.verbosity = args.verbosity.saturating_add((v.len() - 1) as u8);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--radius" => {
                let Some(r) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let r = r.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(r.is_finite() && r > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.radius = Some(r);
            }
            "--bounds" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                match mode.as_str() {
                    "actual" | "theoretical" => args.bounds = Some(mode.clone()),
                    _ => return Err(CliError::Usage(usage())),
                }
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let Some(bg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.chart_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("log level: info"),
        LevelFilter::DEBUG => tracing::debug!("log level: debug"),
        LevelFilter::TRACE => tracing::debug!("log level: trace"),
        _ => {}
    }
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

fn load_config(args: &Args) -> Result<ChartConfig, CliError> {
    let mut config = match args.config.as_deref() {
        None => ChartConfig::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let is_yaml = std::path::Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
            if is_yaml {
                ChartConfig::from_yaml_str(&text)?
            } else {
                ChartConfig::from_json_str(&text)?
            }
        }
    };

    // Command-line flags win over the config file.
    if let Some(r) = args.radius {
        config.set_value("sunburst.radius", serde_json::json!(r));
    }
    if let Some(mode) = args.bounds.as_deref() {
        config.set_value("sunburst.bounds", serde_json::json!(mode));
    }
    if let Some(id) = args.chart_id.as_deref() {
        config.set_value("sunburst.chartId", serde_json::json!(sanitize_chart_id(id)));
    }
    Ok(config)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        use std::io::Write;
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let raw = TaxonomyNode::from_json_str(&text)?;
    tracing::info!(input = args.input.as_deref().unwrap_or("-"), "read taxonomy");

    match args.command {
        Command::Normalize => {
            write_json(&normalize(&raw), args.pretty)?;
            Ok(())
        }
        Command::Layout => {
            let config = load_config(&args)?;
            let layout = layout_taxonomy(&raw, &config, &LayoutOptions::default())?;
            write_json(&layout, args.pretty)?;
            Ok(())
        }
        Command::Render => {
            let config = load_config(&args)?;
            let layout = layout_taxonomy(&raw, &config, &LayoutOptions::default())?;
            let svg_options = SvgRenderOptions {
                background: args.background.clone(),
                ..Default::default()
            };
            let svg = render_sunburst_svg(&layout, &svg_options);

            let raster = RasterOptions {
                scale: args.render_scale,
                background: args.background.clone(),
                ..Default::default()
            };
            let bytes = match args.render_format {
                RenderFormat::Svg => {
                    write_text(&svg, args.out.as_deref())?;
                    return Ok(());
                }
                RenderFormat::Png => svg_to_png(&svg, &raster)?,
                RenderFormat::Pdf => svg_to_pdf(&svg, &raster)?,
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_raster_out_path(args.input.as_deref(), args.render_format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            tracing::info!(out = %out, bytes = bytes.len(), "writing raster output");
            write_bytes(&bytes, &out)
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
        tracing::debug!(error = ?err, "command failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
