use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use htmllabel::{Config, Error, PreviewOptions, RichTextBuffer};
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "htmllabel")]
#[command(about = "Render label HTML (or Markdown) to indented rich text")]
struct Cli {
    /// Input file, or `-` for stdin
    input: PathBuf,

    /// Treat the input as Markdown instead of HTML
    #[arg(long)]
    markdown: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Preview)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "htmllabel.toml")]
    config: PathBuf,

    /// Preview width in columns (overrides config)
    #[arg(short, long)]
    width: Option<usize>,

    /// Font used to measure list markers (overrides config)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Rendered text only
    Text,
    /// Text and annotations as JSON
    Json,
    /// Text laid out with list indentation applied
    Preview,
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, Error> {
    let mut config = Config::load(&cli.config)?;
    if let Some(width) = cli.width {
        config.preview.width = width;
    }
    if let Some(font) = &cli.font {
        config.font.path = Some(font.clone());
    }

    let input = read_input(&cli.input)?;
    let buf = if cli.markdown {
        htmllabel::render_markdown_with_config(&input, &config)?
    } else {
        htmllabel::render_html_with_config(&input, &config)?
    };
    tracing::debug!(
        bytes = buf.len(),
        annotations = buf.annotations().len(),
        "rendered {}",
        cli.input.display()
    );

    format_output(&buf, cli.format, &config)
}

fn read_input(path: &Path) -> Result<String, Error> {
    let result = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).map(|_| content)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn format_output(buf: &RichTextBuffer, format: Format, config: &Config) -> Result<String, Error> {
    Ok(match format {
        Format::Text => buf.text().to_string(),
        Format::Json => serde_json::to_string_pretty(buf)?,
        Format::Preview => htmllabel::preview(buf, &PreviewOptions::from(config)),
    })
}

fn setup_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .without_time()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}
