use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use basket_weave::pattern_text::parse_pattern_text;
use basket_weave::{PatternGrid, RowWeavingInstructions, WeaveConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "weave",
    about = "Print per-round weaving instructions for a text basket pattern",
    version
)]
struct Cli {
    /// Text pattern, one line per round (bottom round first)
    #[arg(short = 'p', long = "pattern")]
    pattern: PathBuf,

    /// JSON config (axis count, center axis, palette)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Override the number of axes
    #[arg(short = 'a', long = "axes")]
    axes: Option<usize>,

    /// Override the center axis (0-based)
    #[arg(long = "center")]
    center: Option<usize>,

    /// Only print this round (0-based)
    #[arg(short = 'r', long = "row")]
    row: Option<usize>,

    /// Emit JSON instead of text
    #[arg(long = "json")]
    json: bool,
}

fn build_config(cli: &Cli) -> Result<WeaveConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => WeaveConfig::load(path)?,
        None => WeaveConfig::default(),
    };
    if let Some(axes) = cli.axes {
        config.axis_count = axes;
        if config.center_axis_index.is_some_and(|c| c >= axes) {
            config.center_axis_index = None;
        }
    }
    if cli.center.is_some() {
        config.center_axis_index = cli.center;
    }
    config.validate()?;
    Ok(config)
}

fn selected_instructions(
    grid: &PatternGrid,
    row: Option<usize>,
) -> Result<Vec<RowWeavingInstructions>, Box<dyn Error>> {
    match row {
        Some(r) => Ok(vec![grid.row_instructions(r)?]),
        None => Ok(grid.all_row_instructions()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("basket_weave=warn")),
        )
        .init();

    let cli = Cli::parse();

    if !cli.pattern.is_file() {
        return Err(format!("Not a file: {}", cli.pattern.display()).into());
    }

    let config = build_config(&cli)?;
    let text = fs::read_to_string(&cli.pattern)?;
    let grid = parse_pattern_text(&text, &config)?;

    if grid.rows.is_empty() {
        eprintln!("No rounds found in {}", cli.pattern.display());
        return Ok(());
    }

    let instructions = selected_instructions(&grid, cli.row)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&instructions)?);
        return Ok(());
    }

    println!(
        "{} axes, center axis {}",
        grid.axis_count(),
        grid.center_axis_index() + 1
    );
    for row in &instructions {
        println!();
        println!("Round {}", row.row_index + 1);
        println!("{}", row.full_instruction_text);
    }

    Ok(())
}
