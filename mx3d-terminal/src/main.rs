/// MX3D Terminal - interactive 3×3 matrix viewer
///
/// Controls:
///   - r/s/h/f: Toggle rotate, scale, shear, flatten
///   - [ ] and Tab: Adjust the focused parameter / focus the next one
///   - Arrow keys and +/-: Edit the highlighted matrix cell
///   - p: Next preset, m: Next model, 0: Reset
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use mx3d_core::{parse::parse_matrix, BuiltinModel, Model};
use mx3d_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mx3d-terminal", version, about = "See what a 3×3 matrix does to a shape")]
struct Cli {
    /// Built-in model: cube, pyramid, diamond, house, sphere
    #[arg(short, long, default_value = "cube")]
    model: BuiltinModel,

    /// Load a model from compact JSON instead of a built-in one
    #[arg(long, value_name = "PATH")]
    model_file: Option<PathBuf>,

    /// Starting matrix, rows separated by `;`
    #[arg(long, value_name = "ROWS", allow_hyphen_values = true)]
    matrix: Option<String>,

    /// Write diagnostics to this file (RUST_LOG overrides the filter)
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Horizontal stretch that compensates for tall terminal cells
    #[arg(long, default_value_t = 2.0)]
    aspect: f32,
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mx3d_core=debug,mx3d_terminal=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Stdout belongs to the viewer, so logs only go to a file
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let model = match &cli.model_file {
        Some(path) => Model::from_compact_json_file(path)
            .with_context(|| format!("failed to load model {}", path.display()))?,
        None => cli.model.build(),
    };
    tracing::info!(label = %model.label, faces = model.faces.len(), "model ready");

    let mut app = TerminalApp::new(model, cli.aspect).context("failed to query terminal size")?;
    if cli.model_file.is_none() {
        app = app.with_builtin(cli.model);
    }
    if let Some(text) = &cli.matrix {
        let matrix = parse_matrix(text).context("invalid --matrix")?;
        app = app.with_matrix(matrix);
    }

    app.run().context("terminal session failed")?;
    Ok(())
}
