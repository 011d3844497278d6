use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mask_renderer::{
    Color, Configurable, DEFAULT_EXPORT_NAME, MaskError, MaskProfile, PipelineState, Threshold,
};

#[derive(Parser)]
#[command(name = "mask-renderer")]
#[command(about = "Recolor an image by brightness threshold and save it as PNG")]
struct Cli {
    /// Input image (PNG, JPEG, GIF, BMP, WebP, ...)
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
    output: PathBuf,

    /// Load parameters from a JSON profile before applying the flags below
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Write the effective parameters to a JSON profile
    #[arg(long)]
    save_profile: Option<PathBuf>,

    /// Brightness cutoff (0-765); pixels with r+g+b at or below it are masked
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<i32>,

    /// Mask color as hex RGB (e.g. "#c89623")
    #[arg(long)]
    mask_color: Option<String>,

    /// Mask opacity (0.0-1.0)
    #[arg(long)]
    mask_alpha: Option<f32>,

    /// Background color as hex RGB (e.g. "#000000")
    #[arg(long)]
    background_color: Option<String>,

    /// Background opacity (0.0-1.0)
    #[arg(long)]
    background_alpha: Option<f32>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), MaskError> {
    let mut state = PipelineState::new();

    if let Some(path) = &cli.profile {
        let json = std::fs::read_to_string(path)?;
        state.apply_profile(&MaskProfile::from_json(&json)?);
        tracing::info!("Loaded profile from {}", path.display());
    }

    let mut params = *state.parameters();
    if let Some(threshold) = cli.threshold {
        params.threshold = Threshold::new(threshold);
    }
    params.mask_color = override_color(
        params.mask_color,
        cli.mask_color.as_deref(),
        cli.mask_alpha,
    )?;
    params.background_color = override_color(
        params.background_color,
        cli.background_color.as_deref(),
        cli.background_alpha,
    )?;
    state.set_parameters(params);

    let bytes = std::fs::read(&cli.input)?;
    state.load_encoded(&bytes)?;
    state.convert()?;
    std::fs::write(&cli.output, state.export_output()?)?;

    tracing::info!(
        threshold = params.threshold.get(),
        mask = %params.mask_color.to_hex(),
        background = %params.background_color.to_hex(),
        "Wrote {}",
        cli.output.display()
    );

    if let Some(path) = &cli.save_profile {
        let json = state.export_profile().to_json_pretty()?;
        std::fs::write(path, json)?;
        tracing::info!("Saved profile to {}", path.display());
    }

    Ok(())
}

/// Replaces the RGB part and/or the opacity of `base`.
fn override_color(
    base: Color,
    hex: Option<&str>,
    alpha: Option<f32>,
) -> Result<Color, MaskError> {
    let alpha = alpha.unwrap_or(base.a);
    match hex {
        Some(hex) => Color::from_hex(hex, alpha),
        None => Ok(Color::new(base.r, base.g, base.b, alpha)),
    }
}
