#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use clap::Parser;
use snap_editor::{EditorApp, EditorError};

/// Annotate, blur and crop a screenshot
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Screenshot to edit
    image: PathBuf,

    /// Directory exported PNGs are saved into
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// HTTP endpoint that receives shared screenshots
    #[arg(long)]
    upload_endpoint: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let args = Args::parse();
    let screenshot = image::open(&args.image)
        .map_err(EditorError::from)?
        .to_rgba8();
    log::info!(
        "Loaded {} ({}x{})",
        args.image.display(),
        screenshot.width(),
        screenshot.height()
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "snap_editor",
        native_options,
        Box::new(move |cc| {
            let app = EditorApp::new(cc, screenshot, args.export_dir, args.upload_endpoint)?;
            Ok(Box::new(app))
        }),
    )?;
    Ok(())
}
