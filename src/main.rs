use face_login::{
    camera::{self, V4lOpener},
    Config, DevMode, FaceLoginApp, LoginService, Webcam,
};

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "face-login")]
#[command(about = "Log in by showing your face to the webcam")]
struct Cli {
    /// Enable development mode (keeps the database and log under ./dev_data)
    #[arg(long)]
    dev: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// List capture devices and exit
    #[arg(long)]
    list_cameras: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.dev);

    if cli.list_cameras {
        return list_cameras();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let dev_mode = DevMode::new(cli.dev)?;
    dev_mode.apply(&mut config.storage);

    let login = LoginService::from_config(&config)?;
    let webcam = Webcam::new(
        Box::new(V4lOpener::new(config.camera.clone())),
        &config.camera,
        (config.window.preview_width, config.window.preview_height),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([config.window.preview_width as f32 + 240.0, config.window.preview_height as f32]),
        ..Default::default()
    };

    let title = config.window.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(FaceLoginApp::new(cc, &config, webcam, login)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))?;

    Ok(())
}

fn list_cameras() -> Result<()> {
    let cameras = camera::list_cameras()?;

    if cameras.is_empty() {
        println!("No cameras found. Check that a webcam is connected and /dev/video* is readable.");
        return Ok(());
    }

    for info in cameras {
        println!("/dev/video{}: {}", info.index, info.name);
        for format in &info.formats {
            println!("   - {}", format);
        }
    }

    Ok(())
}

fn setup_logging(dev_mode: bool) {
    if dev_mode {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }
}
