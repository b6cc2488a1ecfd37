#![warn(clippy::all, rust_2018_idioms)]

use std::process::ExitCode;

use app_core::backend::BackendEventLoop;
use clap::Parser;
use scatterplot::{cli::Args, export::run_headless, BackendAppState, Config, ScatterApp};

const WINDOW_NAME: &str = "Scatterplot";

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = if args.no_config {
        Config::default()
    } else {
        match Config::from_config_file() {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{}, using defaults", err);
                Config::default()
            }
        }
    };
    config.apply_args(&args);
    log::debug!("{:?}", config);

    let result = if args.is_headless() {
        run_headless(&config, args.export.as_deref(), args.geometry.as_deref())
    } else {
        run_viewer(config).map_err(|err| format!("viewer failed: {err}"))
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run_viewer(config: Config) -> eframe::Result {
    // start backend loop
    let (request_tx, request_rx) = std::sync::mpsc::channel();
    let eventloop_handle = BackendEventLoop::new(request_rx, BackendAppState::new()).run();

    let layout = config.layout();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([layout.width as f32 + 20.0, layout.height as f32 + 50.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(ScatterApp::new(
                cc,
                config,
                request_tx,
                eventloop_handle,
            )))
        }),
    )
}
