pub mod canvas;
pub mod config;
mod events;

use std::{sync::mpsc::Sender, thread::JoinHandle, time::Duration};

use app_core::{backend::BackendRequest, frontend::UIParameter};
use svg_export::Scene;

use crate::{
    loader::{request_load, BackendAppState, DynRequestSender, LoadResult},
    plot::{Layout, PlotError, ScatterPlot},
};
use config::Config;
use events::{EventQueue, ExportSvgRequested};

/// Shown if the backend goes away before it answered.
const LOAD_ABORTED: &str = "the backend stopped before the data was loaded";
/// Polling interval while the backend is loading.
const LOAD_POLL: Duration = Duration::from_millis(100);

enum ViewState {
    Loading(UIParameter<LoadResult>),
    Ready(Box<ScatterPlot<Scene>>),
    NoData,
    Failed(String),
}

impl ViewState {
    /// Turn a finished load into a drawn chart or the state explaining why
    /// there is none.
    fn from_load(result: LoadResult, layout: Layout) -> Self {
        let records = match result {
            Ok(records) => records,
            Err(err) => {
                log::error!("{}", err);
                return Self::Failed(err);
            }
        };
        match ScatterPlot::new(records, Scene::new(layout.width, layout.height), layout) {
            Ok(mut plot) => {
                plot.draw();
                Self::Ready(Box::new(plot))
            }
            Err(PlotError::NoData) => {
                log::warn!("{}", PlotError::NoData);
                Self::NoData
            }
            Err(err) => {
                log::error!("{}", err);
                Self::Failed(err.to_string())
            }
        }
    }
}

pub struct ScatterApp {
    config: Config,
    backend_thread_handle: Option<JoinHandle<()>>,
    request_tx: DynRequestSender,
    view: ViewState,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
}

impl ScatterApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        request_tx: Sender<Box<dyn BackendRequest<BackendAppState>>>,
        backend_thread_handle: JoinHandle<()>,
    ) -> Self {
        let mut app = Self {
            config,
            backend_thread_handle: Some(backend_thread_handle),
            request_tx,
            view: ViewState::NoData,
            event_queue: EventQueue::<Self>::new(),
            request_redraw: None,
        };
        app.reload();
        app
    }

    /// Load the configured file again. A load still running is cancelled.
    pub fn reload(&mut self) {
        let mut pending = UIParameter::new(Err(LOAD_ABORTED.to_owned()));
        pending.set_recv(request_load(
            &self.request_tx,
            &self.config.data_path,
            self.config.policy,
        ));
        self.view = ViewState::Loading(pending);
    }

    fn update_state(&mut self) {
        self.run_events();
        let ViewState::Loading(pending) = &mut self.view else {
            return;
        };
        if !pending.try_update() {
            return;
        }
        let result = std::mem::replace(pending.value_mut(), Err(LOAD_ABORTED.to_owned()));
        self.view = ViewState::from_load(result, self.config.layout());
        self.request_redraw();
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    fn export(&mut self) {
        log::debug!("open dialog to select svg plot path");
        let handle = std::thread::spawn(|| {
            rfd::FileDialog::new()
                .set_file_name("scatterplot.svg")
                .add_filter("SVG", &["svg"])
                .save_file()
        });
        let event = ExportSvgRequested::new(Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }
}

impl eframe::App for ScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }

        self.update_state();

        ctx.input(|i| {
            if i.key_pressed(egui::Key::R) {
                if let ViewState::Ready(plot) = &mut self.view {
                    plot.reset_zoom();
                }
            }
        });

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.menu(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.central_panel(ui, ctx);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.backend_thread_handle.take() {
            app_core::backend::request_stop(&self.request_tx, handle);
        }
    }
}

impl ScatterApp {
    fn central_panel(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut should_reload = false;
        match &mut self.view {
            ViewState::Loading(_) => {
                ui.centered_and_justified(|ui| ui.spinner());
                ctx.request_repaint_after(LOAD_POLL);
            }
            ViewState::Ready(plot) => {
                if canvas::show(plot, ui) {
                    ctx.request_repaint();
                }
            }
            ViewState::NoData => {
                ui.label(format!(
                    "{:?} contains no plottable records.",
                    self.config.data_path
                ));
                should_reload = ui.button("Reload").clicked();
            }
            ViewState::Failed(err) => {
                ui.colored_label(ui.visuals().error_fg_color, err.as_str());
                should_reload = ui.button("Reload").clicked();
            }
        }
        if should_reload {
            self.reload();
        }
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Reload").clicked() {
                    self.reload();
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            let is_ready = matches!(self.view, ViewState::Ready(_));
            if ui
                .add_enabled(is_ready, egui::Button::new("Export"))
                .clicked()
            {
                self.export();
            }
            if ui
                .add_enabled(is_ready, egui::Button::new("Reset View (R)"))
                .clicked()
            {
                if let ViewState::Ready(plot) = &mut self.view {
                    plot.reset_zoom();
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
            });
        });
    }
}
