use std::{path::PathBuf, thread::JoinHandle};

use derive_new::new;

use super::{ScatterApp, ViewState};
use crate::export::save_svg;
use app_core::event::{AppEvent, EventState};

// ---------------------------------------------------------------------------
//
//
// EventQueue
//
//
// ---------------------------------------------------------------------------

/// Events that are processed each iteration of the GUI event loop until
/// they report that they are finished.
pub struct EventQueue<App> {
    queue: Vec<Box<dyn AppEvent<App = App>>>,
    /// Events that have not finished yet in the current iteration.
    tmp_backlog: Vec<Box<dyn AppEvent<App = App>>>,
}

impl<App> EventQueue<App> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            tmp_backlog: Vec::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = App>>) {
        self.queue.push(event);
    }
}

impl ScatterApp {
    pub fn run_events(&mut self) {
        while let Some(mut event) = self.event_queue.queue.pop() {
            match event.apply(self) {
                Ok(EventState::Finished) => {
                    self.request_redraw();
                }
                Ok(EventState::Busy) => {
                    self.event_queue.tmp_backlog.push(event);
                }
                Err(err) => {
                    log::error!("event failed: {}", err)
                }
            }
        }
        std::mem::swap(
            &mut self.event_queue.queue,
            &mut self.event_queue.tmp_backlog,
        );
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// Waits for the save dialog running on `thread_handle`, then writes the
/// chart that is shown at that moment.
#[derive(new)]
pub struct ExportSvgRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

impl AppEvent for ExportSvgRequested {
    type App = ScatterApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) else {
            return Ok(EventState::Busy);
        };
        match handle.join() {
            Ok(Some(path)) => match &app.view {
                ViewState::Ready(plot) => save_svg(plot, &path)?,
                _ => log::warn!("nothing to export"),
            },
            Ok(None) => log::debug!("export cancelled"),
            Err(err) => return Err(format!("unable to export plot: {:?}", err)),
        }
        Ok(EventState::Finished)
    }
}
