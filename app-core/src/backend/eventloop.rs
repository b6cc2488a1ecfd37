use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use log::{info, warn};

use crate::backend::{BackendLink, BackendRequest, BackendState};

/// Runs backend requests one after another on a dedicated thread.
pub struct BackendEventLoop<S>
where
    S: BackendState,
{
    pub state: S,
    request_rx: Receiver<Box<dyn BackendRequest<S>>>,
    should_stop: bool,
}

impl<S: BackendState + Send + 'static> BackendEventLoop<S> {
    pub fn new(request_rx: Receiver<Box<dyn BackendRequest<S>>>, state: S) -> Self {
        info!("creating new event loop");
        Self {
            state,
            request_rx,
            should_stop: false,
        }
    }

    /// Block until the next request arrives and run it. Returns `true` when
    /// the loop should end, either on request or because every sender is gone.
    pub fn update(&mut self) -> bool {
        match self.request_rx.recv() {
            Ok(request) => {
                info!("handling request '{}'", request.describe());
                request.run_on_backend(self);
                self.should_stop
            }
            Err(_) => {
                info!("request channel closed");
                true
            }
        }
    }

    pub fn run(mut self) -> JoinHandle<()> {
        std::thread::spawn(move || loop {
            if self.update() {
                info!("stopping backend event loop");
                break;
            }
        })
    }

    pub fn signal_stop(&mut self) -> bool {
        self.should_stop = true;
        true
    }
}

pub fn request_stop<S: BackendState + Send + 'static>(
    request_tx: &Sender<Box<dyn BackendRequest<S>>>,
    backend_thread_handle: JoinHandle<()>,
) {
    let (rx, signal_end_linker) =
        BackendLink::new("end event loop", |b: &mut BackendEventLoop<S>| {
            b.signal_stop()
        });
    info!("sending signal to end backend event loop");
    if request_tx.send(Box::new(signal_end_linker)).is_ok() {
        if let Err(e) = rx.recv_timeout(std::time::Duration::from_secs(10)) {
            warn!("did not receive a response after 10 seconds: {e}");
        };
    };
    match backend_thread_handle.join() {
        Ok(_) => info!("backend event loop ended"),
        Err(e) => warn!("failed to signal event loop to stop: {e:?}"),
    }
}
