use std::sync::mpsc::TryRecvError;

use log::{debug, warn};

use crate::backend::LinkReceiver;

/// A value shown by the frontend that may be waiting for a fresh value from
/// the backend.
#[derive(Debug)]
pub struct UIParameter<T> {
    pending_update_rx: Option<LinkReceiver<T>>,
    value: T,
}

impl<T: Default> Default for UIParameter<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> UIParameter<T> {
    pub fn new(val: T) -> Self {
        UIParameter {
            pending_update_rx: None,
            value: val,
        }
    }

    /// Poll the pending receiver. Returns `true` if the value changed or the
    /// pending request went away.
    pub fn try_update(&mut self) -> bool {
        let Some(rx) = &self.pending_update_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(val) => {
                debug!("received update from backend");
                self.value = val;
                self.pending_update_rx = None;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!("tried to receive message from closed channel");
                self.pending_update_rx = None;
                true
            }
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        self.pending_update_rx.is_none()
    }

    /// Wait for `rx`. A receiver that was pending before is dropped, which
    /// cancels its request.
    pub fn set_recv(&mut self, rx: LinkReceiver<T>) {
        self.pending_update_rx = Some(rx);
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}
