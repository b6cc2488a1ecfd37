#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod event;
pub mod frontend;
pub mod string_error;

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use log::trace;

    use crate::backend::{request_stop, BackendEventLoop, BackendLink, BackendState};
    use crate::frontend::UIParameter;

    #[derive(Default)]
    struct TestState {
        handled: usize,
    }
    impl BackendState for TestState {}

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_cancel_request_working() {
        init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let tic = Instant::now();

        let (rx, linker) = BackendLink::new("test", |_: &mut BackendEventLoop<TestState>| {
            std::thread::sleep(Duration::from_millis(1000));
        });

        // Dropping rx makes the request invalid, so the backend action
        // (waiting for 1 s) is never executed ...
        drop(rx);
        trace!("drop of receiver done");
        assert!(linker.is_cancelled());
        request_tx.send(Box::new(linker)).unwrap();
        request_stop(&request_tx, eventloop_handle);
        // ... and stopping the loop takes much less than the action would.
        assert!(tic.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_requests_run_in_order_on_backend_state() {
        init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let (first, link) = BackendLink::new("first", |b: &mut BackendEventLoop<TestState>| {
            b.state.handled += 1;
            b.state.handled
        });
        request_tx.send(Box::new(link)).unwrap();
        let (second, link) = BackendLink::new("second", |b: &mut BackendEventLoop<TestState>| {
            b.state.handled += 1;
            b.state.handled
        });
        request_tx.send(Box::new(link)).unwrap();

        assert_eq!(first.recv_timeout(Duration::from_secs(5)), Ok(1));
        assert_eq!(second.recv_timeout(Duration::from_secs(5)), Ok(2));
        request_stop(&request_tx, eventloop_handle);
    }

    #[test]
    fn test_ui_parameter_receives_backend_result() {
        init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let mut param = UIParameter::new(0usize);
        let (rx, link) = BackendLink::new("answer", |_: &mut BackendEventLoop<TestState>| 42);
        param.set_recv(rx);
        assert!(!param.is_up_to_date());
        request_tx.send(Box::new(link)).unwrap();

        let tic = Instant::now();
        while !param.try_update() {
            assert!(tic.elapsed() < Duration::from_secs(5), "no reply from backend");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(param.is_up_to_date());
        assert_eq!(*param.value(), 42);
        request_stop(&request_tx, eventloop_handle);
    }

    #[test]
    fn test_event_loop_ends_when_senders_are_dropped() {
        init();

        let (request_tx, request_rx) =
            std::sync::mpsc::channel::<Box<dyn crate::backend::BackendRequest<TestState>>>();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();
        drop(request_tx);
        assert!(eventloop_handle.join().is_ok());
    }
}
