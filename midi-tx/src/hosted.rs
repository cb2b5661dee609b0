//! Hosted runtime: the transmit interrupt emulated by a consumer thread.
//!
//! On a hosted target there is no transmit interrupt, so [`HostedPort`]
//! models it with a dedicated thread fed by a notification channel:
//!
//! ```text
//!  producer ──submit──► Session ──arm──► ChannelInterrupt ──notify──► worker thread
//!                          ▲                                             │
//!                          └──────────────── on_interrupt ◄──────────────┘
//!                                                 │
//!                                                 ▼
//!                                             ByteSink
//! ```
//!
//! Every [`arm()`](crate::gate::InterruptGate::arm) posts a notification.
//! The worker answers it by calling
//! [`on_interrupt()`](Session::on_interrupt) until the session reports
//! [`DrainOutcome::Idle`], just as the hardware keeps interrupting while the
//! gate is armed. Each call still does one bounded chunk of work.
//!
//! Available with the `std` feature.

use std::io;
use std::panic;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::constants::FIFO_SIZE;
use crate::drain::DrainOutcome;
use crate::error::SessionError;
use crate::port::{ByteSink, SubmissionSource, TxInterrupt};
use crate::session::Session;
use crate::trigger::SubmitReport;

enum Event {
    Interrupt,
    Shutdown,
}

/// [`TxInterrupt`] that raises the emulated interrupt over a channel.
pub struct ChannelInterrupt {
    events: Sender<Event>,
    enabled: bool,
}

impl ChannelInterrupt {
    fn new(events: Sender<Event>) -> Self {
        ChannelInterrupt {
            events,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl TxInterrupt for ChannelInterrupt {
    fn enable(&mut self) {
        self.enabled = true;
        // Worker gone means the port is shutting down.
        let _ = self.events.send(Event::Interrupt);
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

/// An open output session drained by a background thread into sink `S`.
pub struct HostedPort<S, const N: usize = FIFO_SIZE> {
    session: Arc<Session<ChannelInterrupt, N>>,
    events: Sender<Event>,
    worker: Option<JoinHandle<S>>,
}

impl<S, const N: usize> HostedPort<S, N>
where
    S: ByteSink + Send + 'static,
{
    /// Open a session and start the worker that drains it into `sink`.
    pub fn open(sink: S) -> io::Result<Self> {
        let (events, rx) = mpsc::channel();
        let session = Arc::new(Session::new(ChannelInterrupt::new(events.clone())));
        session.open();

        let worker_session = Arc::clone(&session);
        let worker = thread::Builder::new()
            .name("midi-tx-irq".into())
            .spawn(move || run_worker(&worker_session, rx, sink))?;

        Ok(HostedPort {
            session,
            events,
            worker: Some(worker),
        })
    }

    /// Offer bytes from `source` for transmission.
    pub fn submit<T>(&self, source: &mut T) -> Result<SubmitReport, SessionError>
    where
        T: SubmissionSource + ?Sized,
    {
        self.session.on_submission_ready(source)
    }

    pub fn session(&self) -> &Session<ChannelInterrupt, N> {
        &self.session
    }

    /// Wait until every queued byte has been handed to the sink and the
    /// interrupt is disarmed. Returns `false` on timeout.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.session.queued() == 0 && !self.session.is_armed() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Close the session (discarding anything still queued), stop the
    /// worker and hand back the sink.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from the worker thread (i.e. from the sink).
    pub fn shutdown(mut self) -> S {
        match self.stop() {
            Some(Ok(sink)) => sink,
            Some(Err(payload)) => panic::resume_unwind(payload),
            None => unreachable!("worker is only taken by shutdown or drop"),
        }
    }

    fn stop(&mut self) -> Option<thread::Result<S>> {
        let worker = self.worker.take()?;
        self.session.close();
        let _ = self.events.send(Event::Shutdown);
        Some(worker.join())
    }
}

impl<S, const N: usize> Drop for HostedPort<S, N> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.session.close();
            let _ = self.events.send(Event::Shutdown);
            let _ = worker.join();
        }
    }
}

fn run_worker<S: ByteSink, const N: usize>(
    session: &Session<ChannelInterrupt, N>,
    events: Receiver<Event>,
    mut sink: S,
) -> S {
    debug!("transmit worker started");
    while let Ok(Event::Interrupt) = events.recv() {
        // Notifications still queued from before close() are stale.
        if !session.is_open() {
            continue;
        }
        loop {
            match session.on_interrupt(&mut sink) {
                Ok(DrainOutcome::Sent(_)) | Ok(DrainOutcome::SinkFailed(_)) => {}
                Ok(DrainOutcome::Idle) | Err(_) => break,
            }
        }
    }
    debug!("transmit worker stopped");
    sink
}
