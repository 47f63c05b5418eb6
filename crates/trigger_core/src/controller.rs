use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{
    domain::{ButtonAppearance, ButtonState, ClickId},
    protocol::ScraperRunRequest,
};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info, warn};

use crate::{config::TriggerSettings, transport::ScraperTransport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Started { click_id: ClickId, status: u16 },
    Rejected { click_id: ClickId, status: u16 },
    TransportFailed { click_id: ClickId, reason: String },
    /// The pending guard is on and a request was already in flight.
    Ignored,
}

impl ClickOutcome {
    pub fn click_id(&self) -> Option<ClickId> {
        match self {
            ClickOutcome::Started { click_id, .. }
            | ClickOutcome::Rejected { click_id, .. }
            | ClickOutcome::TransportFailed { click_id, .. } => Some(*click_id),
            ClickOutcome::Ignored => None,
        }
    }

    pub fn settled_state(&self) -> Option<ButtonState> {
        match self {
            ClickOutcome::Started { .. } => Some(ButtonState::Success),
            ClickOutcome::Rejected { .. } | ClickOutcome::TransportFailed { .. } => {
                Some(ButtonState::Failure)
            }
            ClickOutcome::Ignored => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    StateChanged {
        click_id: ClickId,
        from: ButtonState,
        to: ButtonState,
    },
    RequestIssued {
        click_id: ClickId,
    },
    ClickIgnored,
}

/// State shared between the controller and its reset timers.
struct ButtonDisplay {
    state: watch::Sender<ButtonState>,
    events: broadcast::Sender<TriggerEvent>,
    in_flight: AtomicUsize,
}

impl ButtonDisplay {
    /// A settled label stays up until its own reset, so only an idle button
    /// shows the request as pending.
    fn begin(&self, click_id: ClickId) {
        self.apply(click_id, |current| {
            (current == ButtonState::Idle).then_some(ButtonState::Pending)
        });
    }

    fn settle(&self, click_id: ClickId, to: ButtonState) {
        self.apply(click_id, |_| Some(to));
    }

    /// Clears a settled label. Requests still in flight show as pending again
    /// and schedule their own reset once they settle.
    fn reset(&self, click_id: ClickId) {
        self.apply(click_id, |current| {
            current.is_settled().then(|| self.resting_state())
        });
    }

    /// A click that never settled only returns the button to idle when it
    /// was the last request in flight.
    fn abandon(&self, click_id: ClickId) {
        self.apply(click_id, |current| {
            (current == ButtonState::Pending).then(|| self.resting_state())
        });
    }

    fn resting_state(&self) -> ButtonState {
        if self.in_flight.load(Ordering::Acquire) > 0 {
            ButtonState::Pending
        } else {
            ButtonState::Idle
        }
    }

    // Check and write happen under one watch lock.
    fn apply<F>(&self, click_id: ClickId, next: F)
    where
        F: FnOnce(ButtonState) -> Option<ButtonState>,
    {
        let mut change = None;
        self.state.send_if_modified(|current| match next(*current) {
            Some(to) if to != *current => {
                change = Some((*current, to));
                *current = to;
                true
            }
            _ => false,
        });

        if let Some((from, to)) = change {
            debug!(%click_id, ?from, ?to, "button state changed");
            let _ = self
                .events
                .send(TriggerEvent::StateChanged { click_id, from, to });
        }
    }
}

/// Holds one slot of `in_flight` for a click. Dropping it before `settled` is
/// set means the click future was cancelled mid-request.
struct InFlight<'a> {
    display: &'a ButtonDisplay,
    click_id: ClickId,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.display.in_flight.fetch_sub(1, Ordering::AcqRel);
        if !self.settled {
            debug!(click_id = %self.click_id, "click dropped before the request settled");
            self.display.abandon(self.click_id);
        }
    }
}

pub struct TriggerController {
    transport: Arc<dyn ScraperTransport>,
    reset_delay: Duration,
    allow_concurrent: bool,
    next_click: AtomicU64,
    display: Arc<ButtonDisplay>,
}

impl TriggerController {
    pub fn new(transport: Arc<dyn ScraperTransport>, settings: &TriggerSettings) -> Arc<Self> {
        let (state, _) = watch::channel(ButtonState::Idle);
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            transport,
            reset_delay: settings.reset_delay(),
            allow_concurrent: settings.allow_concurrent,
            next_click: AtomicU64::new(0),
            display: Arc::new(ButtonDisplay {
                state,
                events,
                in_flight: AtomicUsize::new(0),
            }),
        })
    }

    pub fn state(&self) -> ButtonState {
        *self.display.state.borrow()
    }

    pub fn appearance(&self) -> ButtonAppearance {
        self.state().appearance()
    }

    pub fn in_flight(&self) -> usize {
        self.display.in_flight.load(Ordering::Acquire)
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ButtonState> {
        self.display.state.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TriggerEvent> {
        self.display.events.subscribe()
    }

    /// One activation: post the run request, settle the label from the status,
    /// and schedule the reset. Returns once the label is settled.
    ///
    /// Dropping the future mid-request releases its in-flight slot and leaves
    /// no pending state behind.
    pub async fn click(&self) -> ClickOutcome {
        if !self.try_begin() {
            debug!("click ignored while a scraper request is pending");
            let _ = self.display.events.send(TriggerEvent::ClickIgnored);
            return ClickOutcome::Ignored;
        }

        let click_id = ClickId(self.next_click.fetch_add(1, Ordering::Relaxed) + 1);
        let mut slot = InFlight {
            display: &self.display,
            click_id,
            settled: false,
        };
        info!(%click_id, "starting scraper");
        self.display.begin(click_id);
        let _ = self
            .display
            .events
            .send(TriggerEvent::RequestIssued { click_id });

        let outcome = match self.transport.trigger(&ScraperRunRequest::default()).await {
            Ok(response) if response.is_ok() => {
                info!(%click_id, status = response.status, "scraper started");
                ClickOutcome::Started {
                    click_id,
                    status: response.status,
                }
            }
            Ok(response) => {
                warn!(%click_id, status = response.status, "scraper run rejected");
                ClickOutcome::Rejected {
                    click_id,
                    status: response.status,
                }
            }
            Err(error) => {
                warn!(%click_id, %error, "scraper request failed before a response");
                ClickOutcome::TransportFailed {
                    click_id,
                    reason: error.to_string(),
                }
            }
        };

        if let Some(settled) = outcome.settled_state() {
            self.display.settle(click_id, settled);
        }
        slot.settled = true;
        drop(slot);
        self.schedule_reset(click_id);
        outcome
    }

    /// Runs `click` on its own task so the caller is never suspended.
    pub fn spawn_click(self: &Arc<Self>) -> JoinHandle<ClickOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.click().await })
    }

    /// Resolves once the button shows `Idle` with no request in flight.
    pub async fn wait_until_idle(&self) {
        let mut state = self.display.state.subscribe();
        loop {
            if *state.borrow_and_update() == ButtonState::Idle && self.in_flight() == 0 {
                return;
            }
            if state.changed().await.is_err() {
                return;
            }
        }
    }

    fn try_begin(&self) -> bool {
        if self.allow_concurrent {
            self.display.in_flight.fetch_add(1, Ordering::AcqRel);
            return true;
        }
        self.display
            .in_flight
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    // Timers are never cancelled; overlapping clicks race their resets.
    fn schedule_reset(&self, click_id: ClickId) {
        let deadline = Instant::now() + self.reset_delay;
        let display = Arc::clone(&self.display);
        tokio::spawn(async move {
            sleep_until(deadline).await;
            display.reset(click_id);
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
