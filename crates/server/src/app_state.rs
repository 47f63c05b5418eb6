use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::launcher::ScraperLauncher;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) launcher: Arc<dyn ScraperLauncher>,
    runs_started: Arc<AtomicU64>,
}

impl AppState {
    pub(crate) fn new(launcher: Arc<dyn ScraperLauncher>) -> Self {
        Self {
            launcher,
            runs_started: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn record_run(&self) -> u64 {
        self.runs_started.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub(crate) fn runs_started(&self) -> u64 {
        self.runs_started.load(Ordering::Acquire)
    }
}
