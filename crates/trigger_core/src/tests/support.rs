use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::protocol::ScraperRunRequest;
use tokio::sync::Mutex;

use crate::{
    error::TransportError,
    transport::{ScraperTransport, TriggerResponse},
};

pub(crate) enum Reply {
    Status(u16),
    Fail(TransportError),
    After(Duration, u16),
}

/// Answers each request with the next scripted reply, then `200` once the
/// script runs out.
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScraperTransport for ScriptedTransport {
    async fn trigger(
        &self,
        request: &ScraperRunRequest,
    ) -> Result<TriggerResponse, TransportError> {
        assert_eq!(*request, ScraperRunRequest {});
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(Reply::Status(200));
        match reply {
            Reply::Status(status) => Ok(TriggerResponse { status }),
            Reply::Fail(error) => Err(error),
            Reply::After(delay, status) => {
                tokio::time::sleep(delay).await;
                Ok(TriggerResponse { status })
            }
        }
    }
}
