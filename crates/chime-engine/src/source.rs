// source.rs — The upstream event source seam.
//
// The transport is out of scope; the contract is "one Build per
// notification attempt, at-least-once". The source may redeliver a build
// it already handed out, so downstream processing must tolerate
// duplicates.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use chime_event::Build;

use crate::error::SourceError;

/// Supplies build events to the engine, at-least-once.
#[async_trait]
pub trait EventSource: Send {
    /// Wait for the next build. `Ok(None)` means the subscription closed
    /// cleanly and the engine should stop.
    async fn next(&mut self, token: &CancellationToken) -> Result<Option<Build>, SourceError>;
}

/// An event source backed by a tokio mpsc channel.
///
/// Useful for tests and for embedders that bridge their own subscription
/// (queue client, webhook receiver) into the engine.
pub struct ChannelSource {
    rx: mpsc::Receiver<Build>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Build>) -> Self {
        Self { rx }
    }

    /// Create a bounded channel and a source reading from it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<Build>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx))
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn next(&mut self, token: &CancellationToken) -> Result<Option<Build>, SourceError> {
        tokio::select! {
            _ = token.cancelled() => Err(SourceError::Cancelled),
            build = self.rx.recv() => Ok(build),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_event::BuildStatus;
    use std::collections::HashMap;

    fn build(id: &str) -> Build {
        Build {
            id: id.to_string(),
            project_id: String::new(),
            status: BuildStatus::Success,
            trigger_id: None,
            substitutions: HashMap::new(),
            log_url: String::new(),
            create_time: None,
            finish_time: None,
        }
    }

    #[tokio::test]
    async fn delivers_sent_builds_in_order() {
        let (tx, mut source) = ChannelSource::channel(4);
        let token = CancellationToken::new();

        tx.send(build("b-1")).await.unwrap();
        tx.send(build("b-2")).await.unwrap();
        drop(tx);

        assert_eq!(source.next(&token).await.unwrap().unwrap().id, "b-1");
        assert_eq!(source.next(&token).await.unwrap().unwrap().id, "b-2");
        assert!(source.next(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cancellation_interrupts_waiting() {
        let (_tx, mut source) = ChannelSource::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        assert!(matches!(
            source.next(&token).await,
            Err(SourceError::Cancelled)
        ));
    }
}
