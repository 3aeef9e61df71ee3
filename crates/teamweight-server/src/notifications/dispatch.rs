use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::line::{MULTICAST_MAX_RECIPIENTS, Message, Messenger};

/// The reminder text, linking to the LIFF entry page.
pub fn reminder_message(liff_id: Option<&str>) -> Message {
    Message::text(format!(
        "【Team Weight Manager】\n今週の体重入力の時間です！\n\n入力はこちらから:\nhttps://liff.line.me/{}",
        liff_id.unwrap_or_default()
    ))
}

/// Result of one multicast call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOutcome {
    pub index: usize,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-chunk summary of a reminder run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub recipients: usize,
    /// Recipients in chunks the provider accepted.
    pub sent: usize,
    /// Recipients in chunks that failed.
    pub failed: usize,
    pub chunks: Vec<ChunkOutcome>,
}

impl DispatchReport {
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Multicast `message` to every recipient, at most 500 per call.
#[instrument(skip_all, fields(recipients = recipients.len()))]
pub async fn dispatch_reminder(
    messenger: &dyn Messenger,
    recipients: &[String],
    message: &Message,
) -> DispatchReport {
    let mut report = DispatchReport {
        recipients: recipients.len(),
        ..DispatchReport::default()
    };
    let messages = std::slice::from_ref(message);

    for (index, chunk) in recipients.chunks(MULTICAST_MAX_RECIPIENTS).enumerate() {
        let error = match messenger.multicast(chunk, messages).await {
            Ok(()) => {
                info!(chunk = index, size = chunk.len(), "Sent reminder");
                report.sent += chunk.len();
                None
            }
            Err(e) => {
                warn!(chunk = index, size = chunk.len(), error = %e, "Failed to send reminder chunk");
                report.failed += chunk.len();
                Some(e.to_string())
            }
        };
        report.chunks.push(ChunkOutcome {
            index,
            size: chunk.len(),
            error,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::line::NotificationError;

    /// Records multicast batches and fails the call numbers in `fail_on`.
    #[derive(Default)]
    struct RecordingMessenger {
        batches: Mutex<Vec<Vec<String>>>,
        fail_on: Vec<usize>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn push(&self, to: &str, _messages: &[Message]) -> Result<(), NotificationError> {
            self.batches.lock().unwrap().push(vec![to.to_string()]);
            Ok(())
        }

        async fn multicast(
            &self,
            to: &[String],
            _messages: &[Message],
        ) -> Result<(), NotificationError> {
            let mut batches = self.batches.lock().unwrap();
            let call = batches.len();
            batches.push(to.to_vec());
            if self.fail_on.contains(&call) {
                return Err(NotificationError::ApiError {
                    status: 429,
                    body: "rate limited".into(),
                });
            }
            Ok(())
        }
    }

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("U{i}")).collect()
    }

    #[tokio::test]
    async fn splits_into_chunks_of_500() {
        let messenger = RecordingMessenger::default();
        let report = dispatch_reminder(&messenger, &ids(1201), &reminder_message(Some("L"))).await;

        let sizes: Vec<usize> = messenger
            .batches
            .lock()
            .unwrap()
            .iter()
            .map(Vec::len)
            .collect();
        assert_eq!(sizes, [500, 500, 201]);
        assert_eq!(report.recipients, 1201);
        assert_eq!(report.sent, 1201);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn failed_chunk_does_not_stop_the_rest() {
        let messenger = RecordingMessenger {
            fail_on: vec![1],
            ..RecordingMessenger::default()
        };
        let report = dispatch_reminder(&messenger, &ids(1201), &reminder_message(None)).await;

        assert_eq!(messenger.batches.lock().unwrap().len(), 3);
        assert_eq!(report.sent, 701);
        assert_eq!(report.failed, 500);
        assert!(!report.is_complete());
        assert!(report.chunks[0].error.is_none());
        assert!(report.chunks[1].error.as_deref().unwrap().contains("429"));
        assert_eq!(report.chunks[2].size, 201);
    }

    #[tokio::test]
    async fn no_recipients_sends_nothing() {
        let messenger = RecordingMessenger::default();
        let report = dispatch_reminder(&messenger, &[], &reminder_message(None)).await;
        assert!(messenger.batches.lock().unwrap().is_empty());
        assert!(report.chunks.is_empty());
    }

    #[test]
    fn reminder_links_to_liff() {
        let Message::Text { text } = reminder_message(Some("1234-abcd"));
        assert!(text.starts_with("【Team Weight Manager】"));
        assert!(text.ends_with("https://liff.line.me/1234-abcd"));
    }
}
