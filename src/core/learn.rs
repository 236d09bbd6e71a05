use crate::domain::model::NewAbbreviation;
use crate::domain::ports::AbbreviationWriter;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;

pub(crate) enum LearnTask {
    Record(NewAbbreviation),
    Bump(String),
}

/// 매칭 응답을 막지 않는 약어 기록 큐. 워커가 채널을 비우며 Writer를 호출하고,
/// 실패는 경고 로그로만 남긴다.
pub struct LearnQueue {
    tx: UnboundedSender<LearnTask>,
    worker: JoinHandle<()>,
}

impl LearnQueue {
    pub fn spawn<W: AbbreviationWriter + 'static>(writer: Arc<W>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(async move {
            while let Some(task) = rx.recv().await {
                match task {
                    LearnTask::Record(entry) => {
                        let input = entry.input_abbr.clone();
                        if let Err(e) = writer.record_abbreviation(entry).await {
                            tracing::warn!("Auto-learn write failed for '{}': {}", input, e);
                        }
                    }
                    LearnTask::Bump(id) => {
                        if let Err(e) = writer.increment_usage(&id).await {
                            tracing::warn!("Usage increment failed for {}: {}", id, e);
                        }
                    }
                }
            }
        });

        Self { tx, worker }
    }

    pub fn record(&self, entry: NewAbbreviation) {
        if self.tx.send(LearnTask::Record(entry)).is_err() {
            tracing::warn!("Learn queue closed; abbreviation dropped");
        }
    }

    pub fn bump(&self, id: String) {
        if self.tx.send(LearnTask::Bump(id)).is_err() {
            tracing::warn!("Learn queue closed; usage bump dropped");
        }
    }

    /// 큐를 닫고 남은 작업이 모두 처리될 때까지 기다린다.
    pub async fn close(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::warn!("Learn worker ended abnormally: {}", e);
        }
    }
}
