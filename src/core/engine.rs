use crate::core::matcher::MatchEngine;
use crate::core::parser::parse_order_text;
use crate::core::session::ConversionSession;
use crate::domain::ports::{AbbreviationWriter, CatalogStore};
use std::sync::Arc;
use tokio::task::JoinSet;

/// 주문 텍스트 전체를 세션 하나로 변환하는 오케스트레이터. 항목 간에는
/// 공유 상태가 없으므로 라인별 매칭을 동시에 돌린다.
pub struct ConversionEngine<S, W> {
    matcher: Arc<MatchEngine<S, W>>,
}

impl<S, W> ConversionEngine<S, W>
where
    S: CatalogStore + 'static,
    W: AbbreviationWriter + 'static,
{
    pub fn new(matcher: MatchEngine<S, W>) -> Self {
        Self {
            matcher: Arc::new(matcher),
        }
    }

    pub fn matcher(&self) -> &MatchEngine<S, W> {
        &self.matcher
    }

    pub async fn run(&self, text: &str) -> ConversionSession {
        let items = parse_order_text(text);
        tracing::info!("📋 Parsed {} order items", items.len());

        let mut tasks = JoinSet::new();
        for (index, item) in items.into_iter().enumerate() {
            let matcher = Arc::clone(&self.matcher);
            tasks.spawn(async move { matcher.resolve_line(index + 1, &item).await });
        }

        let mut session = ConversionSession::new(text);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(line) => {
                    tracing::debug!(
                        "Line {} [{} {}] -> {:?} ({}%)",
                        line.line_number,
                        line.position,
                        line.side,
                        line.status,
                        line.confidence
                    );
                    session.upsert(line);
                }
                Err(e) => tracing::error!("Match task failed: {}", e),
            }
        }

        session
    }

    /// 학습 큐까지 비우고 종료한다. `run`이 끝난 뒤에 호출해야 한다.
    pub async fn shutdown(self) {
        if let Ok(matcher) = Arc::try_unwrap(self.matcher) {
            matcher.close().await;
        }
    }
}
