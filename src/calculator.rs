use crate::config::Config;
use crate::error::{Result, UsageError};
use crate::resolver::ReportResolver;
use crate::scoring::CostScorer;
use crate::sources::{HttpMessageSource, HttpReportLookup, MessageSource, ReportLookup, build_client};
use crate::types::{Message, Report, UsageRecord};
use rayon::prelude::*;
use std::sync::Arc;
use tokio::task;
use tracing::info;

/// Computes per-message usage from the message and report stores
pub struct UsageCalculator {
    messages: Arc<dyn MessageSource>,
    resolver: ReportResolver,
    scorer: Arc<CostScorer>,
}

impl UsageCalculator {
    pub fn new(
        messages: Arc<dyn MessageSource>,
        resolver: ReportResolver,
        scorer: CostScorer,
    ) -> Self {
        Self {
            messages,
            resolver,
            scorer: Arc::new(scorer),
        }
    }

    /// Wire HTTP sources from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_client(config.request_timeout)?;
        let messages = HttpMessageSource::new(client.clone(), config.messages_url.clone());
        let lookup: Arc<dyn ReportLookup> =
            Arc::new(HttpReportLookup::new(client, config.reports_url.clone()));
        let resolver =
            ReportResolver::new(lookup).with_max_concurrent(config.max_concurrent_lookups);

        Ok(Self::new(
            Arc::new(messages),
            resolver,
            CostScorer::new(config.scoring.clone()),
        ))
    }

    /// One record per message, in message order. Any transport, validation
    /// or processing failure aborts the whole computation.
    pub async fn compute_usage(&self) -> Result<Vec<UsageRecord>> {
        let messages = self.messages.list().await?;
        let reports = self.resolver.resolve(&messages).await?;

        let scorer = Arc::clone(&self.scorer);
        let usage = task::spawn_blocking(move || merge(messages, reports, &scorer)).await??;

        info!(
            records = usage.len(),
            from_reports = usage.iter().filter(|r| r.is_report()).count(),
            "usage computed"
        );
        Ok(usage)
    }
}

/// Pair each message with its resolved report, scoring the rest in parallel.
/// Ordering is preserved by the indexed parallel collect.
pub fn merge(
    messages: Vec<Message>,
    reports: Vec<Option<Report>>,
    scorer: &CostScorer,
) -> Result<Vec<UsageRecord>> {
    if let Some(unpaired) = messages.get(reports.len()) {
        return Err(UsageError::Processing {
            message_id: unpaired.id,
            detail: format!(
                "{} report slots for {} messages",
                reports.len(),
                messages.len()
            ),
        });
    }

    messages
        .into_par_iter()
        .zip(reports.into_par_iter())
        .map(|(message, report)| usage_record(message, report, scorer))
        .collect()
}

fn usage_record(
    message: Message,
    report: Option<Report>,
    scorer: &CostScorer,
) -> Result<UsageRecord> {
    match report {
        Some(report) => {
            if message.report_id != Some(report.id) {
                return Err(UsageError::Processing {
                    message_id: message.id,
                    detail: format!(
                        "resolved report {} does not match requested report {:?}",
                        report.id,
                        message.report_id.map(|id| id.get())
                    ),
                });
            }
            Ok(UsageRecord {
                message_id: message.id,
                timestamp: message.timestamp,
                report_name: Some(report.name),
                credits_used: report.credit_cost,
            })
        }
        None => Ok(UsageRecord {
            credits_used: scorer.score(&message.text),
            message_id: message.id,
            timestamp: message.timestamp,
            report_name: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ScoringConfig;
    use crate::sources::{MockMessageSource, MockReportLookup};
    use crate::types::{Credits, MessageId, ReportId};
    use mockall::predicate::eq;

    fn message(id: i64, text: &str, report_id: Option<i64>) -> Message {
        Message {
            id: MessageId::new(id),
            text: text.to_string(),
            timestamp: format!("2024-04-29T0{}:00:00Z", id % 10),
            report_id: report_id.map(ReportId::new),
        }
    }

    fn report(id: i64, name: &str, cost: Credits) -> Report {
        Report {
            id: ReportId::new(id),
            name: name.to_string(),
            credit_cost: cost,
        }
    }

    fn calculator(messages: Vec<Message>, lookup: MockReportLookup) -> UsageCalculator {
        let mut source = MockMessageSource::new();
        source
            .expect_list()
            .times(1)
            .returning(move || Ok(messages.clone()));
        UsageCalculator::new(
            Arc::new(source),
            ReportResolver::new(Arc::new(lookup)),
            CostScorer::default(),
        )
    }

    #[tokio::test]
    async fn mixes_report_costs_and_scored_fallbacks_in_order() {
        let messages = vec![
            message(1, "Hello world", None),
            message(2, "Generate a lease report", Some(5392)),
            message(3, "hello hello", Some(404)),
            message(4, "A man a plan a canal Panama", None),
        ];
        let mut lookup = MockReportLookup::new();
        lookup
            .expect_get()
            .with(eq(ReportId::new(5392)))
            .returning(|_| Ok(Some(report(5392, "Tenant Obligations Report", Credits::whole(79)))));
        lookup
            .expect_get()
            .with(eq(ReportId::new(404)))
            .returning(|_| Ok(None));

        let usage = calculator(messages, lookup).compute_usage().await.unwrap();

        let ids: Vec<_> = usage.iter().map(|r| r.message_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        assert_eq!(usage[0].report_name, None);
        assert_eq!(usage[0].credits_used, Credits::whole(1));
        assert_eq!(usage[0].timestamp, "2024-04-29T01:00:00Z");

        assert_eq!(usage[1].report_name.as_deref(), Some("Tenant Obligations Report"));
        assert_eq!(usage[1].credits_used, Credits::whole(79));

        // unknown report falls back to scoring
        assert_eq!(usage[2].report_name, None);
        assert_eq!(usage[2].credits_used, Credits::hundredths(195));

        assert_eq!(usage[3].report_name, None);
        assert_eq!(usage[3].credits_used, Credits::tenths(73));
    }

    #[tokio::test]
    async fn fallback_equals_score_of_text() {
        let texts = [
            "What is the rent review date?",
            "",
            "racecar",
            "Please summarise clauses 4-7 of the headlease, it's urgent.",
        ];
        let messages: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| message(i as i64, text, None))
            .collect();
        let mut lookup = MockReportLookup::new();
        lookup.expect_get().never();

        let usage = calculator(messages, lookup).compute_usage().await.unwrap();

        let scorer = CostScorer::default();
        for (record, text) in usage.iter().zip(texts) {
            assert_eq!(record.report_name, None);
            assert_eq!(record.credits_used, scorer.score(text));
        }
    }

    #[tokio::test]
    async fn transport_error_returns_no_records() {
        let messages = vec![
            message(1, "first", Some(1)),
            message(2, "second", None),
            message(3, "third", Some(3)),
        ];
        let mut lookup = MockReportLookup::new();
        lookup
            .expect_get()
            .with(eq(ReportId::new(1)))
            .returning(|_| Ok(Some(report(1, "ok", Credits::whole(2)))));
        lookup
            .expect_get()
            .with(eq(ReportId::new(3)))
            .returning(|_| {
                Err(UsageError::UpstreamStatus {
                    url: "http://reports/3".to_string(),
                    status: 500,
                })
            });

        let err = calculator(messages, lookup).compute_usage().await.unwrap_err();
        assert!(matches!(err, UsageError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn message_source_failure_is_propagated() {
        let mut source = MockMessageSource::new();
        source.expect_list().returning(|| {
            Err(UsageError::InvalidData {
                message: "bad listing".to_string(),
            })
        });
        let calculator = UsageCalculator::new(
            Arc::new(source),
            ReportResolver::new(Arc::new(MockReportLookup::new())),
            CostScorer::default(),
        );

        let err = calculator.compute_usage().await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn configured_base_cost_is_used() {
        let mut source = MockMessageSource::new();
        source
            .expect_list()
            .returning(|| Ok(vec![message(1, "Hello world", None)]));
        let scorer = CostScorer::new(ScoringConfig::new(Credits::tenths(25), "aeiou"));
        let calculator = UsageCalculator::new(
            Arc::new(source),
            ReportResolver::new(Arc::new(MockReportLookup::new())),
            scorer,
        );

        let usage = calculator.compute_usage().await.unwrap();
        assert_eq!(usage[0].credits_used, Credits::tenths(25));
    }

    #[test]
    fn merge_rejects_missing_slots() {
        let messages = vec![message(1, "a", None), message(2, "b", None)];
        let err = merge(messages, vec![None], &CostScorer::default()).unwrap_err();
        assert!(
            matches!(err, UsageError::Processing { message_id, .. } if message_id == MessageId::new(2))
        );
    }

    #[test]
    fn merge_rejects_mismatched_report() {
        let messages = vec![message(7, "a", Some(1))];
        let reports = vec![Some(report(2, "other", Credits::whole(1)))];
        let err = merge(messages, reports, &CostScorer::default()).unwrap_err();
        assert!(err.is_processing());
        assert!(err.to_string().contains("message 7"));
    }

    #[test]
    fn merge_preserves_order_for_large_batches() {
        let messages: Vec<_> = (0..500)
            .map(|i| message(i, &"word ".repeat(i as usize % 13), None))
            .collect();
        let expected: Vec<_> = messages.iter().map(|m| m.id).collect();
        let reports = vec![None; messages.len()];

        let usage = merge(messages, reports, &CostScorer::default()).unwrap();
        let ids: Vec<_> = usage.iter().map(|r| r.message_id).collect();
        assert_eq!(ids, expected);
    }
}
