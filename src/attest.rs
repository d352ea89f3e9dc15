use std::time::Duration;

use async_trait::async_trait;
use ethers::types::{Address, I256};

use crate::config::OFFCHAIN_SCORE_RESERVED;
use crate::error::{AppError, Result};
use crate::types::{AttestationHandle, ScoreSnapshot};

/// External notarization collaborator. Durably records an ordered integer
/// payload under a schema identifier, indexed by the subject address, and
/// returns the created record's handle. The service does not deduplicate:
/// submitting the same payload twice creates two records.
#[async_trait]
pub trait AttestationSink: Send + Sync {
    async fn submit(
        &self,
        schema_id: &str,
        payload: Vec<I256>,
        subject: Address,
    ) -> Result<AttestationHandle>;
}

/// Packages a score snapshot into an attestation record and submits it.
pub struct AttestationPublisher<N> {
    sink: N,
    schema_id: String,
    timeout: Duration,
}

impl<N: AttestationSink> AttestationPublisher<N> {
    pub fn new(sink: N, schema_id: String, timeout: Duration) -> Self {
        Self {
            sink,
            schema_id,
            timeout,
        }
    }

    /// Submit the score for `subject`, once. A submission that outlives the
    /// deadline is reported as ambiguous (the record may or may not have
    /// been created) and is never retried.
    pub async fn publish(
        &self,
        snapshot: &ScoreSnapshot,
        subject: Address,
    ) -> Result<AttestationHandle> {
        let payload = score_payload(snapshot);
        match tokio::time::timeout(
            self.timeout,
            self.sink.submit(&self.schema_id, payload, subject),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AppError::PublishTimedOut {
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

/// Payload layout: [onchain score, offchain score]. The off-chain slot is
/// reserved for a future reputation signal and is always zero.
pub fn score_payload(snapshot: &ScoreSnapshot) -> Vec<I256> {
    vec![
        I256::from(snapshot.percentage_score),
        I256::from(OFFCHAIN_SCORE_RESERVED),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::scorer::compute_score;
    use ethers::types::TxHash;

    /// Records every submission it receives.
    struct RecordingSink {
        seen: Mutex<Vec<(String, Vec<I256>, Address)>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AttestationSink for RecordingSink {
        async fn submit(
            &self,
            schema_id: &str,
            payload: Vec<I256>,
            subject: Address,
        ) -> Result<AttestationHandle> {
            self.seen
                .lock()
                .unwrap()
                .push((schema_id.to_string(), payload, subject));
            Ok(AttestationHandle {
                id: 42,
                tx_hash: TxHash::zero(),
            })
        }
    }

    /// Never resolves; used to trigger the submission deadline.
    struct StalledSink;

    #[async_trait]
    impl AttestationSink for StalledSink {
        async fn submit(
            &self,
            _schema_id: &str,
            _payload: Vec<I256>,
            _subject: Address,
        ) -> Result<AttestationHandle> {
            std::future::pending().await
        }
    }

    #[test]
    fn payload_is_score_then_reserved_zero() {
        let snapshot = compute_score(1000.0, 200.0, 50.0).unwrap();
        let payload = score_payload(&snapshot);
        assert_eq!(payload, vec![I256::from(80), I256::zero()]);
    }

    #[test]
    fn negative_score_is_carried_signed() {
        let snapshot = compute_score(100.0, 500.0, 0.0).unwrap();
        let payload = score_payload(&snapshot);
        assert_eq!(payload[0], I256::from(-400));
        assert_eq!(payload[1], I256::zero());
    }

    #[tokio::test]
    async fn publish_passes_schema_payload_and_subject_through() {
        let sink = RecordingSink::new();
        let subject = Address::from_low_u64_be(5);
        let snapshot = compute_score(1000.0, 200.0, 50.0).unwrap();

        let publisher =
            AttestationPublisher::new(sink, "score-v1".to_string(), Duration::from_secs(5));
        let handle = publisher.publish(&snapshot, subject).await.unwrap();
        assert_eq!(handle.id, 42);

        let seen = publisher.sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (schema, payload, seen_subject) = &seen[0];
        assert_eq!(schema, "score-v1");
        assert_eq!(payload, &vec![I256::from(80), I256::zero()]);
        assert_eq!(*seen_subject, subject);
    }

    #[tokio::test]
    async fn stalled_submission_reports_ambiguous_timeout() {
        let snapshot = compute_score(1000.0, 200.0, 50.0).unwrap();
        let publisher = AttestationPublisher::new(
            StalledSink,
            "score-v1".to_string(),
            Duration::from_millis(10),
        );
        let err = publisher
            .publish(&snapshot, Address::zero())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PublishTimedOut { .. }));
    }
}
