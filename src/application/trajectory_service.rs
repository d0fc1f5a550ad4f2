// Trajectory service - Use case for loading and cleaning the ship track
use crate::application::acoustic_repository::{AcousticRepository, FetchError};
use crate::domain::summary::TrajectorySummary;
use crate::domain::trajectory::{PayloadError, Trajectory};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Malformed(#[from] PayloadError),
}

#[derive(Debug, Clone, Default)]
pub struct AcousticDataset {
    pub trajectory: Trajectory,
    pub channels: Vec<String>,
    pub echo_range: Vec<Option<f64>>,
}

impl AcousticDataset {
    pub fn summary(&self) -> TrajectorySummary {
        TrajectorySummary::new(&self.trajectory, &self.channels, &self.echo_range)
    }

    /// A channel is usable when it is non-negative and, if the backend listed
    /// its channels, inside that list.
    pub fn is_known_channel(&self, channel_index: i64) -> bool {
        match usize::try_from(channel_index) {
            Ok(index) => self.channels.is_empty() || index < self.channels.len(),
            Err(_) => false,
        }
    }

    /// Channel to start the session on. An unknown configured channel falls
    /// back to the first one.
    pub fn initial_channel(&self, configured: i64) -> i64 {
        if self.is_known_channel(configured) {
            return configured;
        }
        tracing::warn!(
            "Configured channel {} is not one of the {} available, using channel 0",
            configured,
            self.channels.len()
        );
        0
    }
}

#[derive(Clone)]
pub struct TrajectoryService {
    repository: Arc<dyn AcousticRepository>,
}

impl TrajectoryService {
    pub fn new(repository: Arc<dyn AcousticRepository>) -> Self {
        Self { repository }
    }

    pub async fn load(&self) -> Result<AcousticDataset, LoadError> {
        let payload = self.repository.fetch_acoustic_data().await?;
        let trajectory = Trajectory::from_payload(&payload)?;

        tracing::info!(
            "Loaded trajectory with {} points and {} channels",
            trajectory.len(),
            payload.channels.len()
        );
        if let Some(bounds) = trajectory.bounds() {
            tracing::debug!("Trajectory bounds: {:?}", bounds);
        }

        Ok(AcousticDataset {
            trajectory,
            channels: payload.channels,
            echo_range: payload.echo_range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::acoustic_repository::EchogramContent;
    use crate::domain::query::EchogramQuery;
    use crate::domain::trajectory::AcousticPayload;
    use async_trait::async_trait;

    struct StaticRepository(serde_json::Value);

    #[async_trait]
    impl AcousticRepository for StaticRepository {
        async fn fetch_acoustic_data(&self) -> Result<AcousticPayload, FetchError> {
            serde_json::from_value(self.0.clone()).map_err(|e| FetchError::Decode {
                url: "static".into(),
                message: e.to_string(),
            })
        }

        async fn fetch_echogram(&self, _query: &EchogramQuery) -> Result<EchogramContent, FetchError> {
            unreachable!("not used by the trajectory service")
        }
    }

    fn service(body: serde_json::Value) -> TrajectoryService {
        TrajectoryService::new(Arc::new(StaticRepository(body)))
    }

    #[tokio::test]
    async fn test_load_keeps_channel_catalogue() {
        let dataset = service(serde_json::json!({
            "latitude": [-61.2, null],
            "longitude": [-45.0, -44.9],
            "time": ["2017-07-24T10:00:00.000000000", null],
            "channels": ["GPT 38 kHz", "GPT 120 kHz"],
            "echo_range": [0.0, 0.5, 1.0]
        }))
        .load()
        .await
        .unwrap();

        assert_eq!(dataset.trajectory.len(), 2);
        assert_eq!(dataset.trajectory.points()[1].lat, -60.0);
        assert_eq!(dataset.channels.len(), 2);
        assert!(dataset.is_known_channel(1));
        assert!(!dataset.is_known_channel(2));
        assert!(!dataset.is_known_channel(-1));
    }

    #[tokio::test]
    async fn test_mismatched_arrays_fail_to_load() {
        let err = service(serde_json::json!({
            "latitude": [1.0, 2.0],
            "longitude": [1.0],
            "time": [null, null]
        }))
        .load()
        .await
        .unwrap_err();

        assert!(matches!(err, LoadError::Malformed(PayloadError::LengthMismatch { .. })));
    }

    #[test]
    fn test_any_channel_allowed_without_catalogue() {
        let dataset = AcousticDataset::default();
        assert!(dataset.is_known_channel(7));
        assert!(!dataset.is_known_channel(-1));
    }

    #[test]
    fn test_unknown_configured_channel_falls_back() {
        let dataset = AcousticDataset {
            channels: vec!["38 kHz".into(), "120 kHz".into()],
            ..Default::default()
        };
        assert_eq!(dataset.initial_channel(1), 1);
        assert_eq!(dataset.initial_channel(5), 0);
        assert_eq!(dataset.initial_channel(-3), 0);
    }
}
