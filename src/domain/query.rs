// Echogram query - derived from selection state, never stored
use super::selection::SelectionState;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("no trajectory point is selected")]
    NoSelection,
    #[error("time range needs both a start and an end time")]
    IncompleteTimeRange,
    #[error("channel index {0} is not a non-negative integer")]
    InvalidChannel(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EchogramQuery {
    pub point_index: u64,
    pub channel_index: u32,
    pub vmin: f64,
    pub vmax: f64,
    pub window: Option<TimeWindow>,
}

impl EchogramQuery {
    pub fn build(state: &SelectionState) -> Result<Self, QueryError> {
        let point_index = u64::try_from(state.current_point_index()).map_err(|_| QueryError::NoSelection)?;
        let channel_index =
            u32::try_from(state.channel_index()).map_err(|_| QueryError::InvalidChannel(state.channel_index()))?;

        let range = state.time_range();
        let window = match (&range.start, &range.end) {
            (Some(start), Some(end)) => Some(TimeWindow {
                start: start.clone(),
                end: end.clone(),
            }),
            (None, None) => None,
            _ => return Err(QueryError::IncompleteTimeRange),
        };

        Ok(Self {
            point_index,
            channel_index,
            vmin: state.vmin(),
            vmax: state.vmax(),
            window,
        })
    }

    /// Parameters in their fixed wire order.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("pointIndex", self.point_index.to_string()),
            ("channelIndex", self.channel_index.to_string()),
            ("vmin", self.vmin.to_string()),
            ("vmax", self.vmax.to_string()),
        ];
        if let Some(window) = &self.window {
            params.push(("startTime", window.start.clone()));
            params.push(("endTime", window.end.clone()));
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        self.to_params()
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full echogram URL against a backend base such as `http://localhost:5001`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/api/echogram?{}", base_url.trim_end_matches('/'), self.to_query_string())
    }
}
