// Dataset overview shown by the `info` command
use super::trajectory::{BoundingRegion, Trajectory};
use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone)]
pub struct TrajectorySummary {
    pub point_count: usize,
    pub time_span: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub bounds: Option<BoundingRegion>,
    pub channels: Vec<String>,
    pub depth_range: Option<(f64, f64)>,
}

impl TrajectorySummary {
    pub fn new(trajectory: &Trajectory, channels: &[String], echo_range: &[Option<f64>]) -> Self {
        let depth_range = echo_range.iter().flatten().fold(None, |acc: Option<(f64, f64)>, &d| {
            Some(acc.map_or((d, d), |(lo, hi)| (lo.min(d), hi.max(d))))
        });

        Self {
            point_count: trajectory.len(),
            time_span: trajectory.time_span(),
            bounds: trajectory.bounds(),
            channels: channels.to_vec(),
            depth_range,
        }
    }
}

impl fmt::Display for TrajectorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "points:    {}", self.point_count)?;
        if let Some((first, last)) = self.time_span {
            writeln!(f, "time:      {} .. {}", first.to_rfc3339(), last.to_rfc3339())?;
        }
        if let Some(b) = self.bounds {
            writeln!(f, "latitude:  {:.4} .. {:.4}", b.min_lat, b.max_lat)?;
            writeln!(f, "longitude: {:.4} .. {:.4}", b.min_lng, b.max_lng)?;
        }
        if let Some((lo, hi)) = self.depth_range {
            writeln!(f, "depth:     {:.1} .. {:.1} m", lo, hi)?;
        }
        for (i, name) in self.channels.iter().enumerate() {
            writeln!(f, "channel {}: {}", i, name)?;
        }
        Ok(())
    }
}
