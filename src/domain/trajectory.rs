// Trajectory domain model - cleaned, index-stable ship track
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Latitude used for samples without a position fix.
pub const FALLBACK_LATITUDE: f64 = -60.0;
/// Longitude used for samples without a position fix.
pub const FALLBACK_LONGITUDE: f64 = -40.0;

// 2017-07-24T00:00:00Z
const DEFAULT_TIMESTAMP_SECS: i64 = 1_500_854_400;

const NAIVE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("malformed payload: missing `{0}` array")]
    MissingArray(&'static str),
    #[error("malformed payload: latitude={latitude}, longitude={longitude}, time={time} entries")]
    LengthMismatch {
        latitude: usize,
        longitude: usize,
        time: usize,
    },
}

/// Raw body of `/api/acoustic-data`. Arrays are index-aligned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcousticPayload {
    pub latitude: Option<Vec<Option<f64>>>,
    pub longitude: Option<Vec<Option<f64>>>,
    pub time: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub echo_range: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryPoint {
    pub lat: f64,
    pub lng: f64,
    pub time: DateTime<Utc>,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingRegion {
    fn extend(&mut self, lat: f64, lng: f64) {
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
        self.min_lng = self.min_lng.min(lng);
        self.max_lng = self.max_lng.max(lng);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    points: Vec<TrajectoryPoint>,
    bounds: Option<BoundingRegion>,
}

impl Trajectory {
    /// Build a trajectory from index-aligned raw arrays.
    ///
    /// Null coordinates are parked at ([`FALLBACK_LATITUDE`], [`FALLBACK_LONGITUDE`])
    /// and null or unreadable times fall back to 2017-07-24T00:00:00Z, so every
    /// sample survives and `index` always equals the array position.
    pub fn build(
        latitude: &[Option<f64>],
        longitude: &[Option<f64>],
        time: &[Option<String>],
    ) -> Result<Self, PayloadError> {
        if latitude.len() != longitude.len() || latitude.len() != time.len() {
            return Err(PayloadError::LengthMismatch {
                latitude: latitude.len(),
                longitude: longitude.len(),
                time: time.len(),
            });
        }

        let mut bounds: Option<BoundingRegion> = None;
        let points: Vec<TrajectoryPoint> = latitude
            .iter()
            .zip(longitude)
            .zip(time)
            .enumerate()
            .map(|(index, ((lat, lng), time))| {
                let lat = lat.unwrap_or(FALLBACK_LATITUDE);
                let lng = lng.unwrap_or(FALLBACK_LONGITUDE);
                match bounds.as_mut() {
                    Some(region) => region.extend(lat, lng),
                    None => {
                        bounds = Some(BoundingRegion {
                            min_lat: lat,
                            max_lat: lat,
                            min_lng: lng,
                            max_lng: lng,
                        })
                    }
                }
                let time = time
                    .as_deref()
                    .map(|raw| {
                        parse_timestamp(raw).unwrap_or_else(|| {
                            tracing::warn!("Unreadable time {:?} at index {}, using default", raw, index);
                            default_timestamp()
                        })
                    })
                    .unwrap_or_else(default_timestamp);
                TrajectoryPoint { lat, lng, time, index }
            })
            .collect();

        Ok(Self { points, bounds })
    }

    pub fn from_payload(payload: &AcousticPayload) -> Result<Self, PayloadError> {
        let latitude = payload.latitude.as_deref().ok_or(PayloadError::MissingArray("latitude"))?;
        let longitude = payload.longitude.as_deref().ok_or(PayloadError::MissingArray("longitude"))?;
        let time = payload.time.as_deref().ok_or(PayloadError::MissingArray("time"))?;
        Self::build(latitude, longitude, time)
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn bounds(&self) -> Option<BoundingRegion> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Look up a point by its backend index.
    pub fn point(&self, index: usize) -> Option<&TrajectoryPoint> {
        self.points
            .binary_search_by_key(&index, |p| p.index)
            .ok()
            .map(|pos| &self.points[pos])
    }

    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.iter().map(|p| p.time).min()?;
        let last = self.points.iter().map(|p| p.time).max()?;
        Some((first, last))
    }
}

pub fn default_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(DEFAULT_TIMESTAMP_SECS, 0).unwrap_or_default()
}

/// Accepts RFC 3339 as well as the zone-less forms numpy emits for datetime64.
/// Zone-less times are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_fallback_substitution_scenario() {
        let trajectory = Trajectory::build(
            &[Some(10.0), None, Some(30.0)],
            &[Some(20.0), None, None],
            &[None, s("2020-01-01T00:00:00Z"), None],
        )
        .unwrap();

        assert_eq!(trajectory.len(), 3);
        assert_eq!(
            trajectory.points()[1],
            TrajectoryPoint {
                lat: -60.0,
                lng: -40.0,
                time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                index: 1,
            }
        );
        assert_eq!(trajectory.points()[0].time, Utc.with_ymd_and_hms(2017, 7, 24, 0, 0, 0).unwrap());
        assert_eq!(trajectory.points()[2].lng, FALLBACK_LONGITUDE);
    }

    #[test]
    fn test_index_matches_position() {
        let lat: Vec<Option<f64>> = (0..50).map(|i| if i % 3 == 0 { None } else { Some(i as f64) }).collect();
        let lng: Vec<Option<f64>> = (0..50).map(|i| if i % 7 == 0 { None } else { Some(-(i as f64)) }).collect();
        let time: Vec<Option<String>> = vec![None; 50];

        let trajectory = Trajectory::build(&lat, &lng, &time).unwrap();
        assert_eq!(trajectory.len(), 50);
        for (pos, point) in trajectory.points().iter().enumerate() {
            assert_eq!(point.index, pos);
            assert!(point.lat.is_finite() && point.lng.is_finite());
        }
    }

    #[test]
    fn test_bounds_contain_every_point() {
        let trajectory = Trajectory::build(
            &[Some(12.5), Some(-3.0), None, Some(44.1)],
            &[Some(100.0), None, Some(-170.2), Some(7.0)],
            &[None, None, None, None],
        )
        .unwrap();

        let bounds = trajectory.bounds().unwrap();
        assert_eq!(bounds.min_lat, -60.0);
        assert_eq!(bounds.max_lat, 44.1);
        assert_eq!(bounds.min_lng, -170.2);
        assert_eq!(bounds.max_lng, 100.0);
        for p in trajectory.points() {
            assert!((bounds.min_lat..=bounds.max_lat).contains(&p.lat));
            assert!((bounds.min_lng..=bounds.max_lng).contains(&p.lng));
        }
    }

    #[test]
    fn test_empty_has_no_bounds() {
        let trajectory = Trajectory::build(&[], &[], &[]).unwrap();
        assert!(trajectory.is_empty());
        assert!(trajectory.bounds().is_none());
        assert!(trajectory.time_span().is_none());
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let err = Trajectory::build(&[Some(1.0), Some(2.0)], &[Some(1.0)], &[None, None]).unwrap_err();
        assert_eq!(
            err,
            PayloadError::LengthMismatch {
                latitude: 2,
                longitude: 1,
                time: 2
            }
        );
    }

    #[test]
    fn test_missing_array_is_malformed() {
        let payload: AcousticPayload = serde_json::from_str(r#"{"latitude": [1.0], "time": [null]}"#).unwrap();
        assert_eq!(
            Trajectory::from_payload(&payload).unwrap_err(),
            PayloadError::MissingArray("longitude")
        );
    }

    #[test]
    fn test_parse_numpy_datetime() {
        let ts = parse_timestamp("2017-07-24T13:05:09.123000000").unwrap();
        assert_eq!(ts.timestamp(), DEFAULT_TIMESTAMP_SECS + 13 * 3600 + 5 * 60 + 9);
        assert_eq!(parse_timestamp("2020-01-01T00:00"), Some(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()));
        assert!(parse_timestamp("NaT").is_none());
    }

    #[test]
    fn test_unreadable_time_uses_default() {
        let trajectory = Trajectory::build(&[Some(1.0)], &[Some(2.0)], &[s("NaT")]).unwrap();
        assert_eq!(trajectory.points()[0].time, default_timestamp());
    }

    #[test]
    fn test_point_lookup_by_index() {
        let trajectory = Trajectory::build(&[Some(1.0), Some(2.0)], &[Some(3.0), Some(4.0)], &[None, None]).unwrap();
        assert_eq!(trajectory.point(1).map(|p| p.lat), Some(2.0));
        assert!(trajectory.point(2).is_none());
    }
}
