//! Elevation profile extraction from a GPX course track.

use std::{fs::File, io::BufReader, io::Read, path::Path};

use geo::{Distance as _, Haversine, geometry::Point};
use gpx::Gpx;
use serde::Serialize;
use tracing::debug;

use crate::errors::ForecastError;

pub const DEFAULT_INTERVAL_KM: f64 = 1.0;
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;
/// Upper bound on resampled profile points for one track.
pub const MAX_PROFILE_SAMPLES: usize = 100_000;

type TrackPoint = gpx::Waypoint;

pub trait TrackMetric {
    type Score;
    fn next_point(&mut self, point: &TrackPoint);
    /// Called before the first point of each track segment.
    fn next_segment(&mut self) {}
    fn finish(&mut self) -> Self::Score;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    pub distance_km: f64,
    pub elevation_m: f64,
    /// Gradient from the previous sample; 0 for the first.
    pub gradient_pct: f64,
}

/// Cumulative distance and elevation for every raw point. Distance does not
/// accumulate across the gap between two segments.
#[derive(Debug, Clone, Default)]
struct CumulativeProfile {
    total_m: f64,
    last_point: Option<Point>,
    points: Vec<ProfilePoint>,
}

impl TrackMetric for CumulativeProfile {
    type Score = Vec<ProfilePoint>;

    fn next_point(&mut self, wpt: &TrackPoint) {
        self.total_m += self
            .last_point
            .map_or(0.0, |prev| Haversine.distance(prev, wpt.point()));
        self.last_point = Some(wpt.point());
        self.points.push(ProfilePoint {
            distance_km: self.total_m / 1000.0,
            elevation_m: wpt.elevation.unwrap_or(0.0),
            gradient_pct: 0.0,
        });
    }

    fn next_segment(&mut self) {
        self.last_point = None;
    }

    fn finish(&mut self) -> Vec<ProfilePoint> {
        std::mem::take(&mut self.points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseTrack {
    pub profile: Vec<ProfilePoint>,
    pub total_distance_km: f64,
    /// Gain and loss over the resampled profile.
    pub total_gain_m: f64,
    pub total_loss_m: f64,
    pub raw_points: usize,
    pub interval_km: f64,
}

impl CourseTrack {
    /// Moving-average elevation with gradients recomputed. The window is
    /// truncated at both ends of the profile.
    pub fn smoothed(&self, window: usize) -> Vec<ProfilePoint> {
        let window = window.max(1);
        let before = window / 2;
        let after = window - 1 - before;
        let n = self.profile.len();
        let mut smoothed: Vec<ProfilePoint> = (0..n)
            .map(|i| {
                let lo = i.saturating_sub(before);
                let hi = (i + after).min(n - 1);
                let slice = &self.profile[lo..=hi];
                let mean =
                    slice.iter().map(|p| p.elevation_m).sum::<f64>() / slice.len() as f64;
                ProfilePoint {
                    elevation_m: mean,
                    ..self.profile[i]
                }
            })
            .collect();
        apply_gradients(&mut smoothed);
        smoothed
    }

    /// Steepest climb and descent in the profile, in percent.
    pub fn gradient_extremes(&self) -> (f64, f64) {
        self.profile
            .iter()
            .skip(1)
            .fold((0.0_f64, 0.0_f64), |(up, down), p| {
                (up.max(p.gradient_pct), down.min(p.gradient_pct))
            })
    }
}

fn apply_gradients(profile: &mut [ProfilePoint]) {
    for i in 1..profile.len() {
        let distance_m = (profile[i].distance_km - profile[i - 1].distance_km) * 1000.0;
        let rise = profile[i].elevation_m - profile[i - 1].elevation_m;
        profile[i].gradient_pct = if distance_m > 0.0 {
            rise / distance_m * 100.0
        } else {
            0.0
        };
    }
}

/// Picks the raw point closest to each multiple of `interval_km`, up to and
/// including the first multiple past the end.
fn resample(points: &[ProfilePoint], interval_km: f64) -> Vec<ProfilePoint> {
    let Some(last) = points.last() else {
        return Vec::new();
    };
    let total = last.distance_km;
    let steps = (total / interval_km).floor() as usize;
    let targets = if total > steps as f64 * interval_km {
        steps + 2
    } else {
        steps + 1
    };

    (0..targets)
        .map(|k| {
            let target = k as f64 * interval_km;
            let at = points.partition_point(|p| p.distance_km < target);
            let closest = match (at.checked_sub(1), points.get(at)) {
                (Some(before), Some(after)) => {
                    if target - points[before].distance_km <= after.distance_km - target {
                        points[before]
                    } else {
                        *after
                    }
                }
                (Some(before), None) => points[before],
                (None, Some(after)) => *after,
                (None, None) => *last,
            };
            ProfilePoint {
                gradient_pct: 0.0,
                ..closest
            }
        })
        .collect()
}

pub fn read_course_track<R: Read>(reader: R, interval_km: f64) -> Result<CourseTrack, ForecastError> {
    if !interval_km.is_finite() || interval_km <= 0.0 {
        return Err(ForecastError::InvalidInput(format!(
            "sampling interval must be positive, got {interval_km}"
        )));
    }

    let gpx: Gpx = gpx::read(reader)
        .map_err(|e| ForecastError::GpxParsing(format!("Failed to parse GPX: {e}")))?;
    if gpx.tracks.is_empty() {
        return Err(ForecastError::GpxParsing("No tracks found in GPX file".to_string()));
    }

    let mut acc = CumulativeProfile::default();
    for track in &gpx.tracks {
        for seg in &track.segments {
            acc.next_segment();
            for point in &seg.points {
                acc.next_point(point);
            }
        }
    }
    let raw = acc.finish();
    if raw.is_empty() {
        return Err(ForecastError::InvalidInput(
            "No track points found in GPX file".to_string(),
        ));
    }

    let total_distance_km = raw.last().map_or(0.0, |p| p.distance_km);
    let samples = (total_distance_km / interval_km).ceil() + 1.0;
    if samples > MAX_PROFILE_SAMPLES as f64 {
        return Err(ForecastError::InvalidInput(format!(
            "sampling interval {interval_km}km is too fine for a {total_distance_km:.2}km track \
             (limit {MAX_PROFILE_SAMPLES} samples)"
        )));
    }

    let mut profile = resample(&raw, interval_km);
    apply_gradients(&mut profile);

    let (total_gain_m, total_loss_m) =
        profile
            .windows(2)
            .fold((0.0, 0.0), |(gain, loss), pair| {
                let rise = pair[1].elevation_m - pair[0].elevation_m;
                if rise > 0.0 {
                    (gain + rise, loss)
                } else {
                    (gain, loss - rise)
                }
            });

    debug!(
        "GPX track: {} points, {total_distance_km:.2}km, +{total_gain_m:.0}m/-{total_loss_m:.0}m",
        raw.len()
    );

    Ok(CourseTrack {
        raw_points: raw.len(),
        profile,
        total_distance_km,
        total_gain_m,
        total_loss_m,
        interval_km,
    })
}

pub fn load_course_track(path: impl AsRef<Path>, interval_km: f64) -> Result<CourseTrack, ForecastError> {
    let file = File::open(path.as_ref())?;
    read_course_track(BufReader::new(file), interval_km)
}
