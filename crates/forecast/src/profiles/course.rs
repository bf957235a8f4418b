//! Course profile document and its resolved form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Time;
use tracing::{debug, warn};

use super::lenient;
use crate::errors::ForecastError;

/// Course profile as stored on disk.
///
/// `course_metadata.race_name` and `course_metadata.distance_km` are
/// mandatory; everything else falls back to the course defaults table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub course_metadata: Option<CourseMetadata>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub terrain_profile: Option<TerrainProfile>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub simulation_defaults: Option<SimulationDefaults>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub aid_station_model: Option<AidStationModel>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub validation_targets: Option<ValidationTargets>,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub key_segments: Vec<KeySegment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseMetadata {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub race_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub elevation_gain_m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub elevation_loss_m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub course_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub technicality: Option<Technicality>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub runnability: Option<Runnability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Technicality {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub dry_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Runnability {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub runnable_fraction_estimate: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationDefaults {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub fatigue_model: Option<FatigueModelDoc>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub field_effects: Option<FieldEffects>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FatigueModelDoc {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub fatigue_inflection_km: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub fatigue_slope_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldEffects {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub field_loss_multiplier_technical: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AidStationModel {
    /// `[min, max]` expected number of stops.
    #[serde(default, deserialize_with = "lenient::count_range")]
    pub expected_stops_count: Option<[u32; 2]>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub median_stop_seconds: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationTargets {
    /// Keyed by `fitness_X.XX`, values are `H:MM` finish times.
    #[serde(default, deserialize_with = "lenient::string_map")]
    pub athlete_specific_targets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeySegment {
    pub name: String,
    pub start_km: f64,
    pub end_km: f64,
    #[serde(default)]
    pub difficulty_rating: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub strategy_notes: String,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub key_challenges: Vec<String>,
}

impl KeySegment {
    pub fn length_km(&self) -> f64 {
        self.end_km - self.start_km
    }
}

mod defaults {
    pub const ELEVATION_M: f64 = 0.0;
    pub const START_HOUR: u8 = 6;
    pub const COURSE_TYPE: &str = "mixed_trail";
    pub const DRY_MULTIPLIER: f64 = 1.0;
    pub const RUNNABLE_FRACTION: f64 = 0.5;
    pub const FATIGUE_INFLECTION_KM: f64 = 50.0;
    pub const FATIGUE_SLOPE_MULTIPLIER: f64 = 1.1;
    pub const FIELD_LOSS_TECHNICAL: f64 = 1.0;
    pub const STOPS: [u32; 2] = [0, 0];
    pub const MEDIAN_STOP_SECONDS: f64 = 60.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FatigueModel {
    pub inflection_km: f64,
    pub slope_multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AidStations {
    pub min_stops: u32,
    pub max_stops: u32,
    pub median_stop_seconds: f64,
}

/// Course with every optional section filled in from the defaults table.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub race_name: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub start_time: Time,
    pub course_type: String,
    pub dry_multiplier: f64,
    pub runnable_fraction: f64,
    pub fatigue: FatigueModel,
    pub field_loss_multiplier_technical: f64,
    pub aid_stations: AidStations,
    pub validation_targets: BTreeMap<String, String>,
    pub key_segments: Vec<KeySegment>,
}

impl Course {
    pub fn start_hour(&self) -> f64 {
        f64::from(self.start_time.hour())
    }

    pub fn validation_target(&self, key: &str) -> Option<&str> {
        self.validation_targets.get(key).map(String::as_str)
    }
}

/// Parses a wall-clock `HH:MM` string.
pub fn parse_clock(value: &str) -> Option<Time> {
    let (hour, minute) = value.trim().split_once(':')?;
    let hour: u8 = hour.trim().parse().ok()?;
    let minute: u8 = minute.trim().parse().ok()?;
    Time::from_hms(hour, minute, 0).ok()
}

/// Parses an `H:MM` or `H:MM:SS` duration into fractional hours. Hours may
/// exceed 23; seconds are validated and then ignored.
pub fn parse_duration_hours(value: &str) -> Option<f64> {
    let mut parts = value.trim().split(':');
    let hours: u32 = parts.next()?.trim().parse().ok()?;
    let minutes: u32 = parts.next()?.trim().parse().ok()?;
    if let Some(seconds) = parts.next() {
        let seconds: u32 = seconds.trim().parse().ok()?;
        if seconds >= 60 {
            return None;
        }
    }
    if minutes >= 60 || parts.next().is_some() {
        return None;
    }
    Some(f64::from(hours) + f64::from(minutes) / 60.0)
}

impl CourseProfile {
    /// Applies the course defaults table.
    ///
    /// Fails when the race name or distance is absent, or the distance is
    /// not a positive number.
    pub fn resolve(&self) -> Result<Course, ForecastError> {
        let metadata = self
            .course_metadata
            .as_ref()
            .ok_or_else(|| ForecastError::missing("course", "course_metadata"))?;

        let race_name = metadata
            .race_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ForecastError::missing("course", "course_metadata.race_name"))?
            .to_string();

        let distance_km = metadata
            .distance_km
            .ok_or_else(|| ForecastError::missing("course", "course_metadata.distance_km"))?;
        if !distance_km.is_finite() || distance_km <= 0.0 {
            return Err(ForecastError::InvalidInput(format!(
                "distance_km must be positive, got {distance_km}"
            )));
        }

        let start_time = match metadata.start_time.as_deref() {
            Some(raw) => parse_clock(raw).unwrap_or_else(|| {
                warn!("Unparseable start_time {raw:?} for {race_name}; using 06:00");
                default_start()
            }),
            None => default_start(),
        };

        let terrain = self.terrain_profile.clone().unwrap_or_default();
        let runnable = terrain
            .runnability
            .and_then(|r| r.runnable_fraction_estimate)
            .unwrap_or(defaults::RUNNABLE_FRACTION);
        let runnable_fraction = if runnable.is_finite() {
            runnable.clamp(0.0, 1.0)
        } else {
            defaults::RUNNABLE_FRACTION
        };

        let simulation = self.simulation_defaults.clone().unwrap_or_default();
        let fatigue = simulation.fatigue_model.unwrap_or_default();

        let aid = self.aid_station_model.clone().unwrap_or_else(|| {
            debug!("No aid_station_model for {race_name}; assuming no stops");
            AidStationModel::default()
        });
        let [min_stops, max_stops] = aid.expected_stops_count.unwrap_or(defaults::STOPS);
        let median_stop_seconds = aid
            .median_stop_seconds
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(defaults::MEDIAN_STOP_SECONDS);

        Ok(Course {
            distance_km,
            elevation_gain_m: metadata.elevation_gain_m.unwrap_or(defaults::ELEVATION_M),
            elevation_loss_m: metadata.elevation_loss_m.unwrap_or(defaults::ELEVATION_M),
            start_time,
            course_type: metadata
                .course_type
                .clone()
                .unwrap_or_else(|| defaults::COURSE_TYPE.to_string()),
            dry_multiplier: terrain
                .technicality
                .and_then(|t| t.dry_multiplier)
                .unwrap_or(defaults::DRY_MULTIPLIER),
            runnable_fraction,
            fatigue: FatigueModel {
                inflection_km: fatigue
                    .fatigue_inflection_km
                    .unwrap_or(defaults::FATIGUE_INFLECTION_KM),
                slope_multiplier: fatigue
                    .fatigue_slope_multiplier
                    .unwrap_or(defaults::FATIGUE_SLOPE_MULTIPLIER),
            },
            field_loss_multiplier_technical: simulation
                .field_effects
                .and_then(|f| f.field_loss_multiplier_technical)
                .unwrap_or(defaults::FIELD_LOSS_TECHNICAL),
            aid_stations: AidStations {
                min_stops,
                max_stops,
                median_stop_seconds,
            },
            validation_targets: self
                .validation_targets
                .as_ref()
                .map(|v| v.athlete_specific_targets.clone())
                .unwrap_or_default(),
            key_segments: self.key_segments.clone(),
            race_name,
        })
    }
}

fn default_start() -> Time {
    Time::from_hms(defaults::START_HOUR, 0, 0).unwrap_or(Time::MIDNIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> CourseProfile {
        serde_json::from_str(
            r#"{"course_metadata": {"race_name": "Test 50", "distance_km": 50}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_course_gets_defaults() {
        let course = minimal().resolve().unwrap();
        assert_eq!(course.race_name, "Test 50");
        assert_eq!(course.distance_km, 50.0);
        assert_eq!(course.start_hour(), 6.0);
        assert_eq!(course.course_type, "mixed_trail");
        assert_eq!(course.runnable_fraction, 0.5);
        assert_eq!(course.aid_stations.max_stops, 0);
        assert_eq!(course.aid_stations.median_stop_seconds, 60.0);
        assert!(course.key_segments.is_empty());
        assert!(course.validation_targets.is_empty());
    }

    #[test]
    fn test_missing_distance_is_fatal() {
        let profile: CourseProfile =
            serde_json::from_str(r#"{"course_metadata": {"race_name": "X"}}"#).unwrap();
        let err = profile.resolve().unwrap_err();
        assert!(matches!(
            err,
            ForecastError::MissingRequiredInput {
                field: "course_metadata.distance_km",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_metadata_is_fatal() {
        let err = CourseProfile::default().resolve().unwrap_err();
        assert!(matches!(err, ForecastError::MissingRequiredInput { .. }));
    }

    #[test]
    fn test_non_positive_distance_rejected() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 0}}"#,
        )
        .unwrap();
        assert!(matches!(
            profile.resolve(),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_runnable_fraction_clamped() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 10},
                "terrain_profile": {"runnability": {"runnable_fraction_estimate": 1.4}}}"#,
        )
        .unwrap();
        assert_eq!(profile.resolve().unwrap().runnable_fraction, 1.0);
    }

    #[test]
    fn test_bad_start_time_falls_back() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 10, "start_time": "dawn"}}"#,
        )
        .unwrap();
        assert_eq!(profile.resolve().unwrap().start_hour(), 6.0);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("07:30"), Time::from_hms(7, 30, 0).ok());
        assert_eq!(parse_clock("7:05"), Time::from_hms(7, 5, 0).ok());
        assert_eq!(parse_clock("25:00"), None);
        assert_eq!(parse_clock("0730"), None);
    }

    #[test]
    fn test_parse_duration_hours() {
        let hours = parse_duration_hours("4:23").unwrap();
        assert!((hours - (4.0 + 23.0 / 60.0)).abs() < 1e-12);
        assert_eq!(parse_duration_hours("26:30"), Some(26.5));
        assert_eq!(parse_duration_hours("4:75"), None);
        assert_eq!(parse_duration_hours("four"), None);
    }

    #[test]
    fn test_parse_duration_hours_with_seconds() {
        let hours = parse_duration_hours("4:23:00").unwrap();
        assert!((hours - (4.0 + 23.0 / 60.0)).abs() < 1e-12);
        assert_eq!(parse_duration_hours("26:30:45"), Some(26.5));
        assert_eq!(parse_duration_hours("4:23:75"), None);
        assert_eq!(parse_duration_hours("4:23:00:00"), None);
        assert_eq!(parse_duration_hours("4:23:"), None);
    }

    #[test]
    fn test_malformed_aid_and_targets_keep_the_rest() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 50, "elevation_gain_m": "lots"},
                "aid_station_model": {"expected_stops_count": ["three", 5], "median_stop_seconds": 90},
                "validation_targets": {"athlete_specific_targets":
                    {"fitness_1.00": "4:45", "fitness_1.10": 4.5, "fitness_1.15": "4:20"}}}"#,
        )
        .unwrap();
        let course = profile.resolve().unwrap();
        assert_eq!(course.elevation_gain_m, 0.0);
        assert_eq!(course.aid_stations.min_stops, 0);
        assert_eq!(course.aid_stations.max_stops, 0);
        assert_eq!(course.aid_stations.median_stop_seconds, 90.0);
        assert_eq!(course.validation_targets.len(), 2);
        assert_eq!(course.validation_target("fitness_1.00"), Some("4:45"));
        assert_eq!(course.validation_target("fitness_1.10"), None);
    }

    #[test]
    fn test_fractional_stop_counts_rounded() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 50},
                "aid_station_model": {"expected_stops_count": [2.4, 4]}}"#,
        )
        .unwrap();
        let aid = profile.resolve().unwrap().aid_stations;
        assert_eq!((aid.min_stops, aid.max_stops), (2, 4));
    }

    #[test]
    fn test_broken_segment_dropped() {
        let profile: CourseProfile = serde_json::from_str(
            r#"{"course_metadata": {"race_name": "X", "distance_km": 50},
                "key_segments": [{"name": "Climb", "start_km": 10, "end_km": 14},
                                 {"name": "Ridge", "start_km": "ten"}]}"#,
        )
        .unwrap();
        let course = profile.resolve().unwrap();
        assert_eq!(course.key_segments.len(), 1);
        assert_eq!(course.key_segments[0].name, "Climb");
    }

    #[test]
    fn test_segment_length() {
        let segment = KeySegment {
            name: "Climb".into(),
            start_km: 12.5,
            end_km: 20.0,
            difficulty_rating: "hard".into(),
            description: String::new(),
            strategy_notes: String::new(),
            key_challenges: vec![],
        };
        assert_eq!(segment.length_km(), 7.5);
    }
}
