use std::collections::BTreeMap;

use forecast::{
    ForecastError,
    profiles::{
        AidStationModel, Course, CourseMetadata, CourseProfile, FatigueModelDoc, FieldEffects,
        KeySegment, Runnability, SimulationDefaults, Technicality, TerrainProfile,
        ValidationTargets,
    },
};

/// Course archetypes used across scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoursePreset {
    /// 100 km technical coastal trail with validation targets.
    CoastalRidge,
    /// 50 km alpine course, pre-dawn start.
    AlpineFifty,
    /// Race name and distance only.
    Bare,
}

impl CoursePreset {
    pub const ALL: [CoursePreset; 3] = [
        CoursePreset::CoastalRidge,
        CoursePreset::AlpineFifty,
        CoursePreset::Bare,
    ];

    pub fn distance_km(&self) -> f64 {
        match self {
            CoursePreset::CoastalRidge => 100.0,
            CoursePreset::AlpineFifty => 50.0,
            CoursePreset::Bare => 42.2,
        }
    }

    pub fn profile(&self) -> CourseProfile {
        match self {
            CoursePreset::CoastalRidge => coastal_ridge(),
            CoursePreset::AlpineFifty => alpine_fifty(),
            CoursePreset::Bare => CourseProfile {
                course_metadata: Some(CourseMetadata {
                    race_name: Some("Bare Marathon".to_string()),
                    distance_km: Some(self.distance_km()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }

    pub fn resolve(&self) -> Result<Course, ForecastError> {
        self.profile().resolve()
    }
}

fn segment(name: &str, start_km: f64, end_km: f64, difficulty: &str) -> KeySegment {
    KeySegment {
        name: name.to_string(),
        start_km,
        end_km,
        difficulty_rating: difficulty.to_string(),
        description: String::new(),
        strategy_notes: String::new(),
        key_challenges: Vec::new(),
    }
}

fn coastal_ridge() -> CourseProfile {
    let targets = BTreeMap::from([
        ("fitness_1.00".to_string(), "5:10".to_string()),
        ("fitness_1.15".to_string(), "4:45".to_string()),
    ]);

    CourseProfile {
        course_metadata: Some(CourseMetadata {
            race_name: Some("Coastal Ridge 100".to_string()),
            distance_km: Some(100.0),
            elevation_gain_m: Some(4000.0),
            elevation_loss_m: Some(4000.0),
            start_time: Some("06:00".to_string()),
            course_type: Some("technical_coastal_trail".to_string()),
        }),
        terrain_profile: Some(TerrainProfile {
            technicality: Some(Technicality {
                dry_multiplier: Some(1.12),
            }),
            runnability: Some(Runnability {
                runnable_fraction_estimate: Some(0.62),
            }),
        }),
        simulation_defaults: Some(SimulationDefaults {
            fatigue_model: Some(FatigueModelDoc {
                fatigue_inflection_km: Some(55.0),
                fatigue_slope_multiplier: Some(1.15),
            }),
            field_effects: Some(FieldEffects {
                field_loss_multiplier_technical: Some(1.08),
            }),
        }),
        aid_station_model: Some(AidStationModel {
            expected_stops_count: Some([6, 8]),
            median_stop_seconds: Some(150.0),
        }),
        validation_targets: Some(ValidationTargets {
            athlete_specific_targets: targets,
        }),
        key_segments: vec![
            segment("Harbour Start", 0.0, 12.0, "moderate"),
            segment("Lighthouse Descent", 12.0, 27.5, "hard"),
            segment("Cliff Traverse", 27.5, 61.0, "hard"),
            segment("Home Stretch", 61.0, 100.0, "moderate"),
        ],
    }
}

fn alpine_fifty() -> CourseProfile {
    CourseProfile {
        course_metadata: Some(CourseMetadata {
            race_name: Some("Alpine Fifty".to_string()),
            distance_km: Some(50.0),
            elevation_gain_m: Some(3100.0),
            elevation_loss_m: Some(2900.0),
            start_time: Some("04:30".to_string()),
            course_type: Some("alpine_trail".to_string()),
        }),
        terrain_profile: Some(TerrainProfile {
            technicality: Some(Technicality {
                dry_multiplier: Some(1.2),
            }),
            runnability: Some(Runnability {
                runnable_fraction_estimate: Some(0.45),
            }),
        }),
        aid_station_model: Some(AidStationModel {
            expected_stops_count: Some([3, 4]),
            median_stop_seconds: Some(120.0),
        }),
        key_segments: vec![segment("Col Climb", 8.0, 19.0, "very hard")],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_resolves() {
        for preset in CoursePreset::ALL {
            let course = preset.resolve().unwrap();
            assert_eq!(course.distance_km, preset.distance_km());
        }
    }

    #[test]
    fn test_coastal_ridge_segments_are_contiguous() {
        let course = CoursePreset::CoastalRidge.resolve().unwrap();
        for pair in course.key_segments.windows(2) {
            assert_eq!(pair[0].end_km, pair[1].start_km);
        }
        assert_eq!(course.aid_stations.max_stops, 8);
        assert!(course.validation_target("fitness_1.15").is_some());
    }

    #[test]
    fn test_alpine_start_time() {
        let course = CoursePreset::AlpineFifty.resolve().unwrap();
        assert_eq!(course.start_hour(), 4.0);
    }
}
