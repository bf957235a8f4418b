use forecast::{
    ForecastError,
    profiles::{
        AerobicCapacity, Athlete, AthleteInfo, AthleteProfile, DescentRating, FitnessBaseline,
        HealthProfile, HeartRateProfile, PhysiologicalProfile, RacingExperience,
        RespiratoryConditions, RespiratoryProfile, TemperatureRiskBands, TemperatureThresholds,
        TerrainAdvantages, TrainingLoad,
    },
};

/// Athlete archetypes used across scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AthletePreset {
    /// Fully specified profile with a cold-air respiratory history.
    Validated,
    /// Name only; every model falls back to its defaults.
    Minimal,
    /// Strong climber with no respiratory profile and average descending.
    Climber,
}

impl AthletePreset {
    pub const ALL: [AthletePreset; 3] = [
        AthletePreset::Validated,
        AthletePreset::Minimal,
        AthletePreset::Climber,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AthletePreset::Validated => "Jordan Reyes",
            AthletePreset::Minimal => "Alex Minimal",
            AthletePreset::Climber => "Sam Vertical",
        }
    }

    pub fn profile(&self) -> AthleteProfile {
        match self {
            AthletePreset::Validated => validated(self.name()),
            AthletePreset::Minimal => AthleteProfile {
                name: Some(self.name().to_string()),
                ..Default::default()
            },
            AthletePreset::Climber => climber(self.name()),
        }
    }

    pub fn resolve(&self) -> Result<Athlete, ForecastError> {
        self.profile().resolve()
    }
}

fn validated(name: &str) -> AthleteProfile {
    AthleteProfile {
        athlete_info: Some(AthleteInfo {
            name: Some(name.to_string()),
            racing_experience: Some(RacingExperience {
                strengths: vec![
                    "Technical descending".to_string(),
                    "Climbing endurance".to_string(),
                ],
                weaknesses: vec!["Going out too fast".to_string()],
                past_dnfs: vec!["Cold technical 80k, asthma flare".to_string()],
            }),
        }),
        fitness_baseline: Some(FitnessBaseline {
            training_load: Some(TrainingLoad {
                ctl_utmb_2025: Some(120.0),
                ctl_arc_2025: Some(138.0),
            }),
        }),
        respiratory_profile: Some(RespiratoryProfile {
            temperature_risk_bands: Some(TemperatureRiskBands {
                extreme_danger_c: Some(5.0),
                high_risk_c: Some(8.0),
                moderate_risk_c: Some(10.0),
                low_risk_c: Some(12.0),
            }),
        }),
        health_profile: Some(HealthProfile {
            respiratory_conditions: Some(RespiratoryConditions {
                temperature_thresholds_c: Some(TemperatureThresholds {
                    high_risk_c: Some(8.0),
                }),
            }),
        }),
        physiological_profile: Some(PhysiologicalProfile {
            aerobic_capacity: Some(AerobicCapacity {
                vo2_max_ml_kg_min: Some(57.5),
                source: Some("Lab test".to_string()),
            }),
            heart_rate: Some(HeartRateProfile {
                zone_2_min: Some(128),
                zone_2_max: Some(142),
                zone_3_min: Some(143),
                zone_3_max: Some(156),
                zone_4_min: Some(157),
                zone_4_max: Some(168),
            }),
        }),
        terrain_advantages: Some(TerrainAdvantages {
            steep_descents: Some(DescentRating::Strong),
        }),
        success_factors_ranked: vec![
            "Respiratory management".to_string(),
            "Conservative first 20 km".to_string(),
        ],
        ..Default::default()
    }
}

fn climber(name: &str) -> AthleteProfile {
    AthleteProfile {
        name: Some(name.to_string()),
        racing_experience: Some(RacingExperience {
            strengths: vec!["Steep climbing".to_string()],
            weaknesses: vec!["Technical descents".to_string()],
            past_dnfs: Vec::new(),
        }),
        physiological_profile: Some(PhysiologicalProfile {
            aerobic_capacity: Some(AerobicCapacity {
                vo2_max_ml_kg_min: Some(63.0),
                source: Some("Field test".to_string()),
            }),
            heart_rate: None,
        }),
        terrain_advantages: Some(TerrainAdvantages {
            steep_descents: Some(DescentRating::Average),
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_resolves() {
        for preset in AthletePreset::ALL {
            let athlete = preset.resolve().unwrap();
            assert_eq!(athlete.name, preset.name());
        }
    }

    #[test]
    fn test_validated_carries_respiratory_bands() {
        let athlete = AthletePreset::Validated.resolve().unwrap();
        let bands = athlete.respiratory_bands.unwrap();
        assert_eq!(bands.extreme_danger_c, 5.0);
        assert_eq!(athlete.personal_high_risk_c, Some(8.0));
        assert_eq!(athlete.heart_rate.zone_2.max, 142);
    }

    #[test]
    fn test_minimal_and_climber_have_no_respiratory_profile() {
        assert!(AthletePreset::Minimal.resolve().unwrap().respiratory_bands.is_none());
        let climber = AthletePreset::Climber.resolve().unwrap();
        assert!(climber.respiratory_bands.is_none());
        assert!(!climber.steep_descents.is_strength());
    }
}
