//! Athlete profile document and its resolved form.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lenient;
use crate::constants::{athlete as defaults, respiratory, triggers};
use crate::errors::ForecastError;

/// Athlete profile as stored on disk.
///
/// Only the athlete's name is mandatory. `name` and `racing_experience` may
/// sit at the top level or under `athlete_info`; the nested form wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub racing_experience: Option<RacingExperience>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub athlete_info: Option<AthleteInfo>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub fitness_baseline: Option<FitnessBaseline>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub respiratory_profile: Option<RespiratoryProfile>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub health_profile: Option<HealthProfile>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub physiological_profile: Option<PhysiologicalProfile>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub terrain_advantages: Option<TerrainAdvantages>,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub success_factors_ranked: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteInfo {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub racing_experience: Option<RacingExperience>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RacingExperience {
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub weaknesses: Vec<String>,
    #[serde(default, deserialize_with = "lenient::lossy_vec")]
    pub past_dnfs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitnessBaseline {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub training_load: Option<TrainingLoad>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingLoad {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub ctl_utmb_2025: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub ctl_arc_2025: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespiratoryProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub temperature_risk_bands: Option<TemperatureRiskBands>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureRiskBands {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub extreme_danger_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub high_risk_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub moderate_risk_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub low_risk_c: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub respiratory_conditions: Option<RespiratoryConditions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespiratoryConditions {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub temperature_thresholds_c: Option<TemperatureThresholds>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureThresholds {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub high_risk_c: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysiologicalProfile {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub aerobic_capacity: Option<AerobicCapacity>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub heart_rate: Option<HeartRateProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AerobicCapacity {
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub vo2_max_ml_kg_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartRateProfile {
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_2_min: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_2_max: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_3_min: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_3_max: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_4_min: Option<u32>,
    #[serde(default, deserialize_with = "lenient::bpm")]
    pub zone_4_max: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainAdvantages {
    #[serde(default, deserialize_with = "lenient::descent_rating")]
    pub steep_descents: Option<DescentRating>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescentRating {
    Elite,
    Strong,
    #[default]
    Competitive,
    Average,
}

impl DescentRating {
    pub fn is_strength(&self) -> bool {
        matches!(self, DescentRating::Elite | DescentRating::Strong)
    }

    /// Matches a rating label regardless of case or surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "elite" => Some(DescentRating::Elite),
            "strong" => Some(DescentRating::Strong),
            "competitive" => Some(DescentRating::Competitive),
            "average" => Some(DescentRating::Average),
            _ => None,
        }
    }
}

/// Temperature thresholds (°C) at or below which each respiratory band applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureBands {
    pub extreme_danger_c: f64,
    pub high_risk_c: f64,
    pub moderate_risk_c: f64,
    pub low_risk_c: f64,
}

impl Default for TemperatureBands {
    fn default() -> Self {
        Self {
            extreme_danger_c: respiratory::DEFAULT_EXTREME_DANGER_C,
            high_risk_c: respiratory::DEFAULT_HIGH_RISK_C,
            moderate_risk_c: respiratory::DEFAULT_MODERATE_RISK_C,
            low_risk_c: respiratory::DEFAULT_LOW_RISK_C,
        }
    }
}

impl From<&TemperatureRiskBands> for TemperatureBands {
    fn from(raw: &TemperatureRiskBands) -> Self {
        let fallback = Self::default();
        Self {
            extreme_danger_c: raw.extreme_danger_c.unwrap_or(fallback.extreme_danger_c),
            high_risk_c: raw.high_risk_c.unwrap_or(fallback.high_risk_c),
            moderate_risk_c: raw.moderate_risk_c.unwrap_or(fallback.moderate_risk_c),
            low_risk_c: raw.low_risk_c.unwrap_or(fallback.low_risk_c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneRange {
    pub min: Option<u32>,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateZones {
    pub zone_2: ZoneRange,
    pub zone_3: ZoneRange,
    pub zone_4: ZoneRange,
}

impl From<Option<&HeartRateProfile>> for HeartRateZones {
    fn from(raw: Option<&HeartRateProfile>) -> Self {
        let raw = raw.cloned().unwrap_or_default();
        Self {
            zone_2: ZoneRange {
                min: raw.zone_2_min,
                max: raw.zone_2_max.unwrap_or(triggers::FALLBACK_ZONE_2_MAX),
            },
            zone_3: ZoneRange {
                min: raw.zone_3_min,
                max: raw.zone_3_max.unwrap_or(triggers::FALLBACK_ZONE_3_MAX),
            },
            zone_4: ZoneRange {
                min: raw.zone_4_min,
                max: raw.zone_4_max.unwrap_or(triggers::FALLBACK_ZONE_4_MAX),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingLoadBaseline {
    pub ctl_utmb_2025: f64,
    pub ctl_arc_2025: f64,
}

/// Athlete with every optional section filled in from the defaults table.
#[derive(Debug, Clone, PartialEq)]
pub struct Athlete {
    pub name: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub past_dnfs: Vec<String>,
    pub training_load: TrainingLoadBaseline,
    /// `None` when the athlete has no respiratory profile at all.
    pub respiratory_bands: Option<TemperatureBands>,
    /// Personal high-risk threshold from the health profile, if recorded.
    pub personal_high_risk_c: Option<f64>,
    pub vo2_max: f64,
    pub vo2_source: String,
    pub heart_rate: HeartRateZones,
    pub steep_descents: DescentRating,
    pub success_factors: Vec<String>,
}

impl Athlete {
    pub fn has_strength(&self, strength: &str) -> bool {
        self.strengths.iter().any(|s| s == strength)
    }

    pub fn has_weakness(&self, weakness: &str) -> bool {
        self.weaknesses.iter().any(|w| w == weakness)
    }

    /// Bands used for pre-race gating: the athlete's own, or the defaults.
    pub fn gating_bands(&self) -> TemperatureBands {
        self.respiratory_bands.unwrap_or_default()
    }
}

impl AthleteProfile {
    /// Applies the athlete defaults table.
    ///
    /// Fails only when the athlete's name is absent.
    pub fn resolve(&self) -> Result<Athlete, ForecastError> {
        let info = self.athlete_info.as_ref();

        let name = info
            .and_then(|i| i.name.as_deref())
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ForecastError::missing("athlete", "athlete_info.name"))?
            .to_string();

        let experience = info
            .and_then(|i| i.racing_experience.clone())
            .or_else(|| self.racing_experience.clone())
            .unwrap_or_else(|| {
                debug!("No racing_experience for {name}; assuming none");
                RacingExperience::default()
            });

        let load = self
            .fitness_baseline
            .as_ref()
            .and_then(|b| b.training_load.clone())
            .unwrap_or_default();

        let respiratory_bands = self.respiratory_profile.as_ref().map(|profile| {
            profile
                .temperature_risk_bands
                .as_ref()
                .map_or_else(TemperatureBands::default, TemperatureBands::from)
        });
        if respiratory_bands.is_none() {
            debug!("No respiratory_profile for {name}; respiratory risk disabled");
        }

        let personal_high_risk_c = self
            .health_profile
            .as_ref()
            .and_then(|h| h.respiratory_conditions.as_ref())
            .and_then(|c| c.temperature_thresholds_c.as_ref())
            .and_then(|t| t.high_risk_c);

        let physiology = self.physiological_profile.as_ref();
        let aerobic = physiology.and_then(|p| p.aerobic_capacity.as_ref());

        Ok(Athlete {
            strengths: experience.strengths,
            weaknesses: experience.weaknesses,
            past_dnfs: experience.past_dnfs,
            training_load: TrainingLoadBaseline {
                ctl_utmb_2025: load.ctl_utmb_2025.unwrap_or(defaults::DEFAULT_CTL_UTMB_2025),
                ctl_arc_2025: load.ctl_arc_2025.unwrap_or(defaults::DEFAULT_CTL_ARC_2025),
            },
            respiratory_bands,
            personal_high_risk_c,
            vo2_max: aerobic
                .and_then(|a| a.vo2_max_ml_kg_min)
                .unwrap_or(defaults::DEFAULT_VO2_MAX),
            vo2_source: aerobic
                .and_then(|a| a.source.clone())
                .unwrap_or_else(|| defaults::DEFAULT_VO2_SOURCE.to_string()),
            heart_rate: HeartRateZones::from(physiology.and_then(|p| p.heart_rate.as_ref())),
            steep_descents: self
                .terrain_advantages
                .as_ref()
                .and_then(|t| t.steep_descents)
                .unwrap_or_default(),
            success_factors: self.success_factors_ranked.clone(),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_profile_gets_defaults() {
        let profile: AthleteProfile =
            serde_json::from_str(r#"{"athlete_info": {"name": "Sam"}}"#).unwrap();
        let athlete = profile.resolve().unwrap();

        assert_eq!(athlete.name, "Sam");
        assert!(athlete.strengths.is_empty());
        assert!(athlete.respiratory_bands.is_none());
        assert!(athlete.personal_high_risk_c.is_none());
        assert_eq!(athlete.vo2_max, 52.0);
        assert_eq!(athlete.vo2_source, "Estimated");
        assert_eq!(athlete.heart_rate.zone_2.max, 145);
        assert_eq!(athlete.heart_rate.zone_3.max, 155);
        assert_eq!(athlete.heart_rate.zone_4.max, 165);
        assert_eq!(athlete.heart_rate.zone_2.min, None);
        assert_eq!(athlete.training_load.ctl_utmb_2025, 120.0);
        assert_eq!(athlete.training_load.ctl_arc_2025, 138.0);
        assert_eq!(athlete.steep_descents, DescentRating::Competitive);
    }

    #[test]
    fn test_flat_layout_accepted() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"name": "Flat", "racing_experience": {"strengths": ["Pacing discipline"]}}"#,
        )
        .unwrap();
        let athlete = profile.resolve().unwrap();
        assert_eq!(athlete.name, "Flat");
        assert!(athlete.has_strength("Pacing discipline"));
    }

    #[test]
    fn test_nested_layout_wins() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"name": "Outer", "athlete_info": {"name": "Inner"}}"#,
        )
        .unwrap();
        assert_eq!(profile.resolve().unwrap().name, "Inner");
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let profile = AthleteProfile::default();
        let err = profile.resolve().unwrap_err();
        assert!(matches!(
            err,
            ForecastError::MissingRequiredInput {
                document: "athlete",
                ..
            }
        ));
    }

    #[test]
    fn test_respiratory_profile_without_bands_uses_default_bands() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"athlete_info": {"name": "A"}, "respiratory_profile": {}}"#,
        )
        .unwrap();
        let athlete = profile.resolve().unwrap();
        assert_eq!(athlete.respiratory_bands, Some(TemperatureBands::default()));
    }

    #[test]
    fn test_partial_bands_filled_per_field() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"athlete_info": {"name": "A"},
                "respiratory_profile": {"temperature_risk_bands": {"extreme_danger_c": 3}}}"#,
        )
        .unwrap();
        let bands = profile.resolve().unwrap().respiratory_bands.unwrap();
        assert_eq!(bands.extreme_danger_c, 3.0);
        assert_eq!(bands.high_risk_c, 8.0);
    }

    #[test]
    fn test_descent_rating_strength() {
        assert!(DescentRating::Elite.is_strength());
        assert!(DescentRating::Strong.is_strength());
        assert!(!DescentRating::Competitive.is_strength());
        assert!(!DescentRating::Average.is_strength());
    }

    #[test]
    fn test_descent_rating_any_case() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"name": "A", "terrain_advantages": {"steep_descents": "Elite"}}"#,
        )
        .unwrap();
        let athlete = profile.resolve().unwrap();
        assert_eq!(athlete.steep_descents, DescentRating::Elite);
        assert!(athlete.steep_descents.is_strength());
    }

    #[test]
    fn test_unknown_descent_rating_falls_back() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"name": "A", "terrain_advantages": {"steep_descents": "fearless"}}"#,
        )
        .unwrap();
        assert_eq!(
            profile.resolve().unwrap().steep_descents,
            DescentRating::Competitive
        );
    }

    #[test]
    fn test_fractional_and_malformed_heart_rate() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"name": "A", "physiological_profile": {"heart_rate":
                {"zone_2_min": 130, "zone_2_max": 148.5, "zone_3_max": "n/a", "zone_4_max": 171}}}"#,
        )
        .unwrap();
        let zones = profile.resolve().unwrap().heart_rate;
        assert_eq!(zones.zone_2.min, Some(130));
        assert_eq!(zones.zone_2.max, 149);
        assert_eq!(zones.zone_3.max, 155);
        assert_eq!(zones.zone_4.max, 171);
    }

    #[test]
    fn test_malformed_leaves_keep_the_rest() {
        let profile: AthleteProfile = serde_json::from_str(
            r#"{"athlete_info": {"name": "A", "racing_experience": {"strengths": ["Pacing discipline", 7]}},
                "fitness_baseline": {"training_load": {"ctl_utmb_2025": "high", "ctl_arc_2025": 140}},
                "physiological_profile": {"aerobic_capacity": {"vo2_max_ml_kg_min": 57}},
                "success_factors_ranked": ["Fueling", null]}"#,
        )
        .unwrap();
        let athlete = profile.resolve().unwrap();
        assert_eq!(athlete.strengths, ["Pacing discipline"]);
        assert_eq!(athlete.training_load.ctl_utmb_2025, 120.0);
        assert_eq!(athlete.training_load.ctl_arc_2025, 140.0);
        assert_eq!(athlete.vo2_max, 57.0);
        assert_eq!(athlete.success_factors, ["Fueling"]);
    }
}
