//! Cold-air respiratory risk.
//!
//! The athlete's temperature bands are turned into an ordered [`BandTable`];
//! the coldest matching band decides the risk level and its time penalty.

use serde::Serialize;
use tracing::debug;

use crate::{
    bands::{BandTable, Threshold},
    constants::respiratory,
    profiles::{Athlete, TemperatureBands},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RespiratoryRisk {
    /// No respiratory profile on record.
    #[serde(rename = "none")]
    None,
    Minimal,
    Low,
    Moderate,
    High,
    Extreme,
}

impl RespiratoryRisk {
    /// Time penalty inside the vulnerable zone.
    pub fn penalty(self) -> f64 {
        match self {
            RespiratoryRisk::Extreme => respiratory::EXTREME_PENALTY,
            RespiratoryRisk::High => respiratory::HIGH_PENALTY,
            RespiratoryRisk::Moderate => respiratory::MODERATE_PENALTY,
            RespiratoryRisk::Low => respiratory::LOW_PENALTY,
            RespiratoryRisk::Minimal | RespiratoryRisk::None => 0.0,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RespiratoryRisk::Extreme => "DNS - DO NOT START",
            RespiratoryRisk::High => "Start very conservatively, inhaler ready, consider DNS",
            RespiratoryRisk::Moderate => {
                "Inhaler accessible, warm up slowly, conservative first 15km"
            }
            RespiratoryRisk::Low => "Normal precautions, inhaler available",
            RespiratoryRisk::Minimal => "Standard asthma management",
            RespiratoryRisk::None => "N/A",
        }
    }
}

/// Builds the ordered band table for a set of temperature thresholds.
pub fn band_table(bands: &TemperatureBands) -> BandTable<RespiratoryRisk, 4> {
    BandTable::new(
        [
            (Threshold::AtMost(bands.extreme_danger_c), RespiratoryRisk::Extreme),
            (Threshold::AtMost(bands.high_risk_c), RespiratoryRisk::High),
            (Threshold::AtMost(bands.moderate_risk_c), RespiratoryRisk::Moderate),
            (Threshold::AtMost(bands.low_risk_c), RespiratoryRisk::Low),
        ],
        RespiratoryRisk::Minimal,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespiratoryAssessment {
    pub risk: RespiratoryRisk,
    pub penalty: f64,
    pub recommendation: &'static str,
    /// Kilometres of the course inside the vulnerable zone. Informational.
    pub vulnerable_km: f64,
    pub peak_risk_km: f64,
}

impl RespiratoryAssessment {
    fn new(risk: RespiratoryRisk, penalty: f64, distance_km: f64) -> Self {
        Self {
            risk,
            penalty,
            recommendation: risk.recommendation(),
            vulnerable_km: (distance_km - respiratory::VULNERABLE_FROM_KM)
                .clamp(0.0, respiratory::VULNERABLE_SPAN_KM),
            peak_risk_km: respiratory::PEAK_RISK_KM,
        }
    }

    pub fn is_active(&self) -> bool {
        self.risk != RespiratoryRisk::None
    }
}

/// Classifies `temperature_c` against explicit bands.
///
/// Courses shorter than the vulnerable-zone start only carry half the
/// band's penalty.
pub fn assess_with_bands(
    bands: &TemperatureBands,
    temperature_c: f64,
    distance_km: f64,
) -> RespiratoryAssessment {
    let risk = band_table(bands).classify(temperature_c);
    let mut penalty = risk.penalty();
    if distance_km < respiratory::VULNERABLE_FROM_KM {
        penalty *= respiratory::PRE_ZONE_PENALTY_SCALE;
    }
    RespiratoryAssessment::new(risk, penalty, distance_km)
}

/// Respiratory risk for this athlete. Athletes without a respiratory
/// profile always get `none` with no penalty.
pub fn assess_respiratory_risk(
    athlete: &Athlete,
    temperature_c: f64,
    distance_km: f64,
) -> RespiratoryAssessment {
    let assessment = match &athlete.respiratory_bands {
        Some(bands) => assess_with_bands(bands, temperature_c, distance_km),
        None => RespiratoryAssessment::new(RespiratoryRisk::None, 0.0, distance_km),
    };
    debug!(
        "Respiratory risk at {temperature_c}°C over {distance_km}km: {:?} (penalty {})",
        assessment.risk, assessment.penalty
    );
    assessment
}
