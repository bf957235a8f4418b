//! Model constants.
//!
//! Every fixed number the forecast models rely on lives here so that the
//! formulas read as formulas.

/// Reference race used to anchor the finish-time model.
pub mod validation {
    /// Validated finish time (4h23m) in hours.
    pub const VALIDATED_FINISH_HOURS: f64 = 4.0 + 23.0 / 60.0;
    /// Fitness multiplier the validated finish was run at.
    pub const VALIDATED_FITNESS: f64 = 1.15;
    /// Fatigue penalty per unit of fitness deviation from the validated level.
    pub const FATIGUE_DEVIATION_RATE: f64 = 0.05;
}

/// Finish-time distribution shape.
pub mod distribution {
    /// Coefficient of variation applied to the mean finish time.
    pub const COEFFICIENT_OF_VARIATION: f64 = 0.08;
    /// Standard-normal quantiles for P10, P25, P50, P75, P90.
    pub const Z_P10: f64 = -1.28;
    pub const Z_P25: f64 = -0.67;
    pub const Z_P50: f64 = 0.0;
    pub const Z_P75: f64 = 0.67;
    pub const Z_P90: f64 = 1.28;

    pub const DEFAULT_MONTE_CARLO_TRIALS: usize = 500;
    pub const DEFAULT_MONTE_CARLO_SEED: u64 = 42;
    /// Per-trial moving-time variation (CV) and clamp.
    pub const MOVING_TIME_CV: f64 = 0.08;
    pub const MOVING_TIME_CLAMP: (f64, f64) = (0.7, 1.4);
    /// Per-trial aid-station dwell variation (CV) and clamp.
    pub const AID_TIME_CV: f64 = 0.25;
    pub const AID_TIME_CLAMP: (f64, f64) = (0.5, 2.0);
}

/// Respiratory temperature bands and penalties.
pub mod respiratory {
    pub const DEFAULT_EXTREME_DANGER_C: f64 = 5.0;
    pub const DEFAULT_HIGH_RISK_C: f64 = 8.0;
    pub const DEFAULT_MODERATE_RISK_C: f64 = 10.0;
    pub const DEFAULT_LOW_RISK_C: f64 = 12.0;

    pub const EXTREME_PENALTY: f64 = 0.25;
    pub const HIGH_PENALTY: f64 = 0.15;
    pub const MODERATE_PENALTY: f64 = 0.08;
    pub const LOW_PENALTY: f64 = 0.03;

    /// Distance at which the athlete becomes fully vulnerable.
    pub const VULNERABLE_FROM_KM: f64 = 3.0;
    /// Length of the vulnerable zone after `VULNERABLE_FROM_KM`.
    pub const VULNERABLE_SPAN_KM: f64 = 22.0;
    pub const PEAK_RISK_KM: f64 = 15.0;
    /// Penalty scale applied before the vulnerable zone.
    pub const PRE_ZONE_PENALTY_SCALE: f64 = 0.5;
}

/// Execution-risk scoring.
pub mod execution {
    pub const PACING_BASE: i32 = 50;
    pub const PACING_DISCIPLINE_BONUS: i32 = -20;
    pub const FAST_START_PENALTY: i32 = 25;
    pub const RUNNABLE_COURSE_PENALTY: i32 = 15;
    pub const RUNNABLE_FRACTION_TRIGGER: f64 = 0.7;

    pub const PACING_STRENGTH: &str = "Pacing discipline";
    pub const FAST_START_WEAKNESS: &str = "Going out too fast";

    pub const LATE_STOP_FACTOR: f64 = 1.5;
    pub const TARGET_STOP_FACTOR: f64 = 0.8;
    pub const DWELL_CREEP_WARNING_MIN: f64 = 5.0;

    pub const NIGHT_END_HOUR: f64 = 6.0;
    pub const NIGHT_START_HOUR: f64 = 20.0;
    pub const LONG_RACE_HOURS: f64 = 12.0;
    pub const MAX_NIGHT_HOURS: f64 = 10.0;
    pub const NIGHT_LOAD_WARNING_PCT: f64 = 30.0;

    pub const RESPIRATORY_OVERLAP: u32 = 60;
    pub const TECHNICAL_OVERLAP: u32 = 20;
    pub const TECHNICAL_COURSE_TYPE: &str = "technical_coastal_trail";
    pub const TECHNICAL_DNF_MARKER: &str = "technical";
}

/// Decision-trigger tables.
pub mod triggers {
    pub const FALLBACK_PACE_MIN_PER_KM: f64 = 6.5;
    pub const FALLBACK_ZONE_2_MAX: u32 = 145;
    pub const FALLBACK_ZONE_3_MAX: u32 = 155;
    pub const FALLBACK_ZONE_4_MAX: u32 = 165;

    pub const ALWAYS_HIKE_GRADE_PCT: f64 = 12.0;
    pub const HR_GATED_GRADE_PCT: f64 = 8.0;
    pub const WALK_HEART_RATE_BPM: u32 = 160;
    pub const MAX_RUNNABLE_DESCENT_PCT: f64 = 20.0;

    pub const SALVAGE_BEHIND_P75_MIN: f64 = 30.0;
    pub const ABORT_RESTRICTED_BREATHING_MIN: u32 = 5;
    pub const ABORT_NO_PROGRESS_MIN: u32 = 15;
}

/// Athlete-state and course-interaction defaults.
pub mod athlete {
    pub const DEFAULT_VO2_MAX: f64 = 52.0;
    pub const DEFAULT_VO2_SOURCE: &str = "Estimated";
    pub const DEFAULT_CTL_UTMB_2025: f64 = 120.0;
    pub const DEFAULT_CTL_ARC_2025: f64 = 138.0;
    /// CTL assumed for a fitness multiplier of 1.2.
    pub const PEAK_FITNESS_CTL: f64 = 150.0;

    pub const TECHNICAL_STRENGTH: &str = "Technical descending";
}
