use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreBand {
    Destructive,
    Warning,
    Primary,
    Success,
}

/// Cut points differ per view and are intentionally not unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandPolicy {
    /// Module, quiz attempt and assignment cards: 85 / 70 / 50.
    Module,
    /// Student roster cards and the assignment grade ring: 85 / 70, floor is Warning.
    Roster,
    /// Teacher performance matrix: 80 / 60, floor is Destructive.
    Matrix,
}

impl BandPolicy {
    fn floor(self) -> ScoreBand {
        match self {
            BandPolicy::Module | BandPolicy::Matrix => ScoreBand::Destructive,
            BandPolicy::Roster => ScoreBand::Warning,
        }
    }
}

/// Percentages outside 0..=100 are clamped; NaN falls to the policy floor.
pub fn classify(policy: BandPolicy, percent: f64) -> ScoreBand {
    if percent.is_nan() {
        return policy.floor();
    }
    let p = percent.clamp(0.0, 100.0);
    match policy {
        BandPolicy::Module => {
            if p >= 85.0 {
                ScoreBand::Success
            } else if p >= 70.0 {
                ScoreBand::Primary
            } else if p >= 50.0 {
                ScoreBand::Warning
            } else {
                ScoreBand::Destructive
            }
        }
        BandPolicy::Roster => {
            if p >= 85.0 {
                ScoreBand::Success
            } else if p >= 70.0 {
                ScoreBand::Primary
            } else {
                ScoreBand::Warning
            }
        }
        BandPolicy::Matrix => {
            if p >= 80.0 {
                ScoreBand::Success
            } else if p >= 60.0 {
                ScoreBand::Warning
            } else {
                ScoreBand::Destructive
            }
        }
    }
}

/// Matrix cells with a zero (or missing) percentage carry no colour.
pub fn matrix_band(percent: Option<f64>) -> Option<ScoreBand> {
    match percent {
        Some(p) if p != 0.0 && !p.is_nan() => Some(classify(BandPolicy::Matrix, p)),
        _ => None,
    }
}
