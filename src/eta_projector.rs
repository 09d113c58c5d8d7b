/// Total estimates for the active leg, as reported by the routing provider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegEstimate {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl LegEstimate {
    pub fn zero() -> Self {
        LegEstimate {
            distance_meters: 0.0,
            duration_seconds: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RemainingEstimate {
    pub distance_km: f64,
    pub eta_minutes: u64,
}

/// Remaining distance/ETA at the given progress fraction. ETA is rounded up
/// to whole minutes.
pub fn project(estimate: &LegEstimate, progress: f64) -> RemainingEstimate {
    let remaining = (1.0 - progress).clamp(0.0, 1.0);
    RemainingEstimate {
        distance_km: remaining * estimate.distance_meters / 1000.0,
        eta_minutes: (remaining * estimate.duration_seconds / 60.0).ceil() as u64,
    }
}
