use std::time::Duration;

use crate::route::{GeoPoint, Route};

/// Fixed period of the animation clock.
pub const TICK_PERIOD: Duration = Duration::from_millis(200);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// No route loaded, nothing to animate.
    Idle,
    /// Position index advancing on each tick.
    Animating,
    /// Index at the last position, arrival already reported.
    AtDestination,
}

#[derive(Debug, PartialEq)]
pub enum AnimatorEvent {
    /// index / (len - 1), in [0, 1].
    Progress(f64),
    /// Emitted exactly once per loaded route.
    DestinationReached,
}

/// Steps a position index along a route. Pure state machine: the owner drives
/// it by calling `tick` on its clock and is free to drop ticks on teardown.
pub struct StepAnimator {
    route: Route,
    position: usize,
    state: AnimatorState,
}

impl StepAnimator {
    pub fn new() -> Self {
        StepAnimator {
            route: Route::empty(),
            position: 0,
            state: AnimatorState::Idle,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn progress(&self) -> f64 {
        match self.route.points.len() {
            0 | 1 => {
                if self.state == AnimatorState::AtDestination {
                    1.0
                } else {
                    0.0
                }
            }
            len => self.position as f64 / (len - 1) as f64,
        }
    }

    pub fn current_point(&self) -> Option<GeoPoint> {
        self.route.points.get(self.position).copied()
    }

    /// Replaces the active route and resets the position to 0. An empty route
    /// keeps the animator idle (no animation possible). A single-point route
    /// arrives immediately.
    pub fn load_route(&mut self, route: Route) -> Vec<AnimatorEvent> {
        self.position = 0;
        if route.is_empty() {
            self.route = route;
            self.state = AnimatorState::Idle;
            Vec::new()
        } else if route.points.len() == 1 {
            self.route = route;
            self.state = AnimatorState::AtDestination;
            vec![
                AnimatorEvent::Progress(1.0),
                AnimatorEvent::DestinationReached,
            ]
        } else {
            self.route = route;
            self.state = AnimatorState::Animating;
            Vec::new()
        }
    }

    /// Discards the active route. The owner must stop the clock for the old
    /// route before animating a new one.
    pub fn reset(&mut self) {
        self.route = Route::empty();
        self.position = 0;
        self.state = AnimatorState::Idle;
    }

    /// One clock tick. In `Animating` the index advances by one; reaching the
    /// last index reports arrival and further ticks are no-ops (index stays
    /// clamped).
    pub fn tick(&mut self) -> Vec<AnimatorEvent> {
        match self.state {
            AnimatorState::Idle | AnimatorState::AtDestination => Vec::new(),
            AnimatorState::Animating => {
                let last = self.route.points.len() - 1;
                if self.position < last {
                    self.position += 1;
                }
                let progress = self.position as f64 / last as f64;
                if self.position == last {
                    self.state = AnimatorState::AtDestination;
                    vec![
                        AnimatorEvent::Progress(progress),
                        AnimatorEvent::DestinationReached,
                    ]
                } else {
                    vec![AnimatorEvent::Progress(progress)]
                }
            }
        }
    }
}
