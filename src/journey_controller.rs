use crate::eta_projector::{self, LegEstimate, RemainingEstimate};
use crate::route::{GeoPoint, Route};
use crate::step_animator::{AnimatorEvent, AnimatorState, StepAnimator};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Leg {
    /// Driver's start location -> patient.
    Pickup,
    /// Patient -> hospital.
    Dropoff,
}

/// Journey endpoints, passed in at construction instead of living as module
/// globals.
#[derive(Copy, Clone, Debug)]
pub struct JourneyConfig {
    pub driver_start: GeoPoint,
    pub patient: GeoPoint,
    pub hospital: GeoPoint,
}

#[derive(Debug, PartialEq)]
pub enum JourneyEvent {
    RouteLoaded {
        leg: Leg,
        estimate: LegEstimate,
    },
    /// The provider had no route for the active leg; the journey stays put
    /// until the caller intervenes (UI keeps showing "loading").
    RouteUnavailable {
        leg: Leg,
    },
    Progress {
        leg: Leg,
        fraction: f64,
        remaining: RemainingEstimate,
    },
    /// Arrived at the patient, waiting for the pickup confirmation.
    AwaitingPickup,
    PickupConfirmed,
    /// Terminal, emitted exactly once.
    JourneyComplete,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Retargeted to the dropoff leg; the caller must fetch a route for the
    /// new endpoints.
    Advanced,
    /// Not at the patient yet; applied when the pickup leg arrives.
    Queued,
    /// Already confirmed or journey already complete.
    Ignored,
}

/// Sequences the two legs of a journey over one `StepAnimator`, gating the
/// pickup -> dropoff transition on an explicit confirmation from the caller.
/// Pure state machine; the owning task drives ticks and route fetches.
pub struct JourneyController {
    config: JourneyConfig,
    animator: StepAnimator,
    leg: Leg,
    pickup_confirmed: bool,
    pending_confirmation: bool,
    awaiting_pickup: bool,
    complete: bool,
    estimate: LegEstimate,
}

impl JourneyController {
    pub fn new(config: JourneyConfig) -> Self {
        JourneyController {
            config,
            animator: StepAnimator::new(),
            leg: Leg::Pickup,
            pickup_confirmed: false,
            pending_confirmation: false,
            awaiting_pickup: false,
            complete: false,
            estimate: LegEstimate::zero(),
        }
    }

    pub fn leg(&self) -> Leg {
        self.leg
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn is_awaiting_pickup(&self) -> bool {
        self.awaiting_pickup
    }

    pub fn is_animating(&self) -> bool {
        self.animator.state() == AnimatorState::Animating
    }

    /// Current marker position, if a route is loaded.
    pub fn position(&self) -> Option<GeoPoint> {
        self.animator.current_point()
    }

    pub fn active_endpoints(&self) -> (GeoPoint, GeoPoint) {
        match self.leg {
            Leg::Pickup => (self.config.driver_start, self.config.patient),
            Leg::Dropoff => (self.config.patient, self.config.hospital),
        }
    }

    /// Applies a freshly fetched route for the active leg. The caller is
    /// responsible for discarding stale fetches before this point.
    pub fn load_route(&mut self, route: Route) -> Vec<JourneyEvent> {
        if self.complete {
            return Vec::new();
        }
        if route.is_empty() {
            self.estimate = LegEstimate::zero();
            self.animator.reset();
            return vec![JourneyEvent::RouteUnavailable { leg: self.leg }];
        }
        self.estimate = LegEstimate {
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
        };
        let leg = self.leg;
        let estimate = self.estimate;
        let animator_events = self.animator.load_route(route);
        let mut events = vec![JourneyEvent::RouteLoaded { leg, estimate }];
        events.extend(self.map_animator_events(animator_events));
        events
    }

    /// One animation clock tick.
    pub fn tick(&mut self) -> Vec<JourneyEvent> {
        if self.complete {
            return Vec::new();
        }
        let animator_events = self.animator.tick();
        self.map_animator_events(animator_events)
    }

    /// External signal that the patient is onboard. Mid-leg confirmations are
    /// queued and applied on arrival at the patient.
    pub fn confirm_pickup(&mut self) -> (ConfirmOutcome, Vec<JourneyEvent>) {
        if self.complete || self.pickup_confirmed {
            debug!("pickup confirmation ignored (already confirmed or complete)");
            return (ConfirmOutcome::Ignored, Vec::new());
        }
        if self.awaiting_pickup {
            let events = self.advance_to_dropoff();
            (ConfirmOutcome::Advanced, events)
        } else {
            info!("pickup confirmed before arrival at patient, queuing");
            self.pending_confirmation = true;
            (ConfirmOutcome::Queued, Vec::new())
        }
    }

    fn map_animator_events(&mut self, animator_events: Vec<AnimatorEvent>) -> Vec<JourneyEvent> {
        let mut events = Vec::new();
        for animator_event in animator_events {
            match animator_event {
                AnimatorEvent::Progress(fraction) => events.push(JourneyEvent::Progress {
                    leg: self.leg,
                    fraction,
                    remaining: eta_projector::project(&self.estimate, fraction),
                }),
                AnimatorEvent::DestinationReached => events.extend(self.on_arrival()),
            }
        }
        events
    }

    fn on_arrival(&mut self) -> Vec<JourneyEvent> {
        match self.leg {
            Leg::Pickup => {
                if self.pending_confirmation {
                    self.pending_confirmation = false;
                    self.advance_to_dropoff()
                } else {
                    self.awaiting_pickup = true;
                    vec![JourneyEvent::AwaitingPickup]
                }
            }
            Leg::Dropoff => {
                self.complete = true;
                info!("journey complete");
                vec![JourneyEvent::JourneyComplete]
            }
        }
    }

    fn advance_to_dropoff(&mut self) -> Vec<JourneyEvent> {
        self.pickup_confirmed = true;
        self.awaiting_pickup = false;
        self.leg = Leg::Dropoff;
        self.animator.reset();
        self.estimate = LegEstimate::zero();
        vec![
            JourneyEvent::PickupConfirmed,
            JourneyEvent::Progress {
                leg: Leg::Dropoff,
                fraction: 0.0,
                remaining: eta_projector::project(&self.estimate, 0.0),
            },
        ]
    }
}
