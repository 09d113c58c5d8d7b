pub mod test_utils;

use ambutrack_core::eta_projector::{LegEstimate, RemainingEstimate};
use ambutrack_core::journey_controller::{
    ConfirmOutcome, JourneyConfig, JourneyController, JourneyEvent, Leg,
};
use ambutrack_core::route::Route;
use test_utils::{line_route, point};

fn config() -> JourneyConfig {
    JourneyConfig {
        driver_start: point(17.9749, 79.6036),
        patient: point(17.9817, 79.5332),
        hospital: point(17.9522, 79.5955),
    }
}

fn pickup_route(config: &JourneyConfig) -> Route {
    line_route(config.driver_start, config.patient, 5, 5200.0, 480.0)
}

fn dropoff_route(config: &JourneyConfig) -> Route {
    line_route(config.patient, config.hospital, 3, 3100.0, 240.0)
}

#[test]
fn full_journey_with_confirmation_at_patient() {
    let config = config();
    let mut controller = JourneyController::new(config);
    assert_eq!(controller.leg(), Leg::Pickup);
    assert_eq!(
        controller.active_endpoints(),
        (config.driver_start, config.patient)
    );

    let events = controller.load_route(pickup_route(&config));
    assert_eq!(
        events,
        vec![JourneyEvent::RouteLoaded {
            leg: Leg::Pickup,
            estimate: LegEstimate {
                distance_meters: 5200.0,
                duration_seconds: 480.0,
            },
        }]
    );

    assert_eq!(
        controller.tick(),
        vec![JourneyEvent::Progress {
            leg: Leg::Pickup,
            fraction: 0.25,
            remaining: RemainingEstimate {
                distance_km: 3.9,
                eta_minutes: 6,
            },
        }]
    );
    controller.tick();
    controller.tick();
    let arrival = controller.tick();
    assert_eq!(
        arrival,
        vec![
            JourneyEvent::Progress {
                leg: Leg::Pickup,
                fraction: 1.0,
                remaining: RemainingEstimate {
                    distance_km: 0.0,
                    eta_minutes: 0,
                },
            },
            JourneyEvent::AwaitingPickup,
        ]
    );
    assert!(controller.is_awaiting_pickup());

    // no auto-advance while waiting for the confirmation
    assert_eq!(controller.tick(), Vec::new());
    assert_eq!(controller.leg(), Leg::Pickup);

    let (outcome, events) = controller.confirm_pickup();
    assert_eq!(outcome, ConfirmOutcome::Advanced);
    assert_eq!(
        events,
        vec![
            JourneyEvent::PickupConfirmed,
            JourneyEvent::Progress {
                leg: Leg::Dropoff,
                fraction: 0.0,
                remaining: RemainingEstimate {
                    distance_km: 0.0,
                    eta_minutes: 0,
                },
            },
        ]
    );
    assert_eq!(controller.leg(), Leg::Dropoff);
    assert_eq!(
        controller.active_endpoints(),
        (config.patient, config.hospital)
    );
    assert!(!controller.is_animating());

    controller.load_route(dropoff_route(&config));
    assert!(controller.is_animating());
    controller.tick();
    let arrival = controller.tick();
    assert_eq!(
        arrival,
        vec![
            JourneyEvent::Progress {
                leg: Leg::Dropoff,
                fraction: 1.0,
                remaining: RemainingEstimate {
                    distance_km: 0.0,
                    eta_minutes: 0,
                },
            },
            JourneyEvent::JourneyComplete,
        ]
    );
    assert!(controller.is_complete());

    // terminal: nothing moves anymore
    assert_eq!(controller.tick(), Vec::new());
    let (outcome, events) = controller.confirm_pickup();
    assert_eq!(outcome, ConfirmOutcome::Ignored);
    assert_eq!(events, Vec::new());
}

#[test]
fn early_confirmation_is_queued_until_arrival() {
    let config = config();
    let mut controller = JourneyController::new(config);
    controller.load_route(pickup_route(&config));
    controller.tick();

    let (outcome, events) = controller.confirm_pickup();
    assert_eq!(outcome, ConfirmOutcome::Queued);
    assert_eq!(events, Vec::new());
    // still on the pickup leg, still animating
    assert_eq!(controller.leg(), Leg::Pickup);
    assert!(controller.is_animating());

    controller.tick();
    controller.tick();
    let arrival = controller.tick();
    // queued confirmation applies on arrival: no AwaitingPickup stop
    assert_eq!(
        arrival,
        vec![
            JourneyEvent::Progress {
                leg: Leg::Pickup,
                fraction: 1.0,
                remaining: RemainingEstimate {
                    distance_km: 0.0,
                    eta_minutes: 0,
                },
            },
            JourneyEvent::PickupConfirmed,
            JourneyEvent::Progress {
                leg: Leg::Dropoff,
                fraction: 0.0,
                remaining: RemainingEstimate {
                    distance_km: 0.0,
                    eta_minutes: 0,
                },
            },
        ]
    );
    assert_eq!(controller.leg(), Leg::Dropoff);
    assert!(!controller.is_awaiting_pickup());
}

#[test]
fn duplicate_confirmation_is_ignored() {
    let config = config();
    let mut controller = JourneyController::new(config);
    controller.load_route(pickup_route(&config));
    for _ in 0..4 {
        controller.tick();
    }
    let (outcome, _) = controller.confirm_pickup();
    assert_eq!(outcome, ConfirmOutcome::Advanced);
    let (outcome, events) = controller.confirm_pickup();
    assert_eq!(outcome, ConfirmOutcome::Ignored);
    assert_eq!(events, Vec::new());
}

#[test]
fn empty_route_reports_unavailable() {
    let config = config();
    let mut controller = JourneyController::new(config);
    let events = controller.load_route(Route::empty());
    assert_eq!(events, vec![JourneyEvent::RouteUnavailable { leg: Leg::Pickup }]);
    assert!(!controller.is_animating());
    assert_eq!(controller.tick(), Vec::new());
    assert_eq!(controller.position(), None);
}
