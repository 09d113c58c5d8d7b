use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use uuid::Uuid;

use crate::journey_controller::{ConfirmOutcome, JourneyConfig, JourneyController, JourneyEvent};
use crate::route::{GeoPoint, Route};
use crate::route_fetcher::RouteProvider;
use crate::step_animator::TICK_PERIOD;

enum Command {
    ConfirmPickup,
    Shutdown,
}

/// Handle to a live journey. All session state lives on a single owner task;
/// the handle only sends commands. Dropping the handle tears the task down,
/// so no tick or fetch callback fires after the tracking view goes away.
pub struct TrackingSession {
    id: Uuid,
    cmd_tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl TrackingSession {
    /// Spawns the owner task and immediately requests the pickup leg's route.
    /// Journey events are delivered on `events` in order.
    pub fn start(
        provider: Arc<dyn RouteProvider>,
        config: JourneyConfig,
        events: mpsc::UnboundedSender<JourneyEvent>,
    ) -> Self {
        let id = Uuid::new_v4();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(id, provider, config, cmd_rx, events));
        info!("tracking session {} started", id);
        TrackingSession { id, cmd_tx, handle }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn confirm_pickup(&self) {
        let _ = self.cmd_tx.send(Command::ConfirmPickup);
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
        self.handle.abort();
        info!("tracking session {} stopped", self.id);
    }
}

async fn run(
    id: Uuid,
    provider: Arc<dyn RouteProvider>,
    config: JourneyConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<JourneyEvent>,
) {
    let mut controller = JourneyController::new(config);
    let (route_tx, mut route_rx) = mpsc::unbounded_channel::<(u64, Route)>();
    let mut generation: u64 = 0;
    let mut clock: Option<Interval> = None;

    let (start, end) = controller.active_endpoints();
    spawn_fetch(provider.clone(), start, end, generation, route_tx.clone());

    loop {
        tokio::select! {
            fetched = route_rx.recv() => {
                let (fetch_generation, route) = match fetched {
                    Some(fetched) => fetched,
                    None => break,
                };
                let leg_before = controller.leg();
                let loaded = match apply_route(&mut controller, generation, fetch_generation, route) {
                    Some(loaded) => loaded,
                    None => continue,
                };
                clock = if controller.is_animating() {
                    Some(animation_clock())
                } else {
                    None
                };
                let advanced = controller.leg() != leg_before;
                if !forward(&events, loaded) {
                    break;
                }
                if advanced {
                    // a queued confirmation can apply while loading a
                    // degenerate (single-point) pickup route
                    start_next_leg_fetch(
                        &controller, &provider, &route_tx, &mut generation, &mut clock,
                    );
                }
            }
            _ = next_tick(&mut clock) => {
                let leg_before = controller.leg();
                let ticked = controller.tick();
                if !controller.is_animating() {
                    clock = None;
                }
                let advanced = controller.leg() != leg_before;
                if !forward(&events, ticked) {
                    break;
                }
                if advanced {
                    // queued confirmation applied on arrival at the patient
                    start_next_leg_fetch(
                        &controller, &provider, &route_tx, &mut generation, &mut clock,
                    );
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    None | Some(Command::Shutdown) => break,
                    Some(Command::ConfirmPickup) => {
                        let (outcome, confirmed) = controller.confirm_pickup();
                        if !forward(&events, confirmed) {
                            break;
                        }
                        if outcome == ConfirmOutcome::Advanced {
                            start_next_leg_fetch(
                                &controller, &provider, &route_tx, &mut generation, &mut clock,
                            );
                        }
                    }
                }
            }
        }
    }
    debug!("session {}: owner loop exited", id);
}

/// Applies a fetch result to the controller, or drops it when a newer
/// request has been issued since. Late results from superseded requests
/// must never move the journey.
fn apply_route(
    controller: &mut JourneyController,
    generation: u64,
    fetch_generation: u64,
    route: Route,
) -> Option<Vec<JourneyEvent>> {
    if fetch_generation != generation {
        debug!(
            "discarding stale route (generation {}, current {})",
            fetch_generation, generation
        );
        return None;
    }
    Some(controller.load_route(route))
}

/// The leg just changed: stop the old leg's clock, supersede any fetch
/// still in flight, and request the new leg's route.
fn start_next_leg_fetch(
    controller: &JourneyController,
    provider: &Arc<dyn RouteProvider>,
    route_tx: &mpsc::UnboundedSender<(u64, Route)>,
    generation: &mut u64,
    clock: &mut Option<Interval>,
) {
    *clock = None;
    *generation += 1;
    let (start, end) = controller.active_endpoints();
    spawn_fetch(provider.clone(), start, end, *generation, route_tx.clone());
}

fn animation_clock() -> Interval {
    // first tick one full period after the route is loaded
    let mut clock = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    clock
}

async fn next_tick(clock: &mut Option<Interval>) {
    match clock {
        Some(clock) => {
            clock.tick().await;
        }
        // no clock running, the branch stays silent until one is installed
        None => std::future::pending().await,
    }
}

fn forward(events: &mpsc::UnboundedSender<JourneyEvent>, batch: Vec<JourneyEvent>) -> bool {
    for event in batch {
        if events.send(event).is_err() {
            // nobody is watching this journey anymore
            return false;
        }
    }
    true
}

fn spawn_fetch(
    provider: Arc<dyn RouteProvider>,
    start: GeoPoint,
    end: GeoPoint,
    generation: u64,
    route_tx: mpsc::UnboundedSender<(u64, Route)>,
) {
    tokio::spawn(async move {
        let route = match provider.fetch_route(start, end).await {
            Ok(route) => route,
            Err(e) => {
                warn!("route fetch failed: {:#}", e);
                Route::empty()
            }
        };
        let _ = route_tx.send((generation, route));
    });
}
