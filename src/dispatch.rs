use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use tokio::sync::mpsc;
use tokio::time::{self, Duration, MissedTickBehavior};

use crate::handoff_store::{HandoffStore, UserDetails};
use crate::hospital_search::Hospital;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AmbulanceOption {
    pub id: u32,
    pub kind: &'static str,
    pub price_range: &'static str,
    pub service: &'static str,
}

/// The mocked fleet offered after a hospital is selected.
pub fn ambulance_catalog() -> Vec<AmbulanceOption> {
    vec![
        AmbulanceOption {
            id: 1,
            kind: "BLS",
            price_range: "₹500 - ₹700",
            service: "City Ambulance",
        },
        AmbulanceOption {
            id: 4,
            kind: "BLS - with EMT",
            price_range: "₹1500 - ₹1700",
            service: "City Ambulance",
        },
        AmbulanceOption {
            id: 2,
            kind: "ALS - with EMT",
            price_range: "₹2000 - ₹2500",
            service: "LifeCare EMS",
        },
        AmbulanceOption {
            id: 3,
            kind: "ALS - without EMT",
            price_range: "₹1000 - ₹1500",
            service: "MediFast",
        },
    ]
}

pub fn ambulance_by_id(id: u32) -> Result<AmbulanceOption> {
    ambulance_catalog()
        .into_iter()
        .find(|option| option.id == id)
        .ok_or_else(|| anyhow!("unknown ambulance option: {}", id))
}

pub struct BookingContext {
    pub hospital: Hospital,
    pub user: UserDetails,
}

pub enum PrerequisiteCheck {
    Ready(BookingContext),
    /// Required hand-off data is missing; send the user back to the search
    /// entry point instead of failing.
    RedirectToSearch,
}

/// Booking may only proceed once the search stage stored a hospital and the
/// user's details.
pub fn check_prerequisites(store: &HandoffStore) -> Result<PrerequisiteCheck> {
    let hospital = store.selected_hospital()?;
    let user = store.user_details()?;
    match (hospital, user) {
        (Some(hospital), Some(user)) => {
            Ok(PrerequisiteCheck::Ready(BookingContext { hospital, user }))
        }
        _ => {
            info!("hand-off data missing, redirecting to search");
            Ok(PrerequisiteCheck::RedirectToSearch)
        }
    }
}

pub const DEFAULT_ASSIGNMENT_WINDOW: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Driver {
    pub name: String,
    pub phone: String,
    pub service: String,
    pub assigned_at: DateTime<Utc>,
}

const MOCK_DRIVERS: &[(&str, &str)] = &[
    ("John Doe", "+91 9876543210"),
    ("Asha Rao", "+91 9812304567"),
    ("Ravi Kumar", "+91 9934012876"),
];

/// Mocked driver assignment: counts down the assignment window at 1 Hz on
/// `countdown` (remaining whole seconds), then resolves to a driver from the
/// selected service. There is no real dispatch behind this.
pub async fn assign_driver(
    option: &AmbulanceOption,
    window: Duration,
    countdown: mpsc::UnboundedSender<u64>,
) -> Driver {
    let mut remaining = window.as_secs();
    let mut clock = time::interval(Duration::from_secs(1));
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    clock.tick().await;
    while remaining > 0 {
        clock.tick().await;
        remaining -= 1;
        let _ = countdown.send(remaining);
    }
    let (name, phone) = MOCK_DRIVERS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(MOCK_DRIVERS[0]);
    let driver = Driver {
        name: name.to_string(),
        phone: phone.to_string(),
        service: option.service.to_string(),
        assigned_at: Utc::now(),
    };
    info!("assigned driver {} ({})", driver.name, driver.service);
    driver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup() {
        assert_eq!(ambulance_catalog().len(), 4);
        let option = ambulance_by_id(2).unwrap();
        assert_eq!(option.kind, "ALS - with EMT");
        assert_eq!(option.service, "LifeCare EMS");
        assert!(ambulance_by_id(99).is_err());
    }
}
