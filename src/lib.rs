#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod dispatch;
pub mod eta_projector;
pub mod handoff_store;
pub mod hospital_search;
pub mod journey_controller;
pub mod logs;
pub mod route;
pub mod route_fetcher;
pub mod step_animator;
pub mod tracking_session;
