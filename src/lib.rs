//! Core library for the GlobalPath scholarship advisor service.
//!
//! The interesting logic lives in [`matching`] (multi-criteria eligibility
//! scoring with rejection analytics) and [`applications`] (the application
//! tracking state machine). Both sit on top of [`store`], which owns the
//! CSV-backed record collections.

pub mod agents;
pub mod applications;
pub mod config;
pub mod error;
pub mod matching;
pub mod prep;
pub mod recommendations;
pub mod routes;
pub mod store;
pub mod telemetry;
