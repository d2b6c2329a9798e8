#![forbid(unsafe_code)]

//! Core model and plumbing for the Bio-Dashboard.
//!
//! This crate provides:
//! - Domain types (substances, intakes, sleep samples, score samples)
//! - Bateman pharmacokinetic curves and the substance rate table
//! - Circadian baseline and sleep modifier
//! - The Bio-Score composer and day-curve generator
//! - Persistence (intake log, sleep sample, CSV export)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod curve;
pub mod substances;
pub mod load;
pub mod circadian;
pub mod sleep;
pub mod engine;
pub mod timeline;
pub mod intake_log;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use substances::{default_library, SubstanceCurveLibrary};
pub use engine::BioEngine;
pub use timeline::DaySamples;
pub use intake_log::{list_intakes, read_intakes, IntakeLog, IntakeSink};
pub use sleep::{latest_sleep_sample, save_sleep_sample};
pub use export::write_day_curve_csv;
