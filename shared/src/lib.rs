//! Browser-independent core of the wild pig population viewer.
//!
//! Everything here is plain Rust so the playback logic can be exercised by
//! `cargo test` without a browser. The frontend wires these pieces to zoon
//! signals, the address bar and a timer.

mod config;
mod dataset;
mod error;
mod playback;
mod query;

// ===== DATA TYPES =====

pub use dataset::{
    Advance, Dataset, PopulationRecord, YearOrder, YearSequence, load_years, records_for_year,
};

// ===== PLAYBACK =====

pub use playback::{
    Effect, PlaybackContext, PlaybackEvent, PlaybackMachine, PlaybackState, Transition,
    ViewSnapshot, year_position_percent,
};

// ===== ADDRESS BAR =====

pub use query::{MemoryQueryStore, QuerySnapshot, QueryStore};

// ===== CONFIG TYPES =====

pub use config::PlaybackConfig;

// ===== ERRORS =====

pub use error::{ConfigError, DatasetError};
