//! # Engine Module
//!
//! Turns a trajectory into per-frame contact records.
//!
//! ## Overview
//!
//! The engine never touches file formats. It reads structures exclusively through the
//! [`provider::StructureProvider`] capability trait, so any in-memory or external source of
//! coordinates can be analysed. A validated [`config::DetectionConfig`] selects which
//! detectors run, over which frames, with which geometric cutoffs and selection scope.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Detector set, frame range, cutoffs and selections
//! - **Structure Access** ([`provider`]) - Candidate atoms, positions and distances per frame
//! - **Selection Scope** ([`scope`]) - Which atom pairs a frame may report
//! - **Detectors** ([`detectors`]) - One geometric rule set per interaction family
//! - **Scheduling** ([`scheduler`]) - Task-per-frame execution on a dedicated thread pool
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Geometry, provider and engine error types

pub mod config;
pub mod detectors;
pub mod error;
pub mod progress;
pub mod provider;
pub mod scheduler;
pub mod scope;
