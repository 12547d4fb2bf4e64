// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Closed-loop alignment control for flexible docking mechanisms.
//!
//! A flexible docking tube fakes mechanical compliance with four pre-baked
//! pose channels (two translation axes, two rotation axes). Flexdock steers
//! those channels so the tube tip follows a target connector on another
//! vessel, then holds the pose rigidly once the ports are mated.
//!
//! # Key entry points
//!
//! - [`mechanism::FlexMechanism`] - the per-instance state machine, driven by
//!   [`update`](mechanism::FlexMechanism::update) and
//!   [`late_update`](mechanism::FlexMechanism::late_update) every tick
//! - [`host`] - the capability traits a host simulation implements
//! - [`solver`] - port geometry to target frames
//! - [`frames`] - frame index space, playback mapping, rate-limited tracking
//! - [`options::Options`] - mechanism limits, magnet values, tracking rates
//!
//! # Architecture
//!
//! Everything runs on the host's simulation thread. Each tick the mechanism
//! reconciles magnet parameters with its counterpart, then dispatches one
//! control law (hold rest, hold mated pose, or solve and track) and emits
//! channel positions to the host's [`host::AnimationPlayer`]. The [`sim`]
//! module provides a standalone host used by tests and the demo binary.

pub mod error;
pub mod frames;
pub mod geometry;
pub mod host;
pub mod mechanism;
pub mod options;
pub mod sim;
pub mod solver;
