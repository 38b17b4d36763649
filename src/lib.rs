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
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
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
// Allowances (same set as `[workspace.lints.clippy]` in Cargo.toml)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::float_cmp)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::default_trait_access)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::use_self)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::too_many_lines)]

//! Interactive world-environment core for an animated eye rig.
//!
//! Several subsystems mutate one scene and one post-processing pipeline.
//! This crate fixes who owns what:
//!
//! - [`animation`] crossfades weighted actions between a looping permanent
//!   state and a play-once pose state.
//! - [`bloom`] classifies meshes into categories and is the only writer of
//!   their emissive, metalness and roughness, driven by security states.
//! - [`exposure`] holds the renderer's single exposure value. [`environment`]
//!   themes, [`lighting`] presets and the bloom center all write through the
//!   same authority; the bloom pass and the renderer read it every frame.
//! - [`eye`] spins the eye rings through node transforms only.
//! - [`reveal`] hides the magic rings inside a trigger zone through node
//!   visibility only.
//!
//! # Key entry points
//!
//! - [`engine::WorldEngine`] - owns the scene and runs update-then-render
//! - [`engine::WorldCommand`] - every interactive operation
//! - [`options::Options`] - TOML-backed runtime configuration
//! - [`renderer::FrameRenderer`] - the render-one-frame seam
//!
//! All time-based behaviour advances by an explicit `dt`, so a session can
//! be replayed deterministically with fixed steps.

pub mod animation;
pub mod bloom;
pub mod engine;
pub mod environment;
pub mod error;
pub mod exposure;
pub mod eye;
#[cfg(feature = "viewer")]
pub mod gpu;
pub mod lighting;
pub mod options;
pub mod renderer;
pub mod reveal;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
