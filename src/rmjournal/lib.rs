//! # rmjournal Architecture
//!
//! rmjournal keeps a reMarkable bullet journal stocked with recurring daily
//! items. Each run downloads the notebook, backs it up, writes the items that
//! apply to each dated page beneath the page's existing content and publishes
//! the result under a fresh document id. Handwriting, thumbnails and links are
//! carried through untouched.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (cli/, wired by main.rs)                               │
//! │  - Parses arguments, prints results, owns the exit code     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Thin facade, normalizes date arguments                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - update, items, pages; return CmdResult                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core                                                       │
//! │  model, schedule      dates, spans, page mapping            │
//! │  overlay, merge       per-page underlay drawing (lopdf)     │
//! │  container            .rmdoc archive codec (zip)            │
//! │  backup               collision-free backup names           │
//! │  remote               RemoteStore: rmapi / in-memory        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Update pipeline
//!
//! `commands::update::run` strings the core together:
//!
//! 1. pick a backup name from the remote listing
//! 2. fetch and [`container::decode`] the notebook
//! 3. re-encode the untouched container and publish it as the backup
//! 4. [`schedule::resolve_all`] items per page, [`merge::render_overlays`]
//!    and [`merge::merge_document`] them into the visual base
//! 5. [`container::encode`] under a new id and publish
//!
//! Scratch files live in a [`workdir::WorkDir`] that is removed when the run
//! ends, whether it succeeded or not.
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward nothing prints, exits or reads the clock. Progress
//! comes back as `CmdMessage`s and diagnostics go through `log`.

pub mod api;
pub mod backup;
pub mod commands;
pub mod config;
pub mod container;
pub mod error;
pub mod logging;
pub mod merge;
pub mod model;
pub mod overlay;
pub mod remote;
pub mod schedule;
pub mod workdir;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
