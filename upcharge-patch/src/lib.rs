//! Upcharge Patch - catering combo upcharge reconciliation
//!
//! Collects catering products from every selected establishment in parallel,
//! finds the ones whose fixed `combo_upcharge` has drifted away from the live
//! `price`, and patches the upcharge back in line one product at a time.
//!
//! # Module layout
//!
//! ```text
//! upcharge-patch/src/
//! ├── core/          # configuration and run-level errors
//! ├── pipeline/      # processor, collector, condition, reconciler, progress
//! ├── utils/         # logging
//! ├── directory.rs   # establishment name/id mapping
//! └── report.rs      # CSV artifacts
//! ```

pub mod core;
pub mod directory;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use crate::core::{AppError, AppResult, Config};
pub use directory::EstablishmentDirectory;
pub use pipeline::{
    CategoryPlan, Collection, EstablishmentProcessor, PatchError, PatchReconciler, Pipeline,
    PipelineSettings, Progress, ProgressEvent, ReconcileReport, RunSummary, build_payload,
    collect, filter_needing_patch, needs_patch,
};
pub use report::ArtifactWriter;
