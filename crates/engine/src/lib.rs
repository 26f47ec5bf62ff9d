//! `fleetrecon-engine` — the fleet report pipeline.
//!
//! Pure engine crate: receives pre-loaded tables, returns the reconciled,
//! annotated report. No CLI or IO dependencies; the network and file
//! collaborators live in `fleetrecon-cli` and `fleetrecon-io`.

pub mod annotate;
pub mod config;
pub mod error;
pub mod recency;
pub mod reconcile;

pub use annotate::{annotate, AnnotateOptions, LabelColorSource, LookupError, StyledTable};
pub use config::JobConfig;
pub use error::PipelineError;
pub use recency::{months_between, RecencyBucket, Rgb};
pub use reconcile::{reconcile, ReconcilePlan};
