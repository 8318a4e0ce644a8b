//! The diagnostics & quick-fix catalog.
//!
//! One analysis pass in, one immutable catalog of problems and remediation
//! actions out: stable-within-a-generation ids, lookup and filtering,
//! cross-generation identity resolution, and transactional fix execution.
//!
//! The flow: [`CatalogBuilder::collect_from`] runs a fresh pass against a
//! source unit and materializes [`Problems`]. Consumers query the catalog
//! by id or predicate, then hand a chosen [`QuickFixDescriptor`] to
//! [`FixExecutor`]. Executing a mutating fix turns the catalog stale;
//! descriptors held from a stale catalog are re-resolved against a rebuilt
//! one with [`Problems::locate_equivalent`].

mod builder;
mod catalog;
mod error;
mod executor;
mod problem;
mod quickfix;

pub use builder::{BuilderConfig, CatalogBuilder};
pub use catalog::{CatalogState, Problems};
pub use error::CatalogError;
pub use executor::{FixEvent, FixExecutor, FixObserver};
pub use problem::Problem;
pub use quickfix::QuickFixDescriptor;
