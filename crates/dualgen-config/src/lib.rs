//! Configuration model for dualgen.
//!
//! A configuration document is read by two independent readers (the manifest
//! parser behind Generator A and the pattern extractor inside Generator B).
//! Both hand their raw findings to the same total mapping, [`resolve`], through
//! the [`FieldSource`] trait. `resolve` applies the single default table in
//! [`defaults`], so an absent optional section can never make the two sides
//! drift apart.
//!
//! # Key Types
//!
//! - [`Configuration`] — fully specified, immutable configuration
//! - [`FieldSource`] / [`RawValue`] — what a reader exposes to [`resolve`]
//! - [`FrequencyBand`] — the band names the thresholds separate

pub mod band;
pub mod defaults;
pub mod model;
pub mod source;
pub mod validation;

pub use band::FrequencyBand;
pub use model::{
    ApprovalPolicy, CiPolicy, ComponentWeights, Configuration, EvidencePolicy, MetricSpec,
    NotificationPolicy, ProjectInfo, Thresholds, ValidationPolicy,
};
pub use source::{resolve, FieldSource, RawValue, Resolution};
pub use validation::validate;
