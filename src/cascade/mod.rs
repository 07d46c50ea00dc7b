//! Boosted Haar cascades: serialized form, compiled form and evaluation.
//!
//! Modules
//! - [`descriptor`] - the portable cascade model (stages → trees → weighted
//!   rectangles), its flat-array/binary/JSON encodings, validation and
//!   horizontal mirroring.
//! - [`compiled`] - the model specialised to one integral-image stride, with
//!   every feature baked into linear offsets.
//! - [`evaluator`] - the sliding-window scan with early rejection.
//!
//! A descriptor is immutable once loaded and can be shared between detectors;
//! a compiled cascade belongs to one scale of one detector.

pub mod compiled;
pub mod descriptor;
pub mod evaluator;

pub use compiled::{CompiledCascade, CompiledFeature, CompiledStage, CompiledTree};
pub use descriptor::{CascadeDescriptor, CascadeStage, CascadeTree, FeatureRect};
pub use evaluator::{
    evaluate_window, scan, scan_with_stats, EdgeBand, ScanInput, ScanStats, WindowOutcome,
};
