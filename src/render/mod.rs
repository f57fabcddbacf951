//! Rendering backends.
//!
//! Two independent renderers consume the aggregated series map: a
//! plotters-based line chart (SVG/PNG) and a TikZ/pgfplots document
//! generator.

pub mod chart;
pub mod tikz;
