//! Min-max decimation of dense, x-ordered line data.
//!
//! [`min_max`] reduces a sorted point sequence to at most four points per
//! pixel column. [`Decimation`] runs it once per update cycle over a chart's
//! [`Dataset`]s, which serve the decimated points through a
//! [`DecimatedView`] while writes keep landing on the full resolution data.

mod algorithm;
mod codec;
mod dataset;
mod error;
mod minmax;
mod plugin;
mod point;

pub use algorithm::*;
pub use codec::*;
pub use dataset::*;
pub use error::*;
pub use minmax::*;
pub use plugin::*;
pub use point::*;
