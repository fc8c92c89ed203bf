pub mod baseline;
pub mod config;
pub mod convolve;
pub mod detectors;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod section;
pub mod signal;

pub use detectors::*;
pub use metrics::*;
pub use pipeline::*;
pub use section::*;
pub use signal::*;
