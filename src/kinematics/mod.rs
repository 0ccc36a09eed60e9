pub mod states;
pub mod frame;
pub mod alignment;
pub mod healpix;
pub mod orientation;
pub mod diagnostics;
pub mod radii;
