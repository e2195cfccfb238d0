#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// #![warn(clippy::cargo)]

pub mod circuit;
pub mod distributions;
pub mod error;
pub mod lab;
pub mod margin;
pub(crate) mod math;
pub mod propagation;
pub mod regression;

pub use error::Error;
pub use margin::{Measurement, Measurements};

pub type Result<T> = ::std::result::Result<T, Box<dyn ::std::error::Error>>;
