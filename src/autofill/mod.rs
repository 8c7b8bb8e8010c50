// Form autofill: derive field labels, map them to profile values, write them.
pub mod filler;
pub mod mapper;

pub use filler::Autofiller;
