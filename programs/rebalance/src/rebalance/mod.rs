pub mod bisect;
pub mod oracle;
pub mod ratio;
pub mod registry;
pub mod solver;

pub use bisect::*;
pub use oracle::*;
pub use ratio::*;
pub use registry::*;
pub use solver::*;

#[cfg(test)]
pub(crate) mod testing;
