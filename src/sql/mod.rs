//! Safe SQL fragments: identifiers from code-side tables only, values as parameters.

mod filter;
mod fragment;
pub mod params;
mod update;

pub use filter::*;
pub use fragment::*;
pub use params::*;
pub use update::*;
