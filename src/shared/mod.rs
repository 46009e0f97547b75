pub mod config;
pub mod error;
pub mod process;
pub mod traits;

pub use error::*;
pub use traits::*;
