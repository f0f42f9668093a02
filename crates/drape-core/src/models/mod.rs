//! Data models for the application
//!
//! Each sub-module represents one entity of the garment upload flow.

mod file_record;
mod garment;
mod owner;
mod upload;

pub use file_record::*;
pub use garment::*;
pub use owner::*;
pub use upload::*;
