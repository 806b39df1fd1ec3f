//! Part naming: categories, layer labels and file numbering.

mod category;
mod label;
mod numbering;

pub use category::Category;
pub use label::{PartLabel, numbered_file_name};
pub use numbering::Numbering;
