pub mod etl;
pub mod pipeline;

pub use crate::domain::model::{Extraction, Harvest};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
