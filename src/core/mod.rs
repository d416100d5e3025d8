pub mod etl;
pub mod loader;
pub mod pipeline;
pub mod projection;
pub mod transform;

pub use crate::domain::model::{RunRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
