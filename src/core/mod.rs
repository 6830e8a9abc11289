pub mod cleaning;
pub mod csv_io;
pub mod etl;
pub mod pipeline;
pub mod spreadsheet;
pub mod stats;
pub mod transform;

pub use crate::domain::model::{Dataset, ProcessingReport, TransformResult};
pub use crate::domain::options::ProcessingOptions;
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
