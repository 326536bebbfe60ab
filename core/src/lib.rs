pub mod error;
pub mod event;
pub mod geometry;
pub mod image;
pub mod options;

pub use error::{BpbField, FatmendError};
pub use event::{EventSink, NullSink, RepairEvent};
pub use geometry::Geometry;
pub use image::ByteImage;
pub use options::AnalyzerOptions;
