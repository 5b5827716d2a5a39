pub mod training;
pub mod writer;

pub use training::{load_training_file, LabelIndex};
pub use writer::FeatureCsvWriter;
