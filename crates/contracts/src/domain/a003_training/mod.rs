pub mod aggregate;

pub use aggregate::{Training, TrainingDetail, TrainingDto, TrainingId};
