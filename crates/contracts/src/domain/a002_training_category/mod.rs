pub mod aggregate;

pub use aggregate::{
    TrainingMainCategory, TrainingMainCategoryDto, TrainingMainCategoryId, TrainingSubCategory,
    TrainingSubCategoryDto, TrainingSubCategoryId,
};
