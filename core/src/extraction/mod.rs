pub mod attributes;
pub mod tags;

pub use attributes::{
    apply_csa_fields, extract_image, extract_patient, extract_series, extract_study,
};
pub use tags::*;
