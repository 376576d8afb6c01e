//! Patient → study → series → image hierarchy
//!
//! Children are kept in discovery order. The tree is built once and then
//! only read, typically by [`crate::selection::Selector`].

mod builder;
mod node;

pub use builder::{collect_dicom_files, is_dicom_file};
pub use node::{Image, Patient, Series, Study, Tree};
