use thiserror::Error;

/// Result type for csaselect operations
pub type Result<T> = std::result::Result<T, CsaSelectError>;

/// Error types for csaselect operations
#[derive(Error, Debug)]
pub enum CsaSelectError {
    /// The tree handed to the selector holds no patients
    #[error("DICOM tree is empty")]
    EmptyTree,

    /// A patient without studies or a study without series
    #[error("{0} has no children to select from")]
    EmptyLevel(String),

    /// Malformed index list typed at the series prompt
    #[error("Invalid number sequence: {0}")]
    InvalidSequence(String),

    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// Invalid tag value
    #[error("Invalid tag value: {0}")]
    InvalidValue(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for CsaSelectError {
    fn from(e: dicom_object::ReadError) -> Self {
        CsaSelectError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for CsaSelectError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        CsaSelectError::InvalidValue(format!("{}", e))
    }
}
