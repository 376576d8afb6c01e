use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::InMemDicomObject;
use std::borrow::Cow;

// Patient Tags
pub const PATIENT_NAME: Tag = tags::PATIENT_NAME;
pub const PATIENT_ID: Tag = tags::PATIENT_ID;
pub const PATIENT_BIRTH_DATE: Tag = tags::PATIENT_BIRTH_DATE;

// Study Tags
pub const STUDY_DESCRIPTION: Tag = tags::STUDY_DESCRIPTION;
pub const STUDY_ID: Tag = tags::STUDY_ID;
pub const STUDY_DATE: Tag = tags::STUDY_DATE;
pub const STUDY_TIME: Tag = tags::STUDY_TIME;

// Series Tags
pub const SERIES_DESCRIPTION: Tag = tags::SERIES_DESCRIPTION;
pub const SERIES_NUMBER: Tag = tags::SERIES_NUMBER;
pub const MODALITY: Tag = tags::MODALITY;
pub const SERIES_DATE: Tag = tags::SERIES_DATE;
pub const SERIES_TIME: Tag = tags::SERIES_TIME;

// Image Tags
pub const SEQUENCE_NAME: Tag = tags::SEQUENCE_NAME;
pub const INSTANCE_NUMBER: Tag = tags::INSTANCE_NUMBER;
pub const ACQUISITION_NUMBER: Tag = tags::ACQUISITION_NUMBER;

// Siemens private tags (creator "SIEMENS CSA HEADER")
pub const CSA_IMAGE_HEADER_INFO: Tag = Tag(0x0029, 0x1010);
pub const CSA_SERIES_HEADER_INFO: Tag = Tag(0x0029, 0x1020);

/// Helper to get string value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to string
pub fn get_string_value(dcm: &InMemDicomObject, tag: Tag) -> Option<String> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_str().ok())
        .map(|s| s.trim_end_matches('\0').trim().to_string())
}

/// Helper to get string value, or an empty string when absent
pub fn get_string_or_empty(dcm: &InMemDicomObject, tag: Tag) -> String {
    get_string_value(dcm, tag).unwrap_or_default()
}

/// Helper to get integer value from DICOM tag
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get the raw bytes of a DICOM element
///
/// Returns `None` if the tag is not present or holds no byte-convertible value
pub fn get_bytes_value(dcm: &InMemDicomObject, tag: Tag) -> Option<Cow<'_, [u8]>> {
    dcm.element(tag).ok().and_then(|elem| elem.to_bytes().ok())
}
