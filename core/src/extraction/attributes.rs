use crate::csa::CsaFields;
use crate::tree::{Image, Patient, Series, Study};
use dicom_object::InMemDicomObject;
use log::debug;
use std::path::PathBuf;

use super::tags::{
    get_bytes_value, get_int_value, get_string_or_empty, get_string_value, ACQUISITION_NUMBER,
    CSA_IMAGE_HEADER_INFO, INSTANCE_NUMBER, MODALITY, PATIENT_BIRTH_DATE, PATIENT_ID,
    PATIENT_NAME, SEQUENCE_NAME, SERIES_DATE, SERIES_DESCRIPTION, SERIES_NUMBER, SERIES_TIME,
    STUDY_DATE, STUDY_DESCRIPTION, STUDY_ID, STUDY_TIME,
};

/// Extracts the patient attributes of a DICOM file (without studies)
pub fn extract_patient(dcm: &InMemDicomObject) -> Patient {
    Patient::new(
        get_string_or_empty(dcm, PATIENT_NAME),
        get_string_or_empty(dcm, PATIENT_ID),
        get_string_or_empty(dcm, PATIENT_BIRTH_DATE),
    )
}

/// Extracts the study attributes of a DICOM file (without series)
pub fn extract_study(dcm: &InMemDicomObject) -> Study {
    Study::new(
        get_string_or_empty(dcm, STUDY_DESCRIPTION),
        get_string_or_empty(dcm, STUDY_ID),
        get_string_or_empty(dcm, STUDY_DATE),
        get_string_or_empty(dcm, STUDY_TIME),
    )
}

/// Extracts the series attributes of a DICOM file (without images)
pub fn extract_series(dcm: &InMemDicomObject) -> Series {
    let mut series = Series::new(
        get_string_or_empty(dcm, SERIES_DESCRIPTION),
        get_int_value(dcm, SERIES_NUMBER).unwrap_or(0),
        get_string_or_empty(dcm, MODALITY),
    );
    series.date = get_string_or_empty(dcm, SERIES_DATE);
    series.time = get_string_or_empty(dcm, SERIES_TIME);
    series
}

/// Extracts the per-image attributes of a DICOM file
///
/// When `read_csa` is set and the file carries a CSA image header, the
/// mosaic and diffusion fields are filled from it.
pub fn extract_image(path: PathBuf, dcm: &InMemDicomObject, read_csa: bool) -> Image {
    let mut image = Image {
        filename: path,
        sequence_name: get_string_value(dcm, SEQUENCE_NAME).unwrap_or_default(),
        instance_number: get_int_value(dcm, INSTANCE_NUMBER),
        acquisition_number: get_int_value(dcm, ACQUISITION_NUMBER),
        ..Default::default()
    };

    if read_csa {
        if let Some(block) = get_bytes_value(dcm, CSA_IMAGE_HEADER_INFO) {
            let fields = CsaFields::from_block(&block);
            debug!(
                "{}: {} CSA image header fields",
                image.filename.display(),
                fields.len()
            );
            apply_csa_fields(&mut image, &fields);
        }
    }

    image
}

/// Copies the CSA fields the tree cares about onto an image
pub fn apply_csa_fields(image: &mut Image, fields: &CsaFields<'_>) {
    image.images_in_mosaic = fields
        .get_int("NumberOfImagesInMosaic")
        .filter(|&n| n > 0);
    image.b_value = fields.get_float("B_value");
    image.diffusion_direction = csa_vector(fields, "DiffusionGradientDirection");
    image.slice_normal = csa_vector(fields, "SliceNormalVector");
}

/// Reads a 3-vector; absent or incomplete vectors yield `None`
fn csa_vector(fields: &CsaFields<'_>, name: &str) -> Option<[f32; 3]> {
    let mut v = [f32::NAN; 3];
    if !fields.get_floats(name, &mut v) || v.iter().any(|x| x.is_nan()) {
        return None;
    }
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csa::testing::BlockBuilder;
    use dicom_core::{DataElement, PrimitiveValue, VR};

    fn dicom_with_csa(block: Vec<u8>) -> InMemDicomObject {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            SEQUENCE_NAME,
            VR::SH,
            PrimitiveValue::from("*ep_b1000#1"),
        ));
        dcm.put(DataElement::new(
            INSTANCE_NUMBER,
            VR::IS,
            PrimitiveValue::from("12"),
        ));
        dcm.put(DataElement::new(
            CSA_IMAGE_HEADER_INFO,
            VR::OB,
            PrimitiveValue::U8(block.into()),
        ));
        dcm
    }

    #[test]
    fn test_extract_image_with_csa() {
        let block = BlockBuilder::new()
            .record("NumberOfImagesInMosaic", "US", &["48\0"])
            .record("B_value", "IS", &["1000"])
            .record("DiffusionGradientDirection", "FD", &["0.0", "0.6", "0.8"])
            .record("SliceNormalVector", "FD", &["0", "", "1"])
            .build();
        let dcm = dicom_with_csa(block);

        let image = extract_image(PathBuf::from("im1.dcm"), &dcm, true);
        assert_eq!(image.sequence_name, "*ep_b1000#1");
        assert_eq!(image.instance_number, Some(12));
        assert_eq!(image.acquisition_number, None);
        assert_eq!(image.images_in_mosaic, Some(48));
        assert_eq!(image.b_value, Some(1000.0));
        assert_eq!(image.diffusion_direction, Some([0.0, 0.6, 0.8]));
        // Middle component is empty
        assert_eq!(image.slice_normal, None);
    }

    #[test]
    fn test_extract_image_skips_csa_when_disabled() {
        let block = BlockBuilder::new()
            .record("B_value", "IS", &["1000"])
            .build();
        let dcm = dicom_with_csa(block);

        let image = extract_image(PathBuf::from("im1.dcm"), &dcm, false);
        assert_eq!(image.b_value, None);
        assert_eq!(image.sequence_name, "*ep_b1000#1");
    }

    #[test]
    fn test_extract_series_defaults() {
        let dcm = InMemDicomObject::new_empty();
        let series = extract_series(&dcm);
        assert_eq!(series, Series::new("", 0, ""));
    }

    #[test]
    fn test_extract_patient_and_study() {
        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            PATIENT_NAME,
            VR::PN,
            PrimitiveValue::from("Doe^Jane"),
        ));
        dcm.put(DataElement::new(
            PATIENT_ID,
            VR::LO,
            PrimitiveValue::from("P001"),
        ));
        dcm.put(DataElement::new(
            STUDY_DATE,
            VR::DA,
            PrimitiveValue::from("20140312"),
        ));

        let patient = extract_patient(&dcm);
        assert_eq!(patient.name, "Doe^Jane");
        assert_eq!(patient.id, "P001");
        assert_eq!(patient.dob, "");

        let study = extract_study(&dcm);
        assert_eq!(study.date, "20140312");
        assert!(study.series.is_empty());
    }
}
