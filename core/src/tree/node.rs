use std::path::PathBuf;

/// One image file belonging to a series
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Image {
    /// Path of the file the image was read from
    pub filename: PathBuf,

    /// Scanner sequence name (e.g. `*ep_b1000#1`)
    pub sequence_name: String,

    pub instance_number: Option<i32>,

    pub acquisition_number: Option<i32>,

    /// Number of slices packed into a mosaic frame (CSA `NumberOfImagesInMosaic`)
    pub images_in_mosaic: Option<i32>,

    /// Diffusion weighting (CSA `B_value`)
    pub b_value: Option<f32>,

    /// Diffusion gradient direction (CSA `DiffusionGradientDirection`)
    pub diffusion_direction: Option<[f32; 3]>,

    /// Slice normal (CSA `SliceNormalVector`)
    pub slice_normal: Option<[f32; 3]>,
}

/// An acquisition series: the unit the selector hands back
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Series {
    pub name: String,
    pub number: i32,
    pub modality: String,
    pub date: String,
    pub time: String,
    pub images: Vec<Image>,
}

impl Series {
    /// Creates an empty series
    pub fn new(name: impl Into<String>, number: i32, modality: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            modality: modality.into(),
            ..Default::default()
        }
    }

    /// Number of images in the series
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Sequence name of the first image, if there is one and it is not blank
    pub fn sequence_name(&self) -> Option<&str> {
        self.images
            .first()
            .map(|image| image.sequence_name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Orders images by acquisition number, then instance number
    ///
    /// Missing numbers sort first; the sort is stable so files without
    /// either number keep their discovery order.
    pub fn sort_images(&mut self) {
        self.images
            .sort_by_key(|image| (image.acquisition_number, image.instance_number));
    }
}

/// A study: an ordered list of series
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Study {
    pub name: String,
    pub id: String,
    pub date: String,
    pub time: String,
    pub series: Vec<Series>,
}

impl Study {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            date: date.into(),
            time: time.into(),
            series: Vec::new(),
        }
    }

    /// Number of series in the study
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A patient: an ordered list of studies
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Patient {
    pub name: String,
    pub id: String,
    /// Date of birth
    pub dob: String,
    pub studies: Vec<Study>,
}

impl Patient {
    pub fn new(name: impl Into<String>, id: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            dob: dob.into(),
            studies: Vec::new(),
        }
    }

    /// Number of studies for the patient
    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }
}

/// Patients in the order they were discovered
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Tree {
    pub patients: Vec<Patient>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of patients
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Total number of series across all patients and studies
    pub fn series_count(&self) -> usize {
        self.patients
            .iter()
            .flat_map(|patient| &patient.studies)
            .map(Study::len)
            .sum()
    }

    /// Sorts the images of every series
    pub fn sort_images(&mut self) {
        for patient in &mut self.patients {
            for study in &mut patient.studies {
                for series in &mut study.series {
                    series.sort_images();
                }
            }
        }
    }
}
