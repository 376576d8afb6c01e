/// Configuration for building a DICOM tree from a directory
///
/// # Example
///
/// ```
/// use csaselect_core::ScanConfig;
///
/// let config = ScanConfig::default().recursive(true).read_csa(false);
///
/// assert!(config.recursive);
/// assert!(!config.read_csa);
/// assert!(config.sort_images);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanConfig {
    /// Descend into sub-directories
    pub recursive: bool,

    /// Decode the Siemens CSA image header of each file
    pub read_csa: bool,

    /// Order images within each series by acquisition and instance number
    pub sort_images: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            read_csa: true,
            sort_images: true,
        }
    }
}

impl ScanConfig {
    /// Builder: Descend into sub-directories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Builder: Decode CSA image headers
    pub fn read_csa(mut self, read_csa: bool) -> Self {
        self.read_csa = read_csa;
        self
    }

    /// Builder: Sort images within each series
    pub fn sort_images(mut self, sort_images: bool) -> Self {
        self.sort_images = sort_images;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(!config.recursive);
        assert!(config.read_csa);
        assert!(config.sort_images);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ScanConfig::default()
            .recursive(true)
            .read_csa(false)
            .sort_images(false);

        assert_eq!(
            config,
            ScanConfig {
                recursive: true,
                read_csa: false,
                sort_images: false,
            }
        );
    }
}
