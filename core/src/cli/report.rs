use crate::tree::Series;
use crate::types::{format_date, format_time};
use std::fmt;

/// Text report for the series picked by the selector
pub struct TextReport<'a> {
    series: &'a [&'a Series],
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(series: &'a [&'a Series]) -> Self {
        Self { series }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Selected Series")?;
        writeln!(f, "===============")?;
        writeln!(f)?;

        if self.series.is_empty() {
            writeln!(f, "Nothing selected")?;
            return Ok(());
        }

        for series in self.series {
            writeln!(
                f,
                "[{}] {} ({})",
                series.number,
                if series.name.is_empty() {
                    "unnamed"
                } else {
                    series.name.as_str()
                },
                series.modality
            )?;
            writeln!(
                f,
                "  Date/Time:  {} {}",
                format_date(&series.date),
                format_time(&series.time)
            )?;
            writeln!(f, "  Images:     {}", series.len())?;
            writeln!(
                f,
                "  Sequence:   {}",
                series.sequence_name().unwrap_or("?")
            )?;

            if let Some(mosaic) = series.images.first().and_then(|i| i.images_in_mosaic) {
                writeln!(f, "  Mosaic:     {} slices per frame", mosaic)?;
            }

            let mut b_values: Vec<f32> = Vec::new();
            for b in series.images.iter().filter_map(|i| i.b_value) {
                if !b_values.contains(&b) {
                    b_values.push(b);
                }
            }
            if !b_values.is_empty() {
                let listed: Vec<_> = b_values.iter().map(|b| b.to_string()).collect();
                writeln!(f, "  B-values:   {}", listed.join(", "))?;
            }

            if let Some(image) = series.images.first() {
                writeln!(f, "  First file: {}", image.filename.display())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
