use super::entry::{CsaEntry, CsaItem, CsaParser};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

fn int_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\s*([-+]?\d+)").expect("Failed to compile regex"))
}

fn float_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)")
            .expect("Failed to compile regex")
    })
}

/// Parses the integer literal at the start of an item payload
fn parse_int(item: &CsaItem<'_>) -> Option<i32> {
    let text = String::from_utf8_lossy(item.payload());
    int_regex()
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Parses the floating-point literal at the start of an item payload
fn parse_float(item: &CsaItem<'_>) -> Option<f32> {
    let text = String::from_utf8_lossy(item.payload());
    float_regex()
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok())
}

impl<'a> CsaEntry<'a> {
    /// Returns the first item with a non-zero declared length
    pub fn first_value_item(&self) -> Option<&CsaItem<'a>> {
        self.items.iter().find(|item| !item.is_empty())
    }

    /// Integer value of the first non-empty item
    ///
    /// Returns `None` if every item is empty or the payload does not
    /// start with an integer literal.
    pub fn int_value(&self) -> Option<i32> {
        self.first_value_item().and_then(parse_int)
    }

    /// Floating-point value of the first non-empty item
    pub fn float_value(&self) -> Option<f32> {
        self.first_value_item().and_then(parse_float)
    }

    /// Integer value, or 0 when absent
    pub fn get_int(&self) -> i32 {
        self.int_value().unwrap_or(0)
    }

    /// Floating-point value, or NaN when absent
    pub fn get_float(&self) -> f32 {
        self.float_value().unwrap_or(f32::NAN)
    }

    /// Converts every non-empty item into the slot with the same index
    ///
    /// Slots of empty or unparsable items are left untouched, so the
    /// caller decides what an absent component looks like. Items beyond
    /// the end of `values` are ignored.
    pub fn get_floats(&self, values: &mut [f32]) {
        for (slot, item) in values.iter_mut().zip(&self.items) {
            if item.is_empty() {
                continue;
            }
            if let Some(v) = parse_float(item) {
                *slot = v;
            }
        }
    }

    /// Space-separated item payloads, trailing NUL bytes removed
    pub fn to_string_value(&self) -> String {
        self.items
            .iter()
            .map(|item| String::from_utf8_lossy(item.trimmed()).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CsaEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[CSA] {}:", self.name)?;
        for item in &self.items {
            write!(f, " {}", String::from_utf8_lossy(item.trimmed()))?;
        }
        Ok(())
    }
}

/// All records of a CSA block, addressable by name
///
/// Records keep their decode order; when a name repeats, lookups return
/// the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct CsaFields<'a> {
    entries: Vec<CsaEntry<'a>>,
    index: HashMap<String, usize>,
}

impl<'a> CsaFields<'a> {
    /// Decodes every record of `block`
    pub fn from_block(block: &'a [u8]) -> Self {
        CsaParser::new(block).collect()
    }

    /// Looks up a record by name
    pub fn get(&self, name: &str) -> Option<&CsaEntry<'a>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Integer value of the named record, if present and numeric
    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(CsaEntry::int_value)
    }

    /// Floating-point value of the named record, if present and numeric
    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(CsaEntry::float_value)
    }

    /// Fills `values` from the named record; returns `false` if it is absent
    pub fn get_floats(&self, name: &str, values: &mut [f32]) -> bool {
        match self.get(name) {
            Some(entry) => {
                entry.get_floats(values);
                true
            }
            None => false,
        }
    }

    /// Records in decode order
    pub fn iter(&self) -> impl Iterator<Item = &CsaEntry<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<CsaEntry<'a>> for CsaFields<'a> {
    fn from_iter<I: IntoIterator<Item = CsaEntry<'a>>>(iter: I) -> Self {
        let mut fields = CsaFields::default();
        for entry in iter {
            fields
                .index
                .entry(entry.name.clone())
                .or_insert(fields.entries.len());
            fields.entries.push(entry);
        }
        fields
    }
}
