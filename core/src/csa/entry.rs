use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};
use std::io::{self, Write};

/// Magic tag opening an SV10 CSA block
pub const CSA_MAGIC: &[u8; 4] = b"SV10";

const COUNT_OFFSET: usize = 8;
const FIRST_RECORD_OFFSET: usize = 16;
const NAME_LEN: usize = 64;

/// Size of a record header: name(64) + vm(4) + vr(4) + syngodt(4) + item count(4) + unused(4)
pub const RECORD_HEADER_LEN: usize = 84;

/// Bytes that must follow a record header before it is considered in bounds
const RECORD_LOOKAHEAD: usize = 4;

/// Size of an item header; the declared length sits in its first 4 bytes
pub const ITEM_HEADER_LEN: usize = 16;

/// One length-prefixed item of a CSA record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsaItem<'a> {
    /// Declared payload length
    pub length: u32,

    /// Payload including its 4-byte alignment padding
    pub data: &'a [u8],
}

impl<'a> CsaItem<'a> {
    /// Returns the declared-length payload, NUL bytes included
    pub fn payload(&self) -> &'a [u8] {
        let len = (self.length as usize).min(self.data.len());
        &self.data[..len]
    }

    /// Returns the payload with trailing NUL bytes removed
    pub fn trimmed(&self) -> &'a [u8] {
        let payload = self.payload();
        let end = payload
            .iter()
            .rposition(|&b| b != 0)
            .map(|pos| pos + 1)
            .unwrap_or(0);
        &payload[..end]
    }

    /// Whether the item declares no payload at all
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// One decoded CSA record
///
/// Item payloads borrow from the block the record was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct CsaEntry<'a> {
    /// Field name, up to the first NUL of the 64-byte name field
    pub name: String,

    /// Value representation tag (opaque)
    pub vr: String,

    /// Value multiplicity, decoded but not interpreted
    pub vm: u32,

    /// Siemens data type discriminator, decoded but not interpreted
    pub syngodt: u32,

    /// Declared number of items
    pub item_count: u32,

    /// Items in declaration order
    pub items: Vec<CsaItem<'a>>,
}

impl<'a> CsaEntry<'a> {
    /// Returns the record name
    pub fn key(&self) -> &str {
        &self.name
    }
}

/// Cursor over a CSA block yielding one [`CsaEntry`] per call to [`CsaParser::parse`]
///
/// Every read is a checked sub-slice of the block. Running out of data
/// ends the sequence instead of failing: headers routinely declare more
/// records than are physically present.
///
/// # Example
///
/// ```
/// use csaselect_core::csa::CsaParser;
///
/// // SV10 header declaring zero records
/// let block = b"SV10\x04\x03\x02\x01\x00\x00\x00\x00\x4d\x00\x00\x00";
/// let mut parser = CsaParser::new(block);
/// assert!(parser.parse().is_none());
/// ```
pub struct CsaParser<'a, W = io::Sink> {
    data: &'a [u8],
    next: usize,
    num: u32,
    cnum: u32,
    finished: bool,
    echo: Option<W>,
}

impl<'a> CsaParser<'a, io::Sink> {
    /// Creates a parser without echo output
    pub fn new(data: &'a [u8]) -> Self {
        Self::build(data, None)
    }
}

impl<'a, W: Write> CsaParser<'a, W> {
    /// Creates a parser that writes every decoded record to `echo`
    ///
    /// Each item is written with its declared length, trailing NUL bytes
    /// included.
    pub fn with_echo(data: &'a [u8], echo: W) -> Self {
        Self::build(data, Some(echo))
    }

    fn build(data: &'a [u8], echo: Option<W>) -> Self {
        if data.get(..CSA_MAGIC.len()) != Some(CSA_MAGIC.as_slice()) {
            debug!("CSA data is not in SV10 format");
        }

        let num = match data.get(COUNT_OFFSET..COUNT_OFFSET + 4) {
            Some(bytes) => LittleEndian::read_u32(bytes),
            None => {
                warn!("CSA block too short to hold a record count ({} bytes)", data.len());
                0
            }
        };

        Self {
            data,
            next: FIRST_RECORD_OFFSET,
            num,
            cnum: 0,
            finished: false,
            echo,
        }
    }

    /// Number of records the block header declares
    pub fn declared_count(&self) -> u32 {
        self.num
    }

    /// Number of records decoded so far
    pub fn parsed_count(&self) -> u32 {
        self.cnum
    }

    /// Consumes the parser, handing back the echo sink
    pub fn into_echo(self) -> Option<W> {
        self.echo
    }

    /// Decodes the next record
    ///
    /// Returns `None` once the declared record count is reached or when
    /// the next record (or one of its items) would cross the end of the
    /// block. No partial record is ever returned.
    pub fn parse(&mut self) -> Option<CsaEntry<'a>> {
        if self.finished || self.cnum >= self.num {
            return None;
        }

        let start = self.next;
        let in_bounds = start
            .checked_add(RECORD_HEADER_LEN + RECORD_LOOKAHEAD)
            .map_or(false, |end| end <= self.data.len());
        if !in_bounds {
            return self.truncated(start, "record header");
        }
        let header = &self.data[start..start + RECORD_HEADER_LEN];

        let name = read_cstr(&header[..NAME_LEN]);
        let vm = LittleEndian::read_u32(&header[64..68]);
        let vr = read_cstr(&header[68..72]);
        let syngodt = LittleEndian::read_u32(&header[72..76]);
        let item_count = LittleEndian::read_u32(&header[76..80]);

        let mut next = start + RECORD_HEADER_LEN;
        let room = (self.data.len() - next) / ITEM_HEADER_LEN;
        let mut items = Vec::with_capacity((item_count as usize).min(room));

        for _ in 0..item_count {
            let length = match self.data.get(next..next + 4) {
                Some(bytes) => LittleEndian::read_u32(bytes),
                None => return self.truncated(next, "item header"),
            };
            let item_end = item_footprint(length)
                .and_then(|footprint| next.checked_add(footprint))
                .filter(|&end| end <= self.data.len());
            let item_end = match item_end {
                Some(end) => end,
                None => return self.truncated(next, "item payload"),
            };

            items.push(CsaItem {
                length,
                data: &self.data[next + ITEM_HEADER_LEN..item_end],
            });
            next = item_end;
        }

        self.next = next;
        self.cnum += 1;

        let entry = CsaEntry {
            name,
            vr,
            vm,
            syngodt,
            item_count,
            items,
        };

        if let Some(echo) = self.echo.as_mut() {
            if let Err(e) = write_echo(echo, &entry) {
                warn!("Failed to echo CSA entry {}: {}", entry.name, e);
            }
        }

        Some(entry)
    }

    fn truncated(&mut self, offset: usize, what: &str) -> Option<CsaEntry<'a>> {
        debug!(
            "CSA block truncated at {} (offset {}, {} of {} records decoded)",
            what, offset, self.cnum, self.num
        );
        self.finished = true;
        None
    }
}

impl<'a, W: Write> Iterator for CsaParser<'a, W> {
    type Item = CsaEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse()
    }
}

/// Bytes taken by an item: its header plus the payload rounded up to 4
fn item_footprint(length: u32) -> Option<usize> {
    usize::try_from(length)
        .ok()?
        .checked_add(3)
        .map(|n| n / 4 * 4)?
        .checked_add(ITEM_HEADER_LEN)
}

/// Reads a fixed-capacity text field up to its first NUL
fn read_cstr(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn write_echo<W: Write>(out: &mut W, entry: &CsaEntry<'_>) -> io::Result<()> {
    write!(out, "    [CSA] {}: ", entry.name)?;
    for item in &entry.items {
        out.write_all(item.payload())?;
        out.write_all(b" ")?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csa::testing::BlockBuilder;

    fn names(block: &[u8]) -> Vec<String> {
        CsaParser::new(block).map(|e| e.name).collect()
    }

    #[test]
    fn test_decodes_all_declared_records() {
        let block = BlockBuilder::new()
            .record("EchoLinePosition", "IS", &["42\0"])
            .record("SliceThickness", "DS", &["2.5\0"])
            .build();

        let entries: Vec<_> = CsaParser::new(&block).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "EchoLinePosition");
        assert_eq!(entries[0].vr, "IS");
        assert_eq!(entries[0].item_count, 1);
        assert_eq!(entries[0].items[0].length, 3);
        assert_eq!(entries[0].items[0].payload(), b"42\0");
        assert_eq!(entries[1].key(), "SliceThickness");
    }

    #[test]
    fn test_stops_at_declared_count() {
        let block = BlockBuilder::new()
            .record("A", "IS", &["1"])
            .record("B", "IS", &["2"])
            .record("C", "IS", &["3"])
            .declared_count(2)
            .build();

        let mut parser = CsaParser::new(&block);
        assert!(parser.parse().is_some());
        assert!(parser.parse().is_some());
        assert!(parser.parse().is_none());
        assert_eq!(parser.parsed_count(), 2);
        assert_eq!(parser.declared_count(), 2);
    }

    #[test]
    fn test_declared_count_beyond_data() {
        let block = BlockBuilder::new()
            .record("A", "IS", &["1"])
            .declared_count(100)
            .build();

        assert_eq!(names(&block), vec!["A".to_string()]);
    }

    #[test]
    fn test_truncation_yields_prefix() {
        let block = BlockBuilder::new()
            .record("First", "LO", &["alpha\0", "", "beta"])
            .record("Second", "IS", &[])
            .record("Third", "DS", &["1.25", "7\0"])
            .record("Fourth", "SH", &["x"])
            .build();

        let full: Vec<_> = CsaParser::new(&block).collect();
        assert_eq!(full.len(), 4);

        for cut in 0..=block.len() {
            let truncated: Vec<_> = CsaParser::new(&block[..cut]).collect();
            assert!(truncated.len() <= full.len(), "cut at {}", cut);
            assert_eq!(&full[..truncated.len()], truncated.as_slice(), "cut at {}", cut);
        }
    }

    #[test]
    fn test_alignment_padding_is_skipped() {
        let block = BlockBuilder::new()
            .record("Padded", "LO", &["hello", "ab"])
            .build();

        let entry = CsaParser::new(&block).next().unwrap();
        assert_eq!(entry.items.len(), 2);
        assert_eq!(entry.items[0].length, 5);
        assert_eq!(entry.items[0].data.len(), 8);
        assert_eq!(entry.items[0].payload(), b"hello");
        assert_eq!(entry.items[1].payload(), b"ab");
    }

    #[test]
    fn test_magic_mismatch_is_not_fatal() {
        let mut block = BlockBuilder::new().record("A", "IS", &["1"]).build();
        block[..4].copy_from_slice(b"XXXX");

        assert_eq!(names(&block), vec!["A".to_string()]);
    }

    #[test]
    fn test_block_too_short_for_count() {
        assert!(CsaParser::new(b"SV10").parse().is_none());
        assert!(CsaParser::new(&[]).parse().is_none());
    }

    #[test]
    fn test_huge_item_length_stops_decoding() {
        let mut block = BlockBuilder::new()
            .record("A", "IS", &["1"])
            .record("B", "IS", &["2"])
            .build();
        // Length field of the second record's only item
        let offset = 16 + 84 + 16 + 4 + 84;
        block[offset..offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());

        assert_eq!(names(&block), vec!["A".to_string()]);
    }

    #[test]
    fn test_record_without_items() {
        let block = BlockBuilder::new()
            .record("Empty", "UN", &[])
            .record("Next", "IS", &["3"])
            .build();

        let entries: Vec<_> = CsaParser::new(&block).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].items.is_empty());
        assert_eq!(entries[1].items[0].payload(), b"3");
    }

    #[test]
    fn test_truncated_parser_stays_finished() {
        let block = BlockBuilder::new()
            .record("A", "IS", &["1"])
            .record("B", "IS", &["2"])
            .build();
        let mut parser = CsaParser::new(&block[..block.len() - 5]);
        assert!(parser.parse().is_some());
        assert!(parser.parse().is_none());
        assert!(parser.parse().is_none());
    }

    #[test]
    fn test_echo_writes_declared_payloads() {
        let block = BlockBuilder::new()
            .record("B_value", "IS", &["1000\0", ""])
            .build();

        let mut parser = CsaParser::with_echo(&block, Vec::new());
        assert!(parser.parse().is_some());
        let echoed = parser.into_echo().unwrap();
        assert_eq!(echoed, b"    [CSA] B_value: 1000\0  \n".to_vec());
    }

    #[test]
    fn test_item_trimmed() {
        let item = CsaItem {
            length: 4,
            data: b"ab\0\0",
        };
        assert_eq!(item.trimmed(), b"ab");
        assert!(!item.is_empty());

        let nuls = CsaItem {
            length: 4,
            data: b"\0\0\0\0",
        };
        assert_eq!(nuls.trimmed(), b"");
    }

    #[test]
    fn test_item_footprint() {
        assert_eq!(item_footprint(0), Some(ITEM_HEADER_LEN));
        assert_eq!(item_footprint(1), Some(ITEM_HEADER_LEN + 4));
        assert_eq!(item_footprint(8), Some(ITEM_HEADER_LEN + 8));
        #[cfg(target_pointer_width = "32")]
        assert_eq!(item_footprint(u32::MAX), None);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(item_footprint(u32::MAX), Some((1 << 32) + ITEM_HEADER_LEN));
    }
}
