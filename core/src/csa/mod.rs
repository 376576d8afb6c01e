//! Siemens CSA header decoding
//!
//! CSA ("SV10") blocks are self-describing lists of named records stored in
//! private DICOM elements. [`CsaParser`] walks a block record by record;
//! [`CsaFields`] collects a whole block for lookup by name.

mod entry;
mod value;

pub use entry::{CsaEntry, CsaItem, CsaParser, CSA_MAGIC, ITEM_HEADER_LEN, RECORD_HEADER_LEN};
pub use value::CsaFields;
