pub mod cli;
pub mod csa;
pub mod error;
pub mod extraction;
pub mod selection;
pub mod tree;
pub mod types;

pub use cli::report::TextReport;
pub use csa::{CsaEntry, CsaFields, CsaItem, CsaParser};
pub use error::{CsaSelectError, Result};
pub use selection::{select_cmdline, Selector};
pub use tree::{Image, Patient, Series, Study, Tree};
pub use types::*;
