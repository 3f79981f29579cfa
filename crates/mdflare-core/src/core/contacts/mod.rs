//! Contact records and the plain-text contact file.
//!
//! A contact file holds one observation per line, `frame itype atom1 atom2 [atom3] [atom4]`,
//! preceded by an optional header comment describing the detection run.

pub mod header;
pub mod itype;
pub mod parser;
pub mod record;
pub mod writer;

pub use header::ContactFileHeader;
pub use itype::{InteractionFilter, InteractionType};
pub use parser::{ContactFile, ContactParseError, LineError, read_contacts, read_contacts_from_path};
pub use record::ContactRecord;
pub use writer::{render_contacts, write_contacts_to_path};
