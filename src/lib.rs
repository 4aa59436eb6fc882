//! Read XML document trees through a dict-like, read-only view layer.
//!
//! The crate parses a document once into an immutable tree and then exposes
//! navigation over it: bracket-style lookups with a small path language
//! (`@attr`, `tag`, `./tag`, `.//tag`, `a/b`, `*`, trailing `[]` to force
//! list results), a value projection for templates, exact round-trip
//! serialization via `dumps`, and two derived conversions (`unpack`,
//! `unwrap`). Nothing is ever mutated or cached; every lookup re-walks the
//! tree and returns a fresh view.
//!
//! ```
//! let doc = xmldict::parse_str(r#"<catalog><book id="1"><title>Dune</title></book></catalog>"#)?;
//! let root = doc.root();
//! assert_eq!(root.get("book/title")?.to_string(), "Dune");
//! assert_eq!(root.get("book")?.get("@id")?.to_string(), "1");
//! assert_eq!(root.get("book")?.dumps(), r#"<book id="1"><title>Dune</title></book>"#);
//! # Ok::<(), xmldict::Error>(())
//! ```

pub mod dom;
pub mod error;
pub mod key;
pub mod resolve;
pub mod serialize;
mod unwrap;
pub mod view;

pub use dom::{Document, Node};
pub use error::Error;
pub use key::{Key, PathExpr};
pub use view::{Value, View};

use std::path::Path;

/// Parses XML from a file path or from document text: when `input` names an
/// existing file the file is read, otherwise `input` itself is parsed.
pub fn parse(input: &str) -> Result<Document, Error> {
    if Path::new(input).is_file() {
        parse_file(input)
    } else {
        Document::parse(input)
    }
}

/// Parses XML document text.
pub fn parse_str(text: &str) -> Result<Document, Error> {
    Document::parse(text)
}

/// Reads and parses an XML file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document, Error> {
    log::debug!("parsing XML file {}", path.as_ref().display());
    let text = std::fs::read_to_string(path)?;
    Document::parse(&text)
}
