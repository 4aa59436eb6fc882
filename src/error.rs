use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid lookup key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("no element matched path '{key}'")]
    NoSuchChild { key: String },

    #[error("no such attribute '@{name}'")]
    NoSuchAttribute { name: String },

    #[error("unsupported index operation: {reason}")]
    UnsupportedIndex { reason: String },

    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("XML parsing error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("text escaping error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("unknown entity reference: &{0};")]
    UnknownEntity(String),

    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("UTF-8 string error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Error::Parse(quick_xml::Error::InvalidAttr(e))
    }
}
