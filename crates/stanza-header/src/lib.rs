//! Header tag formatting for the stanza metadata query tool.
//!
//! The query engine resolves a format by name or code through the registry,
//! then renders one tagged value at a time through it. Formats are total:
//! a value the format cannot handle renders a parenthesized placeholder
//! string, never an error.
//!
//! # Example
//!
//! ```
//! use stanza_header::{header_formatter_by_name, FieldTemplate, TagData};
//!
//! let formatter = header_formatter_by_name("octal")
//!     .or_else(|| header_formatter_by_name("string"))
//!     .expect("string format always exists");
//!
//! let mode = TagData::int32(0o644);
//! assert_eq!(formatter.render(&mode, &FieldTemplate::new()), "644");
//! ```

pub mod flags;
pub mod formats;
mod pgpsig;
pub mod tagdata;
pub mod template;

pub use formats::{
    header_formatter_by_code, header_formatter_by_name, FormatCode, HeaderFormatter,
};
pub use tagdata::{TagData, TagKind, TagValue};
pub use template::FieldTemplate;
