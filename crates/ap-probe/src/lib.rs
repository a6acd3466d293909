//! # ap-probe
//!
//! Media type validation for audioprep.
//!
//! Files are classified by sniffing their leading bytes rather than trusting
//! the extension, so a renamed text file is rejected and an extensionless
//! recording is still accepted.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let file = ap_probe::validate(Path::new("interview.m4a")).unwrap();
//! println!("{} is {}", file.path.display(), file.kind);
//! ```

pub mod sniff;
pub mod validate;

pub use sniff::{detect_mime, detect_mime_from_bytes, mime_from_extension, OCTET_STREAM};
pub use validate::{classify, classify_mime, ensure_exists, validate};
