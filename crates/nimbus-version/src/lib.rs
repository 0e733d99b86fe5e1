//! Server version parsing and milestone comparison.
//!
//! A Nimbus server advertises its release as a `major.minor.micro` string in
//! the capabilities document. [`ServerVersion`] carries that string together
//! with its parsed triple and compares against the named release thresholds in
//! [`Milestone`]. Unparseable input is not an error: it becomes the unknown
//! sentinel, which orders below every real release so version-gated behavior
//! stays off on servers we cannot identify.

pub use self::milestone::Milestone;
pub use self::version::ServerVersion;

mod milestone;
mod version;
