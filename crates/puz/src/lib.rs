//! Across Lite `.puz` container encoding.
//!
//! The crate takes one in-memory crossword — solution and player grids,
//! clues, metadata — and serializes it into the binary container consumed
//! by third-party solving applications:
//!
//! - **Model** ([`Puzzle`], [`Grid`], [`Cell`], [`Clue`]) — the input
//!   contract, built by the extraction layer.
//! - **Validation** ([`Puzzle::validate`]) — the boundary between loosely
//!   structured scraped data and trusted input; nothing unchecked reaches
//!   the byte writer.
//! - **Checksums** ([`checksum`]) — the format's rotate-accumulate region
//!   checksums, pure and composable.
//! - **Encoding** ([`Puzzle::encode`]) — two-pass serialization: header
//!   reserved with zeroed checksum fields, body written, checksums patched
//!   back in.
//!
//! Everything here is pure and synchronous. A puzzle is exclusively owned
//! by whoever encodes it; batch callers encode independent puzzles
//! concurrently without coordination.

pub mod checksum;
mod encode;
pub mod error;
mod model;
mod numbering;
mod validate;

pub use crate::model::{Cell, Clue, Direction, Grid, Puzzle};
pub use crate::numbering::{Entry, entries};
pub use crate::validate::MAX_TEXT_FIELD_LEN;
