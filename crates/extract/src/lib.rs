//! Extraction of crossword puzzles from source site pages.
//!
//! The fetcher hands this crate a raw HTML page; it hands back a
//! [`Puzzle`](gridfetch_puz::Puzzle) ready for encoding:
//!
//! 1. [`extract`] — locate the `window.INITIAL_STATE` script, unescape the
//!    JavaScript string literal, and deserialize the [`CrosswordPayload`].
//! 2. [`CrosswordPayload::into_puzzle`] — verify the page echoed the
//!    requested puzzle, build the grids and clue list, and assemble the
//!    title/author/copyright/notes metadata.
//!
//! All user-visible text passes through [`sanitize`], which transliterates
//! to ASCII so every field survives the container's Latin-1 encoding.

mod consts;
pub mod error;
mod extract;
mod payload;
mod sanitize;

pub use crate::extract::extract;
pub use crate::payload::{ClueEntry, ClueLists, CrosswordPayload};
pub use crate::sanitize::sanitize;
