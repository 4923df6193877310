//! The trust boundary between scraped data and the encoder.
//!
//! Everything upstream of this module is loosely structured input from the
//! source site; nothing reaches the byte writer until it has passed
//! [`Puzzle::validate`].

use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::model::{Cell, Grid, Puzzle};
use crate::numbering;

/// Per-field ceiling for variable-length text, in encoded bytes.
///
/// The container NUL-terminates strings without a length prefix, so this is
/// an explicit cap aligned with the format's 16-bit section lengths.
pub const MAX_TEXT_FIELD_LEN: usize = u16::MAX as usize;

impl Puzzle {
    /// Checks every invariant the encoder relies on.
    ///
    /// - [`ErrorKind::DimensionMismatch`] — grids differ in size or block
    ///   pattern (a square blocked in one grid must be blocked in both).
    /// - [`ErrorKind::ClueCountMismatch`] — clue count differs from the
    ///   numbered entries implied by the block pattern.
    /// - [`ErrorKind::OversizedField`] — a text field exceeds
    ///   [`MAX_TEXT_FIELD_LEN`].
    /// - [`ErrorKind::InvalidFieldContent`] — embedded NUL, non-Latin-1
    ///   text, an [`Cell::Empty`] solution square, or a [`Cell::Rebus`]
    ///   player square.
    #[instrument(skip_all, fields(title = %self.title))]
    pub fn validate(&self) -> Result<()> {
        self.check_grids()?;
        self.check_clue_count()?;
        self.check_text_fields()
    }

    fn check_grids(&self) -> Result<()> {
        if self.solution.width() != self.fill.width() || self.solution.height() != self.fill.height() {
            exn::bail!(ErrorKind::DimensionMismatch);
        }
        for (solution, fill) in self.solution.cells().iter().zip(self.fill.cells()) {
            if solution.is_block() != fill.is_block() {
                exn::bail!(ErrorKind::DimensionMismatch);
            }
        }
        check_cells(&self.solution, "solution", false)?;
        check_cells(&self.fill, "fill", true)
    }

    fn check_clue_count(&self) -> Result<()> {
        let expected = numbering::entries(&self.solution).len();
        let found = self.clues.len();
        if expected != found {
            exn::bail!(ErrorKind::ClueCountMismatch { expected, found });
        }
        Ok(())
    }

    fn check_text_fields(&self) -> Result<()> {
        check_text("title", &self.title)?;
        check_text("author", &self.author)?;
        check_text("copyright", &self.copyright)?;
        check_text("notes", &self.notes)?;
        for clue in &self.clues {
            check_text(&format!("clue {} {}", clue.number, clue.direction), &clue.text)?;
        }
        Ok(())
    }
}

fn check_cells(grid: &Grid, field: &str, is_fill: bool) -> Result<()> {
    for cell in grid.cells() {
        let valid = match cell {
            Cell::Block => true,
            Cell::Letter(c) => c.is_ascii_alphanumeric(),
            // A player grid has no answers yet; a solution grid has no holes.
            Cell::Empty => is_fill,
            Cell::Rebus { display, answer } => {
                !is_fill && display.is_ascii_alphanumeric() && !answer.is_empty()
            },
        };
        if !valid {
            exn::bail!(ErrorKind::InvalidFieldContent { field: field.to_string() });
        }
    }
    Ok(())
}

fn check_text(field: &str, text: &str) -> Result<()> {
    if text.len() > MAX_TEXT_FIELD_LEN {
        exn::bail!(ErrorKind::OversizedField { field: field.to_string(), len: text.len() });
    }
    // The container is Latin-1 with NUL terminators: reject anything that
    // cannot survive that encoding instead of mangling it silently.
    if text.chars().any(|c| c == '\0' || u32::from(c) > 0xFF) {
        exn::bail!(ErrorKind::InvalidFieldContent { field: field.to_string() });
    }
    Ok(())
}
