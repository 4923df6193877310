//! The serde image of the embedded crossword state, and its conversion
//! into the encoder's model.

use chrono::NaiveDate;
use exn::{OptionExt, ResultExt};
use gridfetch_plan::CrosswordType;
use gridfetch_puz::{Cell, Clue, Direction, Grid, Puzzle};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::sanitize::sanitize;

/// Copyright line stamped into every encoded puzzle.
const COPYRIGHT: &str = "The Sydney Morning Herald";

/// The slice of `window.INITIAL_STATE` this tool cares about. Unknown keys
/// (the bulk of the state tree) are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct InitialState {
    #[serde(default)]
    pub(crate) crosswords: Option<CrosswordsState>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrosswordsState {
    #[serde(default)]
    pub(crate) crossword: Option<CrosswordPayload>,
}

/// One crossword exactly as the source page embeds it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswordPayload {
    /// ISO publication date; echoes the date segment of the request URL.
    pub date: String,
    /// Uppercase type name, e.g. `"CRYPTIC"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub author: String,
    /// Rows of cell strings; `"."` marks a block.
    pub grid: Vec<Vec<String>>,
    pub clues: ClueLists,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClueLists {
    pub across: Vec<ClueEntry>,
    pub down: Vec<ClueEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClueEntry {
    /// The grid number the clue belongs to.
    pub position: u16,
    pub question: String,
}

impl CrosswordPayload {
    /// Builds the encoder's input model.
    ///
    /// The page must echo the requested type and date — a silent
    /// substitution (a redirect to today's puzzle, say) would otherwise be
    /// filed under the wrong name. All user-visible text is sanitized to
    /// Latin-1-safe ASCII on the way through; the model is *shaped* here
    /// but only trusted once the encoder's validation accepts it.
    #[instrument(skip(self), fields(kind = %kind, date = %date))]
    pub fn into_puzzle(self, kind: CrosswordType, date: NaiveDate) -> Result<Puzzle> {
        if self.date != date.to_string() {
            exn::bail!(ErrorKind::WrongDate { expected: date.to_string(), found: self.date });
        }
        if !self.kind.eq_ignore_ascii_case(kind.as_str()) {
            exn::bail!(ErrorKind::WrongKind {
                expected: kind.as_str().to_string(),
                found: self.kind,
            });
        }

        let solution = build_grid(&self.grid)?;
        let fill = solution.blank_fill();

        let title = format!("{}, {}", capitalize(kind.as_str()), date.format("%A, %B %d, %Y"));
        let author = sanitize(&format!("Created by {}", self.author), "author");
        let clues = self
            .clues
            .across
            .into_iter()
            .map(|entry| (entry, Direction::Across))
            .chain(self.clues.down.into_iter().map(|entry| (entry, Direction::Down)))
            .map(|(entry, direction)| Clue {
                number: entry.position,
                direction,
                text: sanitize(&entry.question, &format!("clue {} {direction}", entry.position)),
            })
            .collect();
        let notes = [self.special_instructions.as_deref(), self.summary.as_deref()]
            .into_iter()
            .flatten()
            .map(|part| sanitize(part, "notes"))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Puzzle {
            solution,
            fill,
            clues,
            title,
            author,
            copyright: COPYRIGHT.to_string(),
            notes,
        })
    }
}

/// Builds the solution grid from the payload's row strings.
fn build_grid(rows: &[Vec<String>]) -> Result<Grid> {
    let first = rows.first().ok_or_raise(|| ErrorKind::InvalidGrid { reason: "no rows" })?;
    let height =
        u8::try_from(rows.len()).or_raise(|| ErrorKind::InvalidGrid { reason: "too many rows" })?;
    let width = u8::try_from(first.len())
        .or_raise(|| ErrorKind::InvalidGrid { reason: "row too wide" })?;
    let mut cells = Vec::with_capacity(rows.len() * first.len());
    for row in rows {
        if row.len() != first.len() {
            exn::bail!(ErrorKind::InvalidGrid { reason: "ragged rows" });
        }
        for text in row {
            cells.push(build_cell(text)?);
        }
    }
    Grid::new(width, height, cells).or_raise(|| ErrorKind::InvalidGrid { reason: "empty row" })
}

fn build_cell(text: &str) -> Result<Cell> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => exn::bail!(ErrorKind::InvalidGrid { reason: "empty cell" }),
        (Some('.'), None) => Ok(Cell::Block),
        (Some(letter), None) => Ok(Cell::Letter(letter)),
        // A multi-letter answer squeezed into one square.
        (Some(display), Some(_)) => Ok(Cell::Rebus { display, answer: text.to_string() }),
    }
}

fn capitalize(word: &str) -> String {
    let mut out = word.to_string();
    if let Some(first) = out.get_mut(..1) {
        first.make_ascii_uppercase();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn entry(position: u16, question: &str) -> ClueEntry {
        ClueEntry { position, question: question.to_string() }
    }

    /// The 3x3 quick puzzle for 2025-02-01 (a Saturday).
    fn payload() -> CrosswordPayload {
        CrosswordPayload {
            date: "2025-02-01".to_string(),
            kind: "QUICK".to_string(),
            author: "DA".to_string(),
            grid: vec![
                row(&["C", "A", "T"]),
                row(&["O", "D", "E"]),
                row(&["G", "E", "L"]),
            ],
            clues: ClueLists {
                across: vec![
                    entry(1, "Feline (3)"),
                    entry(4, "Poem (3)"),
                    entry(5, "Jelly (3)"),
                ],
                down: vec![
                    entry(1, "Codfish (3)"),
                    entry(2, "Fuss (3)"),
                    entry(3, "Story (3)"),
                ],
            },
            special_instructions: None,
            summary: Some("Quick crossword".to_string()),
        }
    }

    #[test]
    fn builds_an_encodable_puzzle() {
        let puzzle = payload().into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap();
        assert_eq!(puzzle.title, "Quick, Saturday, February 01, 2025");
        assert_eq!(puzzle.author, "Created by DA");
        assert_eq!(puzzle.copyright, "The Sydney Morning Herald");
        assert_eq!(puzzle.notes, "Quick crossword");
        assert_eq!(puzzle.clues.len(), 6);
        assert_eq!(puzzle.solution.cells()[0], Cell::Letter('C'));
        assert_eq!(puzzle.fill.cells()[0], Cell::Empty);
        assert!(puzzle.validate().is_ok());
    }

    #[test]
    fn notes_join_instructions_and_summary() {
        let mut payload = payload();
        payload.special_instructions = Some("Read the theme first".to_string());
        let puzzle = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap();
        assert_eq!(puzzle.notes, "Read the theme first\nQuick crossword");
    }

    #[test]
    fn blocks_come_from_dot_cells() {
        let mut payload = payload();
        payload.grid[0][1] = ".".to_string();
        payload.clues = ClueLists {
            across: vec![entry(3, "Middle row (3)"), entry(5, "Bottom row (3)")],
            down: vec![entry(1, "Left (3)"), entry(2, "Right (3)"), entry(4, "Centre (2)")],
        };
        let puzzle = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap();
        assert!(puzzle.solution.cells()[1].is_block());
        assert!(puzzle.fill.cells()[1].is_block());
        assert!(puzzle.validate().is_ok());
    }

    #[test]
    fn multi_letter_cells_become_rebuses() {
        let mut payload = payload();
        payload.grid[0][0] = "CA".to_string();
        let puzzle = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap();
        assert_eq!(
            puzzle.solution.cells()[0],
            Cell::Rebus { display: 'C', answer: "CA".to_string() }
        );
    }

    #[test]
    fn clue_text_is_sanitized() {
        let mut payload = payload();
        payload.clues.across[0].question = "Caf\u{e9} regular\u{2019}s <em>order</em> (3)".to_string();
        let puzzle = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap();
        assert_eq!(puzzle.clues[0].text, "Cafe regular's order (3)");
    }

    #[test]
    fn rejects_wrong_date_echo() {
        let err = payload().into_puzzle(CrosswordType::Quick, date(2025, 2, 2)).unwrap_err();
        assert!(matches!(*err, ErrorKind::WrongDate { .. }));
    }

    #[test]
    fn rejects_wrong_kind_echo() {
        let err = payload().into_puzzle(CrosswordType::Cryptic, date(2025, 2, 1)).unwrap_err();
        assert!(matches!(*err, ErrorKind::WrongKind { .. }));
    }

    #[test]
    fn rejects_ragged_grid() {
        let mut payload = payload();
        payload.grid[1] = row(&["O", "D"]);
        let err = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidGrid { reason: "ragged rows" }));
    }

    #[test]
    fn rejects_empty_cell() {
        let mut payload = payload();
        payload.grid[0][0] = String::new();
        let err = payload.into_puzzle(CrosswordType::Quick, date(2025, 2, 1)).unwrap_err();
        assert!(matches!(*err, ErrorKind::InvalidGrid { reason: "empty cell" }));
    }
}
