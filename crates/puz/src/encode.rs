//! Two-pass container serialization.
//!
//! The header carries checksums over bytes that are only known once the
//! grids and strings have been written, so the encoder reserves the header
//! up front with those fields zeroed, serializes the body, computes the
//! checksums, and patches them back into the reserved offsets. The byte
//! layout and all magic constants follow the published Across Lite format.
//!
//! Pipeline: validate → header placeholder → grids → strings → extra
//! sections → compute checksums → patch header. Encoding cannot fail after
//! validation has passed.

use tracing::instrument;

use crate::checksum;
use crate::error::Result;
use crate::model::{Cell, Clue, Grid, Puzzle};

const MAGIC: &[u8; 12] = b"ACROSS&DOWN\0";
const VERSION: &[u8; 4] = b"1.3\0";

const HEADER_LEN: usize = 0x34;
const OFFSET_FILE_CHECKSUM: usize = 0x00;
const OFFSET_MAGIC: usize = 0x02;
const OFFSET_HEADER_CHECKSUM: usize = 0x0E;
const OFFSET_MASKED_CHECKSUMS: usize = 0x10;
const OFFSET_VERSION: usize = 0x18;
const OFFSET_WIDTH: usize = 0x2C;
const OFFSET_HEIGHT: usize = 0x2D;
const OFFSET_CLUE_COUNT: usize = 0x2E;
const OFFSET_PUZZLE_TYPE: usize = 0x30;
const OFFSET_SOLUTION_STATE: usize = 0x32;

const PUZZLE_TYPE_NORMAL: u16 = 0x0001;
const SOLUTION_STATE_UNSCRAMBLED: u16 = 0x0000;

/// Grid byte for a black square.
const BLOCK: u8 = b'.';
/// Grid byte for an unfilled player square.
const EMPTY: u8 = b'-';

/// Rebus grid section: one byte per cell, zero or one-based table index.
const SECTION_REBUS_GRID: &[u8; 4] = b"GRBS";
/// Rebus table section: `index:answer;` entries.
const SECTION_REBUS_TABLE: &[u8; 4] = b"RTBL";

impl Puzzle {
    /// Serializes the puzzle into a complete `.puz` file image.
    ///
    /// Validates first; the returned bytes are deterministic for a given
    /// model (no timestamps, no randomness), so encoding twice yields
    /// identical output.
    #[instrument(skip_all, fields(title = %self.title))]
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let width = self.solution.width();
        let height = self.solution.height();
        let clues = self.canonical_clues();
        // Every word spans at least two squares, so word starts are bounded
        // by the cell count and the clue count always fits sixteen bits.
        let clue_count = clues.len() as u16;

        let solution = grid_bytes(&self.solution);
        let fill = grid_bytes(&self.fill);
        let title = latin1(&self.title);
        let author = latin1(&self.author);
        let copyright = latin1(&self.copyright);
        let clue_texts: Vec<Vec<u8>> = clues.iter().map(|clue| latin1(&clue.text)).collect();
        let notes = latin1(&self.notes);

        let mut buf = Vec::with_capacity(HEADER_LEN + 2 * solution.len() + 256);

        // Header placeholder: fixed fields now, checksum fields zeroed.
        buf.resize(HEADER_LEN, 0);
        buf[OFFSET_MAGIC..OFFSET_MAGIC + MAGIC.len()].copy_from_slice(MAGIC);
        buf[OFFSET_VERSION..OFFSET_VERSION + VERSION.len()].copy_from_slice(VERSION);
        buf[OFFSET_WIDTH] = width;
        buf[OFFSET_HEIGHT] = height;
        put_u16(&mut buf, OFFSET_CLUE_COUNT, clue_count);
        put_u16(&mut buf, OFFSET_PUZZLE_TYPE, PUZZLE_TYPE_NORMAL);
        put_u16(&mut buf, OFFSET_SOLUTION_STATE, SOLUTION_STATE_UNSCRAMBLED);

        // Body: both grid blocks, then the NUL-terminated strings.
        buf.extend_from_slice(&solution);
        buf.extend_from_slice(&fill);
        for field in [&title, &author, &copyright] {
            buf.extend_from_slice(field);
            buf.push(0);
        }
        for clue in &clue_texts {
            buf.extend_from_slice(clue);
            buf.push(0);
        }
        buf.extend_from_slice(&notes);
        buf.push(0);

        if let Some((grid_data, table_data)) = rebus_sections(&self.solution) {
            extra_section(&mut buf, SECTION_REBUS_GRID, &grid_data);
            extra_section(&mut buf, SECTION_REBUS_TABLE, &table_data);
        }

        // Checksums over the finished regions, patched into the header.
        let header_cs =
            checksum::header(width, height, clue_count, PUZZLE_TYPE_NORMAL, SOLUTION_STATE_UNSCRAMBLED);
        let solution_cs = checksum::region(&solution, 0);
        let fill_cs = checksum::region(&fill, 0);
        let text_cs = text_checksum(&title, &author, &copyright, &clue_texts, &notes, 0);

        let mut file_cs = checksum::region(&solution, header_cs);
        file_cs = checksum::region(&fill, file_cs);
        file_cs = text_checksum(&title, &author, &copyright, &clue_texts, &notes, file_cs);

        put_u16(&mut buf, OFFSET_FILE_CHECKSUM, file_cs);
        put_u16(&mut buf, OFFSET_HEADER_CHECKSUM, header_cs);
        let masked = checksum::masked(header_cs, solution_cs, fill_cs, text_cs);
        buf[OFFSET_MASKED_CHECKSUMS..OFFSET_MASKED_CHECKSUMS + masked.len()].copy_from_slice(&masked);

        Ok(buf)
    }

    /// Clues in the container's canonical order: ascending number, across
    /// before down on a shared number. The model accepts any order.
    fn canonical_clues(&self) -> Vec<&Clue> {
        let mut clues: Vec<&Clue> = self.clues.iter().collect();
        clues.sort_by_key(|clue| (clue.number, clue.direction));
        clues
    }
}

fn text_checksum(
    title: &[u8],
    author: &[u8],
    copyright: &[u8],
    clue_texts: &[Vec<u8>],
    notes: &[u8],
    seed: u16,
) -> u16 {
    checksum::text(title, author, copyright, clue_texts.iter().map(Vec::as_slice), notes, seed)
}

/// Encodes validated text as Latin-1. Validation has already rejected
/// anything above U+00FF.
fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u8).collect()
}

fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
    buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// One byte per cell, row-major. Works for either grid: validation forbids
/// `Empty` in the solution and `Rebus` in the fill.
fn grid_bytes(grid: &Grid) -> Vec<u8> {
    grid.cells()
        .iter()
        .map(|cell| match cell {
            Cell::Block => BLOCK,
            Cell::Empty => EMPTY,
            Cell::Letter(c) => *c as u8,
            Cell::Rebus { display, .. } => *display as u8,
        })
        .collect()
}

/// Builds the GRBS/RTBL payloads when the solution holds rebus squares.
///
/// GRBS carries a one-based table index per cell (zero means no rebus);
/// RTBL lists `index:answer;` entries with the index space-padded to two
/// characters. Duplicate answers share a table entry.
fn rebus_sections(solution: &Grid) -> Option<(Vec<u8>, Vec<u8>)> {
    let mut table: Vec<&str> = Vec::new();
    let mut grid_data = vec![0u8; solution.cells().len()];
    for (i, cell) in solution.cells().iter().enumerate() {
        if let Cell::Rebus { answer, .. } = cell {
            let index = match table.iter().position(|known| known == answer) {
                Some(index) => index,
                None => {
                    table.push(answer);
                    table.len() - 1
                },
            };
            grid_data[i] = (index + 1) as u8;
        }
    }
    if table.is_empty() {
        return None;
    }
    let table_text: String =
        table.iter().enumerate().map(|(index, answer)| format!("{index:>2}:{answer};")).collect();
    Some((grid_data, latin1(&table_text)))
}

/// Appends an extra section: name, data length, data checksum, data, NUL.
fn extra_section(buf: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    buf.extend_from_slice(name);
    buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
    buf.extend_from_slice(&checksum::region(data, 0).to_le_bytes());
    buf.extend_from_slice(data);
    buf.push(0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn letters(width: u8, height: u8, pattern: &str) -> Grid {
        let cells = pattern
            .chars()
            .map(|c| match c {
                '#' => Cell::Block,
                c => Cell::Letter(c),
            })
            .collect();
        Grid::new(width, height, cells).unwrap()
    }

    fn clue(number: u16, direction: Direction, text: &str) -> Clue {
        Clue { number, direction, text: text.to_string() }
    }

    fn puzzle() -> Puzzle {
        let solution = letters(3, 3, "CATODEGEL");
        let fill = solution.blank_fill();
        Puzzle {
            solution,
            fill,
            clues: vec![
                clue(1, Direction::Across, "Feline (3)"),
                clue(1, Direction::Down, "Codfish (3)"),
                clue(2, Direction::Down, "Fuss (3)"),
                clue(3, Direction::Down, "Story (3)"),
                clue(4, Direction::Across, "Poem (3)"),
                clue(5, Direction::Across, "Jelly (3)"),
            ],
            title: "Quick, Wednesday, January 01, 2025".to_string(),
            author: "Created by DA".to_string(),
            copyright: "The Sydney Morning Herald".to_string(),
            notes: String::new(),
        }
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    /// Minimal structural reader: recovers the fields a conforming
    /// third-party application would.
    fn read_back(bytes: &[u8]) -> (u8, u8, Vec<u8>, Vec<u8>, Vec<String>) {
        let width = bytes[OFFSET_WIDTH];
        let height = bytes[OFFSET_HEIGHT];
        let cells = usize::from(width) * usize::from(height);
        let solution = bytes[HEADER_LEN..HEADER_LEN + cells].to_vec();
        let fill = bytes[HEADER_LEN + cells..HEADER_LEN + 2 * cells].to_vec();
        let strings = bytes[HEADER_LEN + 2 * cells..]
            .split(|&b| b == 0)
            .map(|s| s.iter().map(|&b| char::from(b)).collect::<String>())
            .collect();
        (width, height, solution, fill, strings)
    }

    #[test]
    fn header_carries_magic_and_dimensions() {
        let bytes = puzzle().encode().unwrap();
        assert_eq!(&bytes[OFFSET_MAGIC..OFFSET_MAGIC + 12], MAGIC);
        assert_eq!(&bytes[OFFSET_VERSION..OFFSET_VERSION + 4], VERSION);
        assert_eq!(bytes[OFFSET_WIDTH], 3);
        assert_eq!(bytes[OFFSET_HEIGHT], 3);
        assert_eq!(u16_at(&bytes, OFFSET_CLUE_COUNT), 6);
        assert_eq!(u16_at(&bytes, OFFSET_PUZZLE_TYPE), PUZZLE_TYPE_NORMAL);
        assert_eq!(u16_at(&bytes, OFFSET_SOLUTION_STATE), SOLUTION_STATE_UNSCRAMBLED);
    }

    #[test]
    fn round_trips_grids_and_clue_text() {
        let puzzle = puzzle();
        let bytes = puzzle.encode().unwrap();
        let (width, height, solution, fill, strings) = read_back(&bytes);
        assert_eq!((width, height), (3, 3));
        assert_eq!(solution, b"CATODEGEL");
        assert_eq!(fill, b"---------");
        assert_eq!(strings[0], puzzle.title);
        assert_eq!(strings[1], puzzle.author);
        assert_eq!(strings[2], puzzle.copyright);
        assert_eq!(strings[3..9].to_vec(), vec![
            "Feline (3)",
            "Codfish (3)",
            "Fuss (3)",
            "Story (3)",
            "Poem (3)",
            "Jelly (3)",
        ]);
        // Empty notes still terminate.
        assert_eq!(strings[9], "");
    }

    #[test]
    fn blocks_and_empties_use_format_bytes() {
        let solution = letters(2, 2, "AB#C");
        let mut puzzle = puzzle();
        puzzle.solution = solution.clone();
        puzzle.fill = solution.blank_fill();
        puzzle.clues = vec![clue(1, Direction::Across, "a"), clue(2, Direction::Down, "b")];
        let bytes = puzzle.encode().unwrap();
        let (_, _, solution, fill, _) = read_back(&bytes);
        assert_eq!(solution, b"AB#C".map(|b| if b == b'#' { BLOCK } else { b }));
        assert_eq!(fill, b"--.-");
    }

    #[test]
    fn checksum_fields_are_internally_consistent() {
        let bytes = puzzle().encode().unwrap();
        let cells = 9;
        let solution = &bytes[HEADER_LEN..HEADER_LEN + cells];
        let fill = &bytes[HEADER_LEN + cells..HEADER_LEN + 2 * cells];

        let header_cs = checksum::header(3, 3, 6, PUZZLE_TYPE_NORMAL, SOLUTION_STATE_UNSCRAMBLED);
        assert_eq!(u16_at(&bytes, OFFSET_HEADER_CHECKSUM), header_cs);

        // The file checksum folds the body over the header checksum seed.
        let strings = &bytes[HEADER_LEN + 2 * cells..];
        let mut expected = checksum::region(solution, header_cs);
        expected = checksum::region(fill, expected);
        // Title, author, copyright with NULs; clues without; notes empty.
        let mut parts = strings.split_inclusive(|&b| b == 0);
        for _ in 0..3 {
            expected = checksum::region(parts.next().unwrap(), expected);
        }
        for _ in 0..6 {
            let clue = parts.next().unwrap();
            expected = checksum::region(&clue[..clue.len() - 1], expected);
        }
        assert_eq!(u16_at(&bytes, OFFSET_FILE_CHECKSUM), expected);

        let solution_cs = checksum::region(solution, 0);
        let fill_cs = checksum::region(fill, 0);
        let text_cs = {
            let mut sum = 0;
            let mut parts = strings.split_inclusive(|&b| b == 0);
            for _ in 0..3 {
                sum = checksum::region(parts.next().unwrap(), sum);
            }
            for _ in 0..6 {
                let clue = parts.next().unwrap();
                sum = checksum::region(&clue[..clue.len() - 1], sum);
            }
            sum
        };
        assert_eq!(
            &bytes[OFFSET_MASKED_CHECKSUMS..OFFSET_MASKED_CHECKSUMS + 8],
            &checksum::masked(header_cs, solution_cs, fill_cs, text_cs)
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let puzzle = puzzle();
        assert_eq!(puzzle.encode().unwrap(), puzzle.encode().unwrap());
    }

    #[test]
    fn clue_order_is_canonicalized() {
        let sorted = puzzle();
        let mut shuffled = sorted.clone();
        shuffled.clues.reverse();
        assert_eq!(sorted.encode().unwrap(), shuffled.encode().unwrap());
    }

    #[test]
    fn rejects_invalid_puzzle_before_writing() {
        let mut puzzle = puzzle();
        puzzle.clues.pop();
        assert!(puzzle.encode().is_err());
    }

    #[test]
    fn rebus_cells_emit_grid_and_table_sections() {
        let mut puzzle = puzzle();
        let mut cells: Vec<Cell> = "CATODEGEL"
            .chars()
            .map(Cell::Letter)
            .collect();
        cells[0] = Cell::Rebus { display: 'C', answer: "CARBON".to_string() };
        puzzle.solution = Grid::new(3, 3, cells).unwrap();
        puzzle.fill = puzzle.solution.blank_fill();

        let bytes = puzzle.encode().unwrap();
        let grbs = bytes.windows(4).position(|w| w == SECTION_REBUS_GRID).unwrap();
        assert_eq!(u16_at(&bytes, grbs + 4), 9);
        assert_eq!(u16_at(&bytes, grbs + 6), checksum::region(&bytes[grbs + 8..grbs + 17], 0));
        // One-based table index in the first cell, zero elsewhere.
        assert_eq!(bytes[grbs + 8], 1);
        assert!(bytes[grbs + 9..grbs + 17].iter().all(|&b| b == 0));
        assert_eq!(bytes[grbs + 17], 0);

        let rtbl = bytes.windows(4).position(|w| w == SECTION_REBUS_TABLE).unwrap();
        let len = usize::from(u16_at(&bytes, rtbl + 4));
        assert_eq!(&bytes[rtbl + 8..rtbl + 8 + len], b" 0:CARBON;");
        // The display letter still occupies the solution grid.
        assert_eq!(bytes[HEADER_LEN], b'C');
    }

    #[test]
    fn plain_puzzles_have_no_extra_sections() {
        let bytes = puzzle().encode().unwrap();
        assert!(bytes.windows(4).all(|w| w != SECTION_REBUS_GRID));
        // Output ends exactly at the notes terminator.
        assert_eq!(bytes.last(), Some(&0));
    }
}
