//! Delimited-text tokenizing.

const CELL_DELIMITER: char = ',';
const ROW_DELIMITER: char = '\n';
const QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Normal,
    Quoted,
}

/// Splits delimited text into rows of cells.
///
/// Cells are separated by `,` and rows by newline. A quoted span turns
/// delimiters into literal cell text, and a doubled quote inside a
/// quoted span is one literal quote character. An unterminated quote at
/// end of input is treated as implicitly closed, so the function is
/// total. A trailing empty cell or row is dropped; interior empty cells
/// are kept.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut state = ParseState::Normal;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            ParseState::Normal => match ch {
                QUOTE => state = ParseState::Quoted,
                CELL_DELIMITER => row.push(std::mem::take(&mut cell)),
                ROW_DELIMITER => {
                    row.push(std::mem::take(&mut cell));
                    rows.push(std::mem::take(&mut row));
                }
                _ => cell.push(ch),
            },
            ParseState::Quoted => match ch {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    cell.push(QUOTE);
                    chars.next();
                }
                QUOTE => state = ParseState::Normal,
                _ => cell.push(ch),
            },
        }
    }
    if !cell.is_empty() {
        row.push(cell);
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}
