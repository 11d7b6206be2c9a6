//! Line input for the interactive tables.

use std::io::BufRead;

/// Reads one trimmed line, blocking until available. `None` on EOF or a
/// read error.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// use parlor_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("  hit \n");
/// assert_eq!(read_stdin_line(&mut input), Some("hit".to_string()));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
