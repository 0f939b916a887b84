//! Yes/no confirmation before deletion.

use std::io::{self, BufRead, Write};

/// Ask `question` on `output` and read one answer line from `input`.
///
/// Only `y` and `yes` (any case, surrounding whitespace ignored) count as
/// consent. An empty line or end of input is a no.
///
/// # Errors
///
/// Returns any I/O error from writing the question or reading the answer.
///
/// # Example
///
/// ```
/// use dupsweep::actions::confirm;
///
/// let mut out = Vec::new();
/// let answer = confirm(&b"yes\n"[..], &mut out, "Delete 2 duplicate file(s)?").unwrap();
/// assert!(answer);
/// ```
pub fn confirm<R: BufRead, W: Write>(mut input: R, mut output: W, question: &str) -> io::Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }

    let answer = line.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
