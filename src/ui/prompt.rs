//! Naming prompt shown once per group

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::error::PromptError;

/// Capability: present a group's photos and ask for a name.
/// How the photos are presented is up to the implementation.
/// Returns the raw, unsanitized answer.
pub trait NamePrompt {
    fn prompt(&mut self, photos: &[PathBuf]) -> Result<String, PromptError>;
}

/// Line-based prompt on a terminal (or any reader/writer pair).
///
/// Photos are listed by index and path only, they are not displayed. Open
/// them in an image viewer to see what the group contains.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> NamePrompt for TerminalPrompt<R, W> {
    fn prompt(&mut self, photos: &[PathBuf]) -> Result<String, PromptError> {
        writeln!(self.output)?;
        writeln!(self.output, "📷 Group of {} photos:", photos.len())?;
        for (idx, photo) in photos.iter().enumerate() {
            writeln!(self.output, "   {:02}  {}", idx, photo.display())?;
        }
        write!(self.output, "Name for this group (empty for default): ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF: the user closed the input
            return Err(PromptError::Cancelled);
        }

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_one_answer_per_group() {
        let mut output = Vec::new();
        let mut prompt = TerminalPrompt::new(Cursor::new("Beach day\nCity\r\n"), &mut output);

        let photos = vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")];
        assert_eq!(prompt.prompt(&photos).unwrap(), "Beach day");
        assert_eq!(prompt.prompt(&photos[..1]).unwrap(), "City");

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("00  a.jpg"));
        assert!(shown.contains("01  b.jpg"));
        assert!(shown.contains("Group of 2 photos"));
    }

    #[test]
    fn test_eof_is_cancellation() {
        let mut prompt = TerminalPrompt::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            prompt.prompt(&[PathBuf::from("a.jpg")]),
            Err(PromptError::Cancelled)
        ));
    }

    #[test]
    fn test_blank_line_is_returned_raw() {
        let mut prompt = TerminalPrompt::new(Cursor::new("\n"), Vec::new());
        assert_eq!(prompt.prompt(&[]).unwrap(), "");
    }
}
