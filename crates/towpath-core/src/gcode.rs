//! Program text helpers: sanitizing, dialect prologue, numeric formatting,
//! and file I/O for generated winding programs.

use std::fs;
use std::io;
use std::path::Path;

/// Opcodes that produce physical motion. Everything else is control.
pub const MOTION_OPCODES: [&str; 2] = ["G0", "G1"];

/// Controller dialect: the prologue commands establishing units and
/// positioning mode at the start of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    name: &'static str,
    prologue: [&'static str; 2],
}

impl Dialect {
    /// Marlin-style controllers: millimeter units, absolute positioning.
    pub const MARLIN: Dialect = Dialect {
        name: "marlin",
        prologue: ["G21", "G90"],
    };

    /// Dialect identifier.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Commands emitted before any motion.
    pub fn prologue(&self) -> [&'static str; 2] {
        self.prologue
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::MARLIN
    }
}

/// True for comment lines (leading `;` after optional whitespace).
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

/// Normalize a program: trim line endings and surrounding whitespace, drop
/// blank lines. The relative order of surviving lines is preserved.
pub fn sanitize_program<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Count the command lines of a program, comments excluded.
pub fn count_commands(lines: &[String]) -> usize {
    lines.iter().filter(|line| !is_comment(line)).count()
}

/// Format a number for program output: at most six decimal places,
/// trailing zeros trimmed. Accounting keeps full precision; only the
/// serialized text is rounded.
pub fn format_number(value: f64) -> String {
    let mut text = format!("{value:.6}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    if text == "-0" {
        text.truncate(0);
        text.push('0');
    }
    text
}

/// Write a program to disk, one command per line with a trailing newline.
pub fn write_program(path: impl AsRef<Path>, commands: &[String]) -> io::Result<()> {
    let mut text = commands.join("\n");
    text.push('\n');
    fs::write(path, text)
}

/// Read a program from disk as sanitized lines.
pub fn read_program(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    Ok(sanitize_program(fs::read_to_string(path)?.lines()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_blanks_and_trims() {
        let lines = ["  G0 X1 \r", "", "   ", "; comment", "G1 Y2"];
        assert_eq!(
            sanitize_program(lines),
            vec!["G0 X1", "; comment", "G1 Y2"]
        );
    }

    #[test]
    fn count_excludes_comments() {
        let program = sanitize_program(["; Parameters {}", "G21", "G0 X1", "; note"]);
        assert_eq!(count_commands(&program), 2);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(9000.0), "9000");
        assert_eq!(format_number(360.0), "360");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.123_456_789), "0.123457");
        assert_eq!(format_number(-0.000_000_01), "0");
    }

    #[test]
    fn marlin_prologue() {
        assert_eq!(Dialect::default().prologue(), ["G21", "G90"]);
        assert_eq!(Dialect::MARLIN.name(), "marlin");
    }

    #[test]
    fn program_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wind.gcode");
        let program = vec!["; Parameters {}".to_string(), "G0 X1 Y2".to_string()];
        write_program(&path, &program).unwrap();
        assert_eq!(read_program(&path).unwrap(), program);
    }
}
