//! Check command for listing warnings only.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use super::util::{check_strict, load_timesheet};
use crate::render::Renderer;

pub fn run<W: Write>(writer: &mut W, path: &Path, strict: bool) -> Result<()> {
    let (_record, summary) = load_timesheet(path)?;

    if summary.warnings.is_empty() {
        writeln!(writer, "Inga varningar.")?;
    } else {
        let mut renderer = Renderer::new(writer);
        for warning in &summary.warnings {
            renderer.warning_row(warning)?;
        }
    }

    check_strict(&summary, strict)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\
Namn: Anna Svensson
Pengar: nej
Flex: 0:00
Komp: 0:00
Komputtag: 0:00
Övertid 1: 0:00
Övertid 2: 0:00
År: 2023
Månad: 1
";

    fn check(rows: &str, strict: bool) -> (String, Result<()>) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("jan.txt");
        std::fs::write(&path, format!("{HEADER}{rows}")).unwrap();

        let mut output = Vec::new();
        let result = run(&mut output, &path, strict);
        (String::from_utf8(output).unwrap(), result)
    }

    #[test]
    fn test_check_without_warnings() {
        let (output, result) = check("2023-01-02 mån 08:00 16:00 n\n", true);
        assert!(result.is_ok());
        assert_eq!(output, "Inga varningar.\n");
    }

    #[test]
    fn test_check_lists_warnings() {
        let (output, result) = check(
            "2023-01-02 mån 08:00 16:00 n\n\
             2023-01-02 mån 16:00 17:00 sj\n",
            false,
        );
        assert!(result.is_ok());
        assert_eq!(
            output,
            " 2023-01-02  Sjukdom\n \
             2023-01-02  Om du är sjuk, kan du knappast registrera fler än totalt\n             \
             7,5 timmar.\n"
        );
    }

    #[test]
    fn test_check_strict_fails_on_warnings() {
        let (output, result) = check("2023-01-02 mån 08:00 12:00 n\n", true);
        assert!(output.contains("Du har jobbat lite!"));
        assert!(result.is_err());
    }
}
