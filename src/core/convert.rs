//! Descriptors for the external format converters.

use std::path::Path;

use crate::command::CommandSpec;

/// Convert one image to PNG next to the original: `mogrify -format png <file>`.
pub fn illustration(program: &str, file: &Path) -> CommandSpec {
    CommandSpec::new(program)
        .args(["-format", "png"])
        .path_arg(file)
}

/// Re-encode `src` from `encoding` to UTF-8, writing the result to `out`.
pub fn to_utf8(program: &str, encoding: &str, src: &Path, out: &Path) -> CommandSpec {
    CommandSpec::new(program)
        .args(["-f", encoding, "-t", "UTF-8", "-o"])
        .path_arg(out)
        .path_arg(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illustration_converts_in_place() {
        let spec = illustration("mogrify", Path::new("originals/illustrations/i_001.jpg"));
        assert_eq!(
            spec.display(),
            "mogrify -format png originals/illustrations/i_001.jpg"
        );
    }

    #[test]
    fn to_utf8_names_output_before_input() {
        let spec = to_utf8(
            "iconv",
            "ISO-8859-1",
            Path::new("emma-src.txt"),
            Path::new("emma-src.txt.utf8"),
        );
        assert_eq!(
            spec.args,
            vec![
                "-f",
                "ISO-8859-1",
                "-t",
                "UTF-8",
                "-o",
                "emma-src.txt.utf8",
                "emma-src.txt"
            ]
        );
    }
}
