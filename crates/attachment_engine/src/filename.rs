/// Make a delivered filename safe to create on any desktop filesystem.
///
/// Path separators and control characters become `_`, leading and trailing
/// dots/spaces are dropped and reserved Windows device names get a `_`
/// suffix on their stem.
pub fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        cleaned = "download".to_string();
    }
    if cleaned.len() > 200 {
        let mut end = 200;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }

    let (stem, extension) = match cleaned.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), Some(ext.to_string())),
        _ => (cleaned.clone(), None),
    };
    if !is_reserved_windows_name(&stem) {
        return cleaned;
    }
    match extension {
        Some(ext) => format!("{stem}_.{ext}"),
        None => format!("{stem}_"),
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::safe_filename;

    #[test]
    fn regular_names_pass_through() {
        assert_eq!(safe_filename("file-1.pdf"), "file-1.pdf");
        assert_eq!(safe_filename("1234567890.zip"), "1234567890.zip");
    }

    #[test]
    fn separators_cannot_escape_the_directory() {
        assert_eq!(safe_filename("../../etc/passwd.zip"), "_.._etc_passwd.zip");
        assert_eq!(safe_filename("a\\b:c.zip"), "a_b_c.zip");
    }

    #[test]
    fn reserved_stems_are_patched() {
        assert_eq!(safe_filename("CON.zip"), "CON_.zip");
        assert_eq!(safe_filename("nul"), "nul_");
    }

    #[test]
    fn empty_names_get_a_placeholder() {
        assert_eq!(safe_filename(" . "), "download");
        assert_eq!(safe_filename("///"), "download");
    }
}
