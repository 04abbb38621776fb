use chrono::NaiveDate;

/// `file-<position>.<extension>`, position being 1-based within one scan.
pub fn attachment_filename(position: usize, extension: &str) -> String {
    format!("file-{position}.{extension}")
}

/// Name of the archive delivered for one region.
///
/// A non-blank national code wins (`<code>.zip`); otherwise the name is
/// `files-<YYYY-MM-DD>-<region index>.zip`.
pub fn archive_filename(national_code: Option<&str>, today: NaiveDate, region_index: usize) -> String {
    match national_code.map(str::trim).filter(|code| !code.is_empty()) {
        Some(code) => format!("{code}.zip"),
        None => format!("files-{}-{region_index}.zip", today.format("%Y-%m-%d")),
    }
}
