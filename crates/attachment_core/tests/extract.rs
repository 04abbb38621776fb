use attachment_core::{extract_attachments, file_extension, AttachmentRef, DEFAULT_EXTENSION};
use pretty_assertions::assert_eq;

#[test]
fn only_marker_links_are_kept_and_numbered_in_scan_order() {
    let hrefs = [
        "/portal/file/123/report.pdf",
        "https://example.com/about",
        "",
        "/portal/file/124/photo.JPG?size=large",
        "/portal/file/125",
    ];

    let refs = extract_attachments(hrefs);

    assert_eq!(
        refs,
        vec![
            AttachmentRef {
                url: "/portal/file/123/report.pdf".to_string(),
                filename: "file-1.pdf".to_string(),
            },
            AttachmentRef {
                url: "/portal/file/124/photo.JPG?size=large".to_string(),
                filename: "file-2.JPG".to_string(),
            },
            AttachmentRef {
                url: "/portal/file/125".to_string(),
                filename: "file-3.bin".to_string(),
            },
        ]
    );
}

#[test]
fn numbering_restarts_for_every_scan() {
    let first = extract_attachments(["/portal/file/a.doc", "/portal/file/b.doc"]);
    let second = extract_attachments(["/portal/file/c.doc"]);

    assert_eq!(first[1].filename, "file-2.doc");
    assert_eq!(second[0].filename, "file-1.doc");
}

#[test]
fn no_matching_links_yields_empty_sequence() {
    let refs = extract_attachments(["/news/1", "mailto:someone@example.com"]);
    assert!(refs.is_empty());
}

#[test]
fn extension_capture_is_case_insensitive() {
    let ext = file_extension("a/b/file.PDF?x=1");
    assert_eq!(ext, "PDF");
    assert!(ext.eq_ignore_ascii_case("pdf"));
}

#[test]
fn extension_accepts_fragment_and_end_of_string() {
    assert_eq!(file_extension("/portal/file/x.docx#page=2"), "docx");
    assert_eq!(file_extension("/portal/file/x.zip"), "zip");
}

#[test]
fn url_without_dot_extension_falls_back() {
    assert_eq!(file_extension("/portal/file/9876"), DEFAULT_EXTENSION);
    assert_eq!(file_extension("/portal/file/v1.2"), DEFAULT_EXTENSION);
}

#[test]
fn only_ascii_letters_count_as_extension() {
    // Long s and the Kelvin sign fold to `s`/`k` under Unicode case folding.
    assert_eq!(file_extension("/portal/file/x.\u{17F}"), DEFAULT_EXTENSION);
    assert_eq!(file_extension("/portal/file/x.\u{212A}b"), DEFAULT_EXTENSION);
    assert_eq!(file_extension("/portal/file/\u{17F}can.pdf"), "pdf");
}
