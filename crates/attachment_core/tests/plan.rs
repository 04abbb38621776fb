use attachment_core::{extract_attachments, plan_download, DownloadPlan, BATCH_SIZE};

fn refs(count: usize) -> Vec<attachment_core::AttachmentRef> {
    let hrefs: Vec<String> = (0..count)
        .map(|i| format!("/portal/file/{i}/doc.pdf"))
        .collect();
    extract_attachments(hrefs.iter().map(String::as_str))
}

#[test]
fn empty_and_single_are_not_archived() {
    assert_eq!(plan_download(Vec::new()), DownloadPlan::Nothing);
    match plan_download(refs(1)) {
        DownloadPlan::Direct(file) => assert_eq!(file.filename, "file-1.pdf"),
        other => panic!("expected direct download, got {other:?}"),
    }
}

#[test]
fn archive_batches_never_exceed_batch_size() {
    for count in 2..=10 {
        let plan = plan_download(refs(count));
        let DownloadPlan::Archive(batches) = &plan else {
            panic!("expected archive plan for {count} files");
        };
        assert_eq!(batches.len(), count.div_ceil(BATCH_SIZE));
        assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= BATCH_SIZE));
        assert_eq!(plan.file_count(), count);
    }
}

#[test]
fn batches_preserve_extraction_order() {
    let DownloadPlan::Archive(batches) = plan_download(refs(5)) else {
        panic!("expected archive plan");
    };
    let names: Vec<_> = batches
        .iter()
        .flatten()
        .map(|f| f.filename.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["file-1.pdf", "file-2.pdf", "file-3.pdf", "file-4.pdf", "file-5.pdf"]
    );
}
