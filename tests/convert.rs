use std::io::{Cursor, Write};

use citemd::error::{NOT_FOUND_MESSAGE, READ_FAILED_MESSAGE};
use citemd::{ArchiveBuffer, ErrorKind, InputFile, Pipeline, PipelineState, decode, render_output};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

const EXAMPLE_LIBRARY: &str = r#"{"docs":[{"data":{"doc_title":"Alpha"},"citations":[{"note_body":"hello","note_page":3}]},{"data":{"doc_title":"Beta"},"citations":[]}]}"#;

fn build_zip(files: &[(&str, &str)], method: CompressionMethod) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);
    for (name, contents) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

async fn convert(name: &str, data: Vec<u8>) -> Pipeline {
    let mut pipeline = Pipeline::new();
    pipeline.run(InputFile::new(name, data)).await;
    pipeline
}

#[tokio::test]
async fn example_library_renders_one_block() {
    let data = build_zip(&[("library.json", EXAMPLE_LIBRARY)], CompressionMethod::Deflated);
    let pipeline = convert("backup.zip", data).await;

    assert_eq!(pipeline.output_lines(), ["## Alpha\n\n- Page 3: hello"]);
}

#[tokio::test]
async fn disguised_bak_converts_like_zip() {
    let data = build_zip(&[("library.json", EXAMPLE_LIBRARY)], CompressionMethod::Stored);

    let from_zip = convert("backup.zip", data.clone()).await.output_lines();
    let from_bak = convert("backup.bak", data).await.output_lines();
    assert_eq!(from_zip, from_bak);
}

#[tokio::test]
async fn conversion_is_repeatable() {
    let data = build_zip(
        &[
            ("images/cover.jpg", "jpeg bytes"),
            ("library.json", EXAMPLE_LIBRARY),
        ],
        CompressionMethod::Deflated,
    );
    let buffer = ArchiveBuffer::from(data.clone());

    assert_eq!(
        decode(buffer.clone()).await.unwrap(),
        decode(buffer).await.unwrap()
    );
    assert_eq!(
        convert("a.zip", data.clone()).await.output_lines(),
        convert("a.zip", data).await.output_lines()
    );
}

#[tokio::test]
async fn archive_without_library_reports_not_found() {
    let archives = [
        build_zip(&[], CompressionMethod::Stored),
        build_zip(&[("notes.json", "{}")], CompressionMethod::Deflated),
        build_zip(&[("backup/library.json", EXAMPLE_LIBRARY)], CompressionMethod::Stored),
        build_zip(&[("LIBRARY.JSON", EXAMPLE_LIBRARY)], CompressionMethod::Stored),
    ];

    for data in archives {
        let pipeline = convert("backup.zip", data).await;
        assert_eq!(pipeline.output_lines(), [NOT_FOUND_MESSAGE]);
        match pipeline.state() {
            PipelineState::Failed(err) => assert_eq!(err.kind(), ErrorKind::Archive),
            other => panic!("expected failure, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn non_zip_content_reports_read_failure() {
    let pipeline = convert("backup.zip", b"PK but not really a zip archive".to_vec()).await;
    assert_eq!(pipeline.output_lines(), [READ_FAILED_MESSAGE]);
}

#[tokio::test]
async fn full_library_renders_every_rule() {
    let library = r#"{
        "version": 3,
        "docs": [
            {
                "data": {"doc_title": "The Name of the Rose"},
                "citations": [
                    {"note_body": "stat rosa pristina nomine", "note_page": 502, "note_extra": "closing line"},
                    {"note_body": "labyrinth", "note_page": "xiv", "note_extra": "   "},
                    {"note_page": null}
                ]
            },
            {"data": {"doc_title": "Empty Shelf"}, "citations": []},
            {"data": null, "citations": [{"note_body": "orphan"}]}
        ]
    }"#;
    let data = build_zip(&[("library.json", library)], CompressionMethod::Deflated);
    let pipeline = convert("2024-05-01.bak", data).await;

    assert_eq!(
        render_output(&pipeline.output_lines()),
        "## The Name of the Rose\n\n\
         - Page 502: stat rosa pristina nomine\n  \
         Note: closing line\n\
         - Page xiv: labyrinth\n\
         - Page ?: (empty)\n\n\
         ## Untitled\n\n\
         - Page ?: orphan"
    );
}

#[tokio::test]
async fn reads_backup_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reader.bak");
    std::fs::write(
        &path,
        build_zip(&[("library.json", EXAMPLE_LIBRARY)], CompressionMethod::Deflated),
    )
    .unwrap();

    let contents = tokio::fs::read(&path).await.unwrap();
    let pipeline = convert("reader.bak", contents).await;
    assert!(matches!(pipeline.state(), PipelineState::Rendered(blocks) if blocks.len() == 1));
}

#[tokio::test]
async fn loosely_typed_fields_do_not_fail_the_run() {
    let cases = [
        (
            r#"{"docs":[{"data":{"doc_title":1984},"citations":[{"note_body":"x","note_page":1}]}]}"#,
            "## 1984\n\n- Page 1: x",
        ),
        (
            r#"{"docs":[{"data":{"doc_title":"A"},"citations":[{"note_body":0,"note_page":1}]}]}"#,
            "## A\n\n- Page 1: (empty)",
        ),
        (
            r#"{"docs":[{"data":"legacy","citations":[{"note_body":"x","note_page":1}]}]}"#,
            "## Untitled\n\n- Page 1: x",
        ),
    ];

    for (library, expected) in cases {
        let data = build_zip(&[("library.json", library)], CompressionMethod::Deflated);
        let pipeline = convert("a.zip", data).await;
        assert_eq!(pipeline.output_lines(), [expected]);
    }
}
