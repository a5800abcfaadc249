//! Loader tests: a generated single-page PDF and text-loader round trips.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};

use ragline::{DocumentLoader, PdfLoader};

/// Build a one-page PDF with a single text run and save it to `path`.
fn write_sample_pdf(path: &std::path::Path, text: &str) {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn pdf_loader_yields_one_document_per_page_with_page_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.pdf");
    write_sample_pdf(&path, "Reasoning and acting complement each other");

    let documents = PdfLoader::new().load(&path).unwrap();

    assert_eq!(documents.len(), 1);
    assert!(documents[0].text.contains("Reasoning and acting complement each other"));
    assert_eq!(documents[0].metadata["page"], "1");
    assert_eq!(documents[0].metadata["source"], path.display().to_string());
    assert_eq!(documents[0].id, "sample_p1");
}

#[test]
fn pdf_loader_rejects_a_non_pdf_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not_a.pdf");
    std::fs::write(&path, "plain text, not a PDF").unwrap();

    let err = PdfLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, ragline::RagError::Load { .. }));
}
