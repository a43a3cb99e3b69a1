//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// (text, base font, size in points)
pub type TextLine = (&'static str, &'static str, i64);

/// A plain sentence that never looks like a heading.
pub const BODY: TextLine = ("the committee reviewed the figures.", "Times-Roman", 10);

/// Build a PDF with one text object per line, top to bottom.
///
/// An empty page gets no content stream at all.
pub fn build_pdf(pages: &[Vec<TextLine>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts: Vec<&'static str> = Vec::new();
    for (_, font, _) in pages.iter().flatten() {
        if !fonts.contains(font) {
            fonts.push(*font);
        }
    }
    let mut font_dict = Dictionary::new();
    for (i, font) in fonts.iter().enumerate() {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => *font,
        });
        font_dict.set(format!("F{}", i + 1), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_dict,
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => resources_id,
            "MediaBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(595), Object::Integer(842)],
        };

        if !lines.is_empty() {
            let mut operations = Vec::new();
            let mut y = 780;
            for (text, font, size) in lines {
                let index = fonts.iter().position(|f| f == font).unwrap_or(0) + 1;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(format!("F{}", index).into_bytes()),
                        Object::Integer(*size),
                    ],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(72), Object::Integer(y)],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
                operations.push(Operation::new("ET", vec![]));
                y -= size * 2;
            }
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            page.set("Contents", content_id);
        }

        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Report with a title page and numbered chapters.
pub fn report_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![("Annual Report", "Helvetica-Bold", 24), BODY, BODY, BODY],
        vec![
            ("1 Introduction", "Helvetica", 16),
            BODY,
            ("1.1 Scope", "Helvetica-Oblique", 13),
            BODY,
        ],
        vec![("Chapter 1", "Helvetica", 16), BODY],
        vec![("Chapter 1", "Helvetica", 16), BODY],
        vec![("Chapter 1", "Helvetica", 16), BODY],
    ])
}

/// Lab manual with program markers and lab keywords.
pub fn lab_manual_pdf() -> Vec<u8> {
    build_pdf(&[
        vec![("Data Structures Lab", "Helvetica-Bold", 22), BODY],
        vec![
            ("PROGRAM 3", "Times-Roman", 10),
            ("AIM", "Times-Roman", 10),
            BODY,
            ("INTRODUCTION TO ALGORITHMS", "Helvetica-Bold", 11),
            BODY,
        ],
    ])
}
