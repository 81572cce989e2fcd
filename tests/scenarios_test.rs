//! Integration tests for feature encoding and reconstruction.

use zonelabel::features::{linear_scaling, scale_in_range, BlockStatus, LineStatus, PageStatus};
use zonelabel::{
    Block, BoundingBox, Document, EncoderOptions, Error, LayoutToken, MarkupOptions, Page,
};

/// Block of one line per entry of `lines`, words separated by space tokens.
fn text_block(x: f64, y: f64, lines: &[&str]) -> Block {
    let mut tokens = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            tokens.push(LayoutToken::new("\n"));
        }
        let mut cursor = x;
        for (j, word) in line.split(' ').enumerate() {
            if j > 0 {
                tokens.push(LayoutToken::new(" ").with_geometry(cursor, y, 3.0, 12.0));
                cursor += 3.0;
            }
            let width = 6.0 * word.chars().count() as f64;
            tokens.push(
                LayoutToken::new(word)
                    .with_geometry(cursor, y + 14.0 * i as f64, width, 12.0)
                    .with_font("Times", 11.0),
            );
            cursor += width;
        }
    }
    Block::new(
        BoundingBox::new(x, y, 400.0, 14.0 * lines.len() as f64),
        tokens,
    )
}

fn create_sample_document() -> Document {
    let mut first = Page::a4(1);
    first.add_block(text_block(72.0, 60.0, &["MANUEL DE DROIT"]));
    first.add_block(text_block(72.0, 120.0, &["Chapitre premier", "Les lois de 1905"]));
    let mut second = Page::a4(2);
    second.add_block(text_block(72.0, 60.0, &["Suite du texte"]));
    Document::new(vec![first, second])
}

fn whole_token_features(doc: &Document) -> zonelabel::Featurized<'_> {
    let zone = doc.whole_document().unwrap();
    zonelabel::token_features(doc, &zone, &EncoderOptions::default())
        .unwrap()
        .unwrap()
}

#[test]
fn test_single_line_block() {
    let mut page = Page::a4(1);
    page.add_block(text_block(72.0, 40.0, &["Chapter 1"]));
    let doc = Document::new(vec![page]);

    let out = whole_token_features(&doc);
    assert_eq!(out.records.len(), 2);

    let chapter = &out.records[0];
    assert_eq!(chapter.string, "Chapter");
    assert_eq!(chapter.block_status, BlockStatus::Start);
    assert_eq!(chapter.page_status, PageStatus::Start);

    let number = &out.records[1];
    assert_eq!(number.string, "1");
    assert_eq!(number.block_status, BlockStatus::End);
}

#[test]
fn test_label_change_closes_span() {
    let owned: Vec<LayoutToken> = ["Introduction", " ", "to", " ", "the"]
        .iter()
        .map(|t| LayoutToken::new(*t))
        .collect();
    let tokens: Vec<&LayoutToken> = owned.iter().collect();
    let labels = "Introduction <front>\nto <front>\nthe <body>\n";

    let result =
        zonelabel::tokens_to_markup(&tokens, labels, &MarkupOptions::new().with_indent(0))
            .unwrap();
    assert_eq!(
        result.content.trim_end(),
        "<front>Introduction to</front>\n\n<body>the</body>"
    );
}

#[test]
fn test_block_outside_main_area() {
    let mut page = Page::a4(1).with_main_area(BoundingBox::new(100.0, 100.0, 300.0, 500.0));
    page.add_block(text_block(10.0, 10.0, &["Revue generale", "de droit"]));
    page.add_block(text_block(120.0, 200.0, &["Texte courant"]));
    let doc = Document::new(vec![page]);

    let out = whole_token_features(&doc);
    let (margin, body): (Vec<_>, Vec<_>) = out
        .records
        .iter()
        .partition(|r| ["Revue", "generale", "de", "droit"].contains(&r.string.as_str()));
    assert_eq!(margin.len(), 4);
    assert!(margin.iter().all(|r| !r.in_main_area));
    assert!(body.iter().all(|r| r.in_main_area));

    let lines = zonelabel::line_features(&doc, &EncoderOptions::default())
        .unwrap()
        .unwrap();
    assert!(!lines.records[0].in_main_area);
    assert!(!lines.records[1].in_main_area);
    assert!(lines.records[2].in_main_area);
}

#[test]
fn test_token_ceiling_rejects_document() {
    let doc = create_sample_document();
    let options = EncoderOptions::new().with_max_tokens(5);
    let zone = doc.whole_document().unwrap();

    let err = zonelabel::token_features(&doc, &zone, &options).unwrap_err();
    assert!(matches!(err, Error::TooManyTokens { limit: 5, .. }));
    assert!(err.is_resource_limit());

    let err = zonelabel::line_features(&doc, &options).unwrap_err();
    assert!(err.is_resource_limit());
}

#[test]
fn test_block_ceiling_rejects_document() {
    let doc = create_sample_document();
    let options = EncoderOptions::new().with_max_blocks(2);
    let err = zonelabel::line_features(&doc, &options).unwrap_err();
    assert!(matches!(err, Error::TooManyBlocks { count: 3, limit: 2 }));
}

#[test]
fn test_rescan_is_identical() {
    let doc = create_sample_document();
    let options = EncoderOptions::default();
    let zone = doc.whole_document().unwrap();

    let first = zonelabel::token_feature_string(&doc, &zone, &options).unwrap();
    let second = zonelabel::token_feature_string(&doc, &zone, &options).unwrap();
    assert_eq!(first, second);

    let first = zonelabel::line_feature_string(&doc, &options).unwrap();
    let second = zonelabel::line_feature_string(&doc, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_every_visible_token_has_a_record() {
    let doc = create_sample_document();
    let visible = doc
        .tokens()
        .filter(|t| !t.text.trim().is_empty())
        .count();

    let out = whole_token_features(&doc);
    assert_eq!(out.records.len(), visible);
    assert_eq!(out.tokens.len(), doc.token_count());

    let strings: Vec<_> = out.records.iter().map(|r| r.string.as_str()).collect();
    assert_eq!(
        strings,
        ["MANUEL", "DE", "DROIT", "Chapitre", "premier", "Les", "lois", "de", "1905", "Suite", "du", "texte"]
    );
}

#[test]
fn test_feature_lines_have_fixed_width() {
    let doc = create_sample_document();
    let zone = doc.whole_document().unwrap();
    let tokens = zonelabel::token_feature_string(&doc, &zone, &EncoderOptions::default())
        .unwrap()
        .unwrap();
    assert!(tokens.lines().all(|l| l.split(' ').count() == 26));

    let lines = zonelabel::line_feature_string(&doc, &EncoderOptions::default())
        .unwrap()
        .unwrap();
    assert_eq!(lines.lines().count(), 4);
    assert!(lines.lines().all(|l| l.split(' ').count() == 31));
}

#[test]
fn test_trailing_space_ends_block() {
    let mut page = Page::a4(1);
    page.add_block(Block::new(
        BoundingBox::new(72.0, 60.0, 200.0, 12.0),
        vec![
            LayoutToken::new("Le").with_geometry(72.0, 60.0, 12.0, 12.0),
            LayoutToken::new(" ").with_geometry(84.0, 60.0, 3.0, 12.0),
            LayoutToken::new("mot").with_geometry(87.0, 60.0, 18.0, 12.0),
            LayoutToken::new(" ").with_geometry(105.0, 60.0, 3.0, 12.0),
        ],
    ));
    page.add_block(text_block(72.0, 100.0, &["Suivant"]));
    let doc = Document::new(vec![page]);

    let out = whole_token_features(&doc);
    let word = out.records.iter().find(|r| r.string == "mot").unwrap();
    assert_eq!(word.block_status, BlockStatus::End);
    assert_eq!(word.line_status, LineStatus::End);
    assert_eq!(out.records[2].block_status, BlockStatus::Start);
}

#[test]
fn test_scaling_stays_in_bins() {
    for bins in [1, 5, 12] {
        assert_eq!(linear_scaling(100.0, 100.0, bins), bins);
        assert_eq!(linear_scaling(0.0, 100.0, bins), 0);
        assert_eq!(linear_scaling(250.0, 100.0, bins), bins);
        assert_eq!(scale_in_range(7.5, 2.0, 7.5, bins), bins);
        assert_eq!(scale_in_range(2.0, 2.0, 7.5, bins), 0);
        assert!(scale_in_range(100.0, 2.0, 7.5, bins) <= bins);
        assert_eq!(scale_in_range(-1.0, 2.0, 7.5, bins), 0);
    }

    let doc = create_sample_document();
    let out = whole_token_features(&doc);
    for record in &out.records {
        assert!(record.relative_document_position <= 12);
        assert!(record.relative_page_position <= 12);
        assert!(record.spacing <= 5);
        assert!(record.density <= 5);
    }
}

#[test]
fn test_every_span_is_closed() {
    let doc = create_sample_document();
    let labels = "MANUEL <front>\nChapitre <body>\nLes <annex>\nSuite <body>\nextra <other>\n";
    let result = zonelabel::lines_to_markup(&doc, labels, &MarkupOptions::default()).unwrap();

    for tag in ["front", "body", "annex", "other"] {
        let opened = result.content.matches(&format!("<{}>", tag)).count();
        let closed = result.content.matches(&format!("</{}>", tag)).count();
        assert_eq!(opened, closed, "unbalanced <{}>", tag);
    }
    assert_eq!(result.stats.spans_opened, 5);
    assert_eq!(result.stats.spans_closed, 5);
    assert_eq!(result.stats.desync_count, 1);
}

#[test]
fn test_malformed_labels_are_counted() {
    let doc = create_sample_document();
    let labels = "MANUEL <front>\nbroken\nLes <body>\n";
    let result = zonelabel::lines_to_markup(&doc, labels, &MarkupOptions::default()).unwrap();
    assert_eq!(result.stats.malformed_lines, 1);
    assert_eq!(result.stats.records, 2);
    assert_eq!(result.stats.desync_count, 0);
    assert_eq!(
        result.content,
        "\t\t\t<front>MANUEL DE DROIT</front>\n\n\t\t\t<body>Les lois de 1905</body>\n\n"
    );
}
