//! # Linearization Tests
//!
//! Checks the page markers, the enrichment formatting directives and the
//! ordering guarantees of `linearize`.

use textcde::{
    linearize, AnalysisDocument, LayoutBlock, LinearizationConfig, LinearizeError, Page,
};
use textcde_test_utils::fixtures::{simple_page, table, text, title};

const START_1: &str = "============================ Start Page 1 ============================\n";
const END_1: &str = "============================ End Page 1 ============================\n\n";

#[test]
fn test_single_page_layout() {
    // --- 1. Arrange ---
    let document = AnalysisDocument::new(vec![Page::new(
        1,
        vec![
            title("Annual Report"),
            LayoutBlock::SectionHeader {
                text: "Summary".to_string(),
            },
            text("Revenue grew."),
            LayoutBlock::PageNumber {
                text: "1".to_string(),
            },
            LayoutBlock::Figure {
                text: "Chart of revenue".to_string(),
            },
            LayoutBlock::KeyValue {
                key: "Prepared by".to_string(),
                value: "Finance".to_string(),
            },
            LayoutBlock::Signature { confidence: None },
        ],
    )]);

    // --- 2. Act ---
    let output = linearize(&document, &LinearizationConfig::enrichment()).unwrap();

    // --- 3. Assert ---
    let expected = format!(
        "{START_1}# Annual Report\n## Summary\nRevenue grew.\nChart of revenue\nPrepared by: Finance\n[SIGNATURE]\n{END_1}"
    );
    assert_eq!(output, expected);
}

#[test]
fn test_table_renders_well_formed_html() {
    let document = AnalysisDocument::new(vec![Page::new(
        1,
        vec![table(&["Name", "Qty"], &[&["Apple", "3"], &["Pear", "5"]])],
    )]);

    let output = linearize(&document, &LinearizationConfig::enrichment()).unwrap();

    let expected_table = "<table><tr><th>Name</th>\t<th>Qty</th></tr>\n\
                          <tr><td>Apple</td>\t<td>3</td></tr>\n\
                          <tr><td>Pear</td>\t<td>5</td></tr></table>\n";
    assert_eq!(output, format!("{START_1}{expected_table}{END_1}"));

    assert_eq!(output.matches("<table>").count(), 1);
    assert_eq!(output.matches("</table>").count(), 1);
    assert_eq!(output.matches("<tr>").count(), 3);
    assert_eq!(output.matches("</tr>").count(), 3);
    assert_eq!(output.matches("<th>").count(), 2);
    assert_eq!(output.matches("<td>").count(), 4);
    assert_eq!(output.matches("</td>").count(), 4);
}

#[test]
fn test_figures_and_page_numbers_follow_the_config() {
    let page = Page::new(
        3,
        vec![
            LayoutBlock::PageNumber {
                text: "Page 3".to_string(),
            },
            LayoutBlock::Figure {
                text: "Logo".to_string(),
            },
        ],
    );
    let document = AnalysisDocument::new(vec![page]);

    let enrichment = linearize(&document, &LinearizationConfig::enrichment()).unwrap();
    assert!(!enrichment.contains("Page 3\n"));
    assert!(enrichment.contains("Logo\n"));

    let config = LinearizationConfig {
        hide_figure_layout: true,
        hide_page_num_layout: false,
        ..LinearizationConfig::enrichment()
    };
    let custom = linearize(&document, &config).unwrap();
    assert!(custom.contains("Page 3\n"));
    assert!(!custom.contains("Logo"));
}

#[test]
fn test_pages_are_emitted_in_given_order() {
    // --- 1. Arrange ---
    let ordered = AnalysisDocument::new(vec![simple_page(1), simple_page(2), simple_page(3)]);
    let permuted = AnalysisDocument::new(vec![simple_page(3), simple_page(1), simple_page(2)]);
    let config = LinearizationConfig::enrichment();

    // --- 2. Act ---
    let ordered_text = linearize(&ordered, &config).unwrap();
    let permuted_text = linearize(&permuted, &config).unwrap();

    // --- 3. Assert ---
    let blocks = |text: &str| -> Vec<String> {
        text.split_inclusive("============================\n\n")
            .map(str::to_string)
            .collect()
    };
    let ordered_blocks = blocks(&ordered_text);
    let permuted_blocks = blocks(&permuted_text);
    assert_eq!(ordered_blocks.len(), 3);
    assert_eq!(permuted_blocks[0], ordered_blocks[2]);
    assert_eq!(permuted_blocks[1], ordered_blocks[0]);
    assert_eq!(permuted_blocks[2], ordered_blocks[1]);
    assert!(permuted_blocks[0].starts_with(
        "============================ Start Page 3 ============================\n# Page 3 title\n"
    ));
}

#[test]
fn test_linearize_is_deterministic() {
    let document = AnalysisDocument::new(vec![simple_page(1), simple_page(2)]);
    let config = LinearizationConfig::enrichment();

    assert_eq!(
        linearize(&document, &config).unwrap(),
        linearize(&document, &config).unwrap()
    );
}

#[test]
fn test_empty_document_and_empty_page() {
    let config = LinearizationConfig::enrichment();
    assert_eq!(linearize(&AnalysisDocument::default(), &config).unwrap(), "");

    let empty_page = AnalysisDocument::new(vec![Page::new(1, vec![])]);
    assert_eq!(
        linearize(&empty_page, &config).unwrap(),
        format!("{START_1}{END_1}")
    );
}

#[test]
fn test_page_zero_is_rejected() {
    let document = AnalysisDocument::new(vec![simple_page(1), Page::new(0, vec![])]);

    let result = linearize(&document, &LinearizationConfig::enrichment());

    assert_eq!(result, Err(LinearizeError::InvalidPageNumber(0)));
}

#[test]
fn test_document_deserializes_from_service_json() {
    let raw = serde_json::json!({
        "pages": [{
            "page_num": 1,
            "blocks": [
                {"type": "TITLE", "text": "Invoice"},
                {"type": "TABLE", "rows": [
                    {"cells": [{"text": "Item", "is_header": true}]},
                    {"cells": [{"text": "Widget"}]}
                ]},
                {"type": "KEY_VALUE", "key": "Total", "value": "$10"},
                {"type": "SIGNATURE"}
            ]
        }]
    });

    let document: AnalysisDocument = serde_json::from_value(raw).unwrap();
    let output = linearize(&document, &LinearizationConfig::enrichment()).unwrap();

    assert!(output.contains("# Invoice\n"));
    assert!(output.contains("<table><tr><th>Item</th></tr>\n<tr><td>Widget</td></tr></table>\n"));
    assert!(output.contains("Total: $10\n"));
    assert!(output.contains("[SIGNATURE]\n"));
}
