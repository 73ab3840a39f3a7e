//! # Text Linearization
//!
//! Flattens an `AnalysisDocument` into a single annotated text stream. Each page
//! is rendered under a `LinearizationConfig` and wrapped in start/end markers.

use crate::document::{AnalysisDocument, LayoutBlock, Page, Table};
use thiserror::Error;

const PAGE_MARKER_RULE: &str = "============================";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LinearizeError {
    #[error("Invalid page number {0}: page numbers are 1-based")]
    InvalidPageNumber(u32),
}

/// Formatting directives for rendering a page.
///
/// `Default` renders plain text with no markup. Every field is applied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearizationConfig {
    /// Drop `FIGURE` blocks. Default: `false`.
    pub hide_figure_layout: bool,
    /// Drop `PAGE_NUMBER` blocks. Default: `false`.
    pub hide_page_num_layout: bool,
    /// Drop `HEADER` blocks. Default: `false`.
    pub hide_header_layout: bool,
    /// Drop `FOOTER` blocks. Default: `false`.
    pub hide_footer_layout: bool,
    pub title_prefix: String,
    pub title_suffix: String,
    pub section_header_prefix: String,
    pub section_header_suffix: String,
    pub table_prefix: String,
    pub table_suffix: String,
    pub table_row_prefix: String,
    pub table_row_suffix: String,
    pub table_cell_header_prefix: String,
    pub table_cell_header_suffix: String,
    pub table_cell_prefix: String,
    pub table_cell_suffix: String,
    /// Between rows of a table. Default: `"\n"`.
    pub table_row_separator: String,
    /// Between cells of a row. Default: `"\t"`.
    pub table_column_separator: String,
    /// Prefix of each `LIST` item. Default: `"- "`.
    pub list_element_prefix: String,
    /// Between the items of a `LIST`. Default: `"\n"`.
    pub list_element_separator: String,
    /// Between the key and the value of a form field. Default: `": "`.
    pub key_value_separator: String,
    /// Placeholder emitted for a signature region. Default: `"[SIGNATURE]"`.
    pub signature_token: String,
    /// Emitted after every rendered block. Default: `"\n"`.
    pub layout_element_separator: String,
}

impl Default for LinearizationConfig {
    fn default() -> Self {
        Self {
            hide_figure_layout: false,
            hide_page_num_layout: false,
            hide_header_layout: false,
            hide_footer_layout: false,
            title_prefix: String::new(),
            title_suffix: String::new(),
            section_header_prefix: String::new(),
            section_header_suffix: String::new(),
            table_prefix: String::new(),
            table_suffix: String::new(),
            table_row_prefix: String::new(),
            table_row_suffix: String::new(),
            table_cell_header_prefix: String::new(),
            table_cell_header_suffix: String::new(),
            table_cell_prefix: String::new(),
            table_cell_suffix: String::new(),
            table_row_separator: "\n".to_string(),
            table_column_separator: "\t".to_string(),
            list_element_prefix: "- ".to_string(),
            list_element_separator: "\n".to_string(),
            key_value_separator: ": ".to_string(),
            signature_token: "[SIGNATURE]".to_string(),
            layout_element_separator: "\n".to_string(),
        }
    }
}

impl LinearizationConfig {
    /// The configuration applied to every enrichment: markdown headings and
    /// HTML tables, page numbers hidden, figures kept.
    pub fn enrichment() -> Self {
        Self {
            hide_figure_layout: false,
            title_prefix: "# ".to_string(),
            section_header_prefix: "## ".to_string(),
            table_prefix: "<table>".to_string(),
            table_suffix: "</table>".to_string(),
            table_cell_header_prefix: "<th>".to_string(),
            table_cell_header_suffix: "</th>".to_string(),
            table_row_prefix: "<tr>".to_string(),
            table_row_suffix: "</tr>".to_string(),
            table_cell_prefix: "<td>".to_string(),
            table_cell_suffix: "</td>".to_string(),
            hide_page_num_layout: true,
            ..Default::default()
        }
    }
}

/// Renders every page of `document` in order, each wrapped in page markers.
pub fn linearize(
    document: &AnalysisDocument,
    config: &LinearizationConfig,
) -> Result<String, LinearizeError> {
    let mut output = String::new();
    for page in &document.pages {
        if page.page_num == 0 {
            return Err(LinearizeError::InvalidPageNumber(page.page_num));
        }
        output.push_str(&format!(
            "{PAGE_MARKER_RULE} Start Page {} {PAGE_MARKER_RULE}\n",
            page.page_num
        ));
        output.push_str(&render_page(page, config));
        output.push_str(&format!(
            "{PAGE_MARKER_RULE} End Page {} {PAGE_MARKER_RULE}\n\n",
            page.page_num
        ));
    }
    Ok(output)
}

/// Renders the blocks of a single page, without markers.
pub fn render_page(page: &Page, config: &LinearizationConfig) -> String {
    page.blocks
        .iter()
        .filter_map(|block| render_block(block, config))
        .filter(|rendered| !rendered.is_empty())
        .map(|rendered| rendered + &config.layout_element_separator)
        .collect()
}

/// Renders one block, or `None` when the configuration hides it.
fn render_block(block: &LayoutBlock, config: &LinearizationConfig) -> Option<String> {
    let rendered = match block {
        LayoutBlock::Title { text } => {
            format!("{}{text}{}", config.title_prefix, config.title_suffix)
        }
        LayoutBlock::SectionHeader { text } => format!(
            "{}{text}{}",
            config.section_header_prefix, config.section_header_suffix
        ),
        LayoutBlock::Text { text } => text.clone(),
        LayoutBlock::List { items } => items
            .iter()
            .map(|item| format!("{}{item}", config.list_element_prefix))
            .collect::<Vec<_>>()
            .join(&config.list_element_separator),
        LayoutBlock::Header { .. } if config.hide_header_layout => return None,
        LayoutBlock::Header { text } => text.clone(),
        LayoutBlock::Footer { .. } if config.hide_footer_layout => return None,
        LayoutBlock::Footer { text } => text.clone(),
        LayoutBlock::PageNumber { .. } if config.hide_page_num_layout => return None,
        LayoutBlock::PageNumber { text } => text.clone(),
        LayoutBlock::Figure { .. } if config.hide_figure_layout => return None,
        LayoutBlock::Figure { text } => text.clone(),
        LayoutBlock::Table(table) => render_table(table, config),
        LayoutBlock::KeyValue { key, value } => {
            format!("{key}{}{value}", config.key_value_separator)
        }
        LayoutBlock::Signature { .. } => config.signature_token.clone(),
    };
    Some(rendered)
}

fn render_table(table: &Table, config: &LinearizationConfig) -> String {
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| {
                    let (prefix, suffix) = if cell.is_header {
                        (
                            &config.table_cell_header_prefix,
                            &config.table_cell_header_suffix,
                        )
                    } else {
                        (&config.table_cell_prefix, &config.table_cell_suffix)
                    };
                    format!("{prefix}{}{suffix}", cell.text)
                })
                .collect::<Vec<_>>()
                .join(&config.table_column_separator);
            format!("{}{cells}{}", config.table_row_prefix, config.table_row_suffix)
        })
        .collect::<Vec<_>>()
        .join(&config.table_row_separator);

    format!("{}{rows}{}", config.table_prefix, config.table_suffix)
}
