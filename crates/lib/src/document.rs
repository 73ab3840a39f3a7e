//! # Analysis Document Model
//!
//! The page-level structure returned by the document analysis service. Blocks
//! are kept in the reading order the service reports.

use serde::{Deserialize, Serialize};

/// A fully analysed document: pages in the order the service returned them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl AnalysisDocument {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }
}

/// A single analysed page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub page_num: u32,
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
}

impl Page {
    pub fn new(page_num: u32, blocks: Vec<LayoutBlock>) -> Self {
        Self { page_num, blocks }
    }
}

/// A layout region detected on a page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutBlock {
    Title {
        text: String,
    },
    SectionHeader {
        text: String,
    },
    Text {
        text: String,
    },
    List {
        #[serde(default)]
        items: Vec<String>,
    },
    Header {
        text: String,
    },
    Footer {
        text: String,
    },
    PageNumber {
        text: String,
    },
    Figure {
        #[serde(default)]
        text: String,
    },
    Table(Table),
    /// A form field.
    KeyValue {
        key: String,
        #[serde(default)]
        value: String,
    },
    Signature {
        #[serde(default)]
        confidence: Option<f32>,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Table {
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TableCell {
    #[serde(default)]
    pub text: String,
    /// Column header cells render with the header prefix/suffix.
    #[serde(default)]
    pub is_header: bool,
}

impl TableCell {
    pub fn header(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_header: true,
        }
    }

    pub fn data(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_header: false,
        }
    }
}
