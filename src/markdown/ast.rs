use serde::{Deserialize, Serialize};

/// Inline markup nodes produced by [`parse_inline`](super::inline::parse_inline)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineNode {
    /// Literal text, delimiters already stripped from any enclosing markup
    Text { content: String },
    /// `**...**` or `__...__`
    Bold { children: Vec<InlineNode> },
    /// `*...*` or `_..._`
    Italic { children: Vec<InlineNode> },
    /// `` `...` ``, never re-parsed
    Code { content: String },
    /// `[label](href)`, label may carry its own markup
    Link { href: String, children: Vec<InlineNode> },
    /// `~~...~~`
    Strikethrough { children: Vec<InlineNode> },
}

impl InlineNode {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    pub fn code(content: impl Into<String>) -> Self {
        Self::Code { content: content.into() }
    }

    /// Concatenated leaf text of this node, markup delimiters excluded
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { content } | Self::Code { content } => out.push_str(content),
            Self::Bold { children }
            | Self::Italic { children }
            | Self::Strikethrough { children }
            | Self::Link { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Leaf text of a whole inline sequence
pub fn plain_text(nodes: &[InlineNode]) -> String {
    nodes.iter().map(InlineNode::plain_text).collect()
}

/// Column alignment derived from a table separator cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    None,
}

/// Parsed pipe table. Row widths are not reconciled with the header width.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
}

/// One list entry. Items only hold inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "list_item")]
pub struct ListItem {
    pub children: Vec<InlineNode>,
}

impl ListItem {
    pub fn new(children: Vec<InlineNode>) -> Self {
        Self { children }
    }
}

/// Block-level nodes in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockNode {
    Paragraph {
        children: Vec<InlineNode>,
    },
    Heading {
        level: u8,
        children: Vec<InlineNode>,
    },
    CodeBlock {
        language: String,
        content: String,
    },
    Blockquote {
        nested: Vec<BlockNode>,
    },
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    Table {
        #[serde(rename = "tableData")]
        table_data: TableData,
    },
    Hr,
}

impl BlockNode {
    /// Stable name of the node kind, matching its serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { .. } => "heading",
            Self::CodeBlock { .. } => "code_block",
            Self::Blockquote { .. } => "blockquote",
            Self::List { .. } => "list",
            Self::Table { .. } => "table",
            Self::Hr => "hr",
        }
    }
}
