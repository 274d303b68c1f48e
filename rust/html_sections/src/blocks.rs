// Block stream parser: flattens an HTML document into the ordered run of
// headings, paragraphs, tables and images that section extraction works on.

use crate::error::SectionError;
use crate::options::ExtractOptions;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::{ns, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};
use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

const MAX_LOGGED_PARSE_ERRORS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Table,
    Image,
}

impl BlockKind {
    fn from_tag(lower: &str) -> Option<Self> {
        match lower {
            "h1" => Some(BlockKind::Heading1),
            "h2" => Some(BlockKind::Heading2),
            "h3" => Some(BlockKind::Heading3),
            "p" => Some(BlockKind::Paragraph),
            "table" => Some(BlockKind::Table),
            "img" => Some(BlockKind::Image),
            _ => None,
        }
    }

    /// `Some(1..=3)` for heading tags, `None` for everything else.
    pub fn heading_level(self) -> Option<u32> {
        match self {
            BlockKind::Heading1 => Some(1),
            BlockKind::Heading2 => Some(2),
            BlockKind::Heading3 => Some(3),
            _ => None,
        }
    }

    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Heading1 => "h1",
            BlockKind::Heading2 => "h2",
            BlockKind::Heading3 => "h3",
            BlockKind::Paragraph => "p",
            BlockKind::Table => "table",
            BlockKind::Image => "img",
        }
    }
}

/// One recognized element of the document, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Visible text, trimmed. Always empty for images.
    pub text: String,
    /// The element's own markup, re-emitted verbatim into section content.
    pub rendered: String,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>, rendered: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            rendered: rendered.into(),
        }
    }
}

pub fn parse_blocks(html: &str) -> Result<Vec<Block>, SectionError> {
    parse_blocks_with(html, &ExtractOptions::default())
}

pub fn parse_blocks_from_bytes(
    bytes: &[u8],
    options: &ExtractOptions,
) -> Result<Vec<Block>, SectionError> {
    let html = std::str::from_utf8(bytes).map_err(|e| {
        SectionError::parse_failure(format!("input is not valid UTF-8: {e}"))
    })?;
    parse_blocks_with(html, options)
}

pub fn parse_blocks_with(html: &str, options: &ExtractOptions) -> Result<Vec<Block>, SectionError> {
    if html.len() > options.max_input_bytes {
        warn!(
            len = html.len(),
            max = options.max_input_bytes,
            "rejecting oversized HTML input"
        );
        return Err(SectionError::parse_failure(format!(
            "input is {} bytes, limit is {}",
            html.len(),
            options.max_input_bytes
        )));
    }
    if html.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tree = build_tree(html);
    if options.log_recoverable_errors && !tree.errors.is_empty() {
        let sample: Vec<&str> = tree
            .errors
            .iter()
            .take(MAX_LOGGED_PARSE_ERRORS)
            .map(|e| e.as_ref())
            .collect();
        debug!(count = tree.errors.len(), ?sample, "recovered from malformed HTML");
    }

    let blocks = collect_blocks(&tree.document);
    debug!(blocks = blocks.len(), "parsed block stream");
    Ok(blocks)
}

struct FlatTree {
    document: Handle,
    errors: Vec<Cow<'static, str>>,
}

// Builds the element tree straight from tokens: nothing is inserted,
// reordered or implicitly closed. An end tag closes the nearest open element
// of the same name (stray end tags are dropped) and anything still open at
// the end of input is closed there.
struct FlatTreeSink {
    open: RefCell<Vec<Handle>>,
    errors: RefCell<Vec<Cow<'static, str>>>,
}

impl FlatTreeSink {
    fn new(document: Handle) -> Self {
        Self {
            open: RefCell::new(vec![document]),
            errors: RefCell::new(Vec::new()),
        }
    }

    fn current(&self) -> Handle {
        let open = self.open.borrow();
        open[open.len() - 1].clone()
    }

    fn append(&self, child: Handle) {
        let parent = self.current();
        child.parent.set(Some(Rc::downgrade(&parent)));
        parent.children.borrow_mut().push(child);
    }

    fn append_text(&self, text: &StrTendril) {
        let parent = self.current();
        if let Some(last) = parent.children.borrow().last() {
            if let NodeData::Text { contents } = &last.data {
                contents.borrow_mut().push_tendril(text);
                return;
            }
        }
        self.append(Node::new(NodeData::Text {
            contents: RefCell::new(text.clone()),
        }));
    }

    fn start_tag(&self, tag: Tag) -> TokenSinkResult<()> {
        let lower = tag.name.to_ascii_lowercase();
        let node = Node::new(NodeData::Element {
            name: QualName::new(None, ns!(html), tag.name),
            attrs: RefCell::new(tag.attrs),
            template_contents: RefCell::new(None),
            mathml_annotation_xml_integration_point: false,
        });
        self.append(node.clone());
        if tag.self_closing || is_void(&lower) {
            return TokenSinkResult::Continue;
        }
        self.open.borrow_mut().push(node);

        match &*lower {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }

    fn end_tag(&self, tag: Tag) {
        let mut open = self.open.borrow_mut();
        let matching = open
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, h)| elem_tag_lower(h).is_some_and(|t| t.eq_ignore_ascii_case(&tag.name)))
            .map(|(i, _)| i);
        match matching {
            Some(i) => open.truncate(i),
            None => self
                .errors
                .borrow_mut()
                .push(Cow::Owned(format!("stray end tag </{}>", tag.name))),
        }
    }
}

impl TokenSink for FlatTreeSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(tag),
                TagKind::EndTag => self.end_tag(tag),
            },
            Token::CharacterTokens(text) => self.append_text(&text),
            Token::CommentToken(contents) => self.append(Node::new(NodeData::Comment { contents })),
            Token::ParseError(err) => self.errors.borrow_mut().push(err),
            Token::DoctypeToken(_) | Token::NullCharacterToken | Token::EOFToken => {}
        }
        TokenSinkResult::Continue
    }
}

fn build_tree(input: &str) -> FlatTree {
    let document = Node::new(NodeData::Document);
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(input));

    let tokenizer = Tokenizer::new(FlatTreeSink::new(document.clone()), TokenizerOpts::default());
    let _ = tokenizer.feed(&queue);
    tokenizer.end();

    let errors = tokenizer.sink.errors.take();
    FlatTree { document, errors }
}

fn elem_tag_lower(h: &Handle) -> Option<String> {
    match &h.data {
        NodeData::Element { name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

// Flat tag filter in document order: a recognized element is emitted and its
// descendants are still scanned, so a <p> inside a <td> yields both blocks.
fn collect_blocks(root: &Handle) -> Vec<Block> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if let Some(kind) = elem_tag_lower(&node).as_deref().and_then(BlockKind::from_tag) {
            let text = match kind {
                BlockKind::Image => String::new(),
                _ => visible_text(&node).trim().to_string(),
            };
            let mut rendered = String::new();
            serialize_node(&mut rendered, &node, false);
            out.push(Block {
                kind,
                text,
                rendered,
            });
        }
        for c in node.children.borrow().iter().rev() {
            stack.push(c.clone());
        }
    }

    out
}

fn visible_text(node: &Handle) -> String {
    fn walk(node: &Handle, out: &mut String) {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } | NodeData::Document => {
                for c in node.children.borrow().iter() {
                    walk(c, out);
                }
            }
            _ => {}
        }
    }

    let mut out = String::new();
    walk(node, &mut out);
    out
}

fn esc_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn esc_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn is_void(lower: &str) -> bool {
    matches!(
        lower,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(lower: &str) -> bool {
    matches!(lower, "script" | "style")
}

fn serialize_node(out: &mut String, node: &Handle, raw_text: bool) {
    match &node.data {
        NodeData::Text { contents } => {
            let t = contents.borrow();
            if raw_text {
                out.push_str(&t);
            } else {
                out.push_str(&esc_text(&t));
            }
        }
        NodeData::Comment { contents } => {
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->");
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let lower = tag.to_ascii_lowercase();
            out.push('<');
            out.push_str(&tag);
            for a in attrs.borrow().iter() {
                out.push(' ');
                if let Some(prefix) = &a.name.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&a.name.local);
                out.push_str("=\"");
                out.push_str(&esc_attr(&a.value));
                out.push('"');
            }
            if is_void(&lower) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            let raw = is_raw_text(&lower);
            for c in node.children.borrow().iter() {
                serialize_node(out, c, raw);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        NodeData::Document => {
            for c in node.children.borrow().iter() {
                serialize_node(out, c, raw_text);
            }
        }
        NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
    }
}
