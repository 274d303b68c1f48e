use crate::blocks::{parse_blocks_with, Block};
use crate::error::SectionError;
use crate::heading::classify;
use crate::options::ExtractOptions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Title of the implicit section holding content that precedes any heading.
pub const GENERAL_SECTION: &str = "General";

/// Section title -> concatenated content, in first-occurrence order.
pub type SectionMap = IndexMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// 0 for the implicit leading section, 1..=3 for heading tags, dot count + 1
    /// for numbered paragraphs.
    pub level: u32,
    pub content: String,
}

impl Section {
    fn general() -> Self {
        Self {
            title: GENERAL_SECTION.to_string(),
            level: 0,
            content: String::new(),
        }
    }
}

pub fn extract_sections(html: &str) -> Result<SectionMap, SectionError> {
    extract_sections_with(html, &ExtractOptions::default())
}

pub fn extract_sections_with(
    html: &str,
    options: &ExtractOptions,
) -> Result<SectionMap, SectionError> {
    let blocks = parse_blocks_with(html, options)?;
    let map = sections_from_blocks(&blocks);
    debug!(sections = map.len(), "extracted section map");
    Ok(map)
}

pub fn extract_section_list(html: &str) -> Result<Vec<Section>, SectionError> {
    extract_section_list_with(html, &ExtractOptions::default())
}

pub fn extract_section_list_with(
    html: &str,
    options: &ExtractOptions,
) -> Result<Vec<Section>, SectionError> {
    let blocks = parse_blocks_with(html, options)?;
    let list = section_list_from_blocks(&blocks);
    debug!(sections = list.len(), "extracted section list");
    Ok(list)
}

/// Map form. A repeated title keeps accumulating into its existing entry
/// instead of starting a second one.
pub fn sections_from_blocks(blocks: &[Block]) -> SectionMap {
    let (map, _) = blocks.iter().fold(
        (SectionMap::new(), GENERAL_SECTION.to_string()),
        |(mut map, current), block| match classify(block) {
            Some(boundary) => {
                trace!(title = %boundary.title, "section boundary");
                map.entry(boundary.title.clone()).or_default();
                (map, boundary.title)
            }
            None => {
                map.entry(current.clone())
                    .or_default()
                    .push_str(&block.rendered);
                (map, current)
            }
        },
    );
    map
}

/// List form. Every boundary opens a new record, duplicates included.
pub fn section_list_from_blocks(blocks: &[Block]) -> Vec<Section> {
    blocks.iter().fold(Vec::new(), |mut list: Vec<Section>, block| {
        match classify(block) {
            Some(boundary) => {
                trace!(title = %boundary.title, level = boundary.level, "section boundary");
                list.push(Section {
                    title: boundary.title,
                    level: boundary.level,
                    content: String::new(),
                });
            }
            None => {
                if list.is_empty() {
                    list.push(Section::general());
                }
                if let Some(current) = list.last_mut() {
                    current.content.push_str(&block.rendered);
                }
            }
        }
        list
    })
}
