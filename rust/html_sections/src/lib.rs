//! Split the flat HTML produced by document converters (DOCX, PDF) into
//! named, ordered sections.
//!
//! Headings are `<h1>`..`<h3>` or any paragraph whose text starts with a
//! numeric prefix such as `2.3`. Two shapes are produced from one boundary
//! rule: a title-keyed map ([`extract_sections`]) and an ordered list with
//! nesting levels ([`extract_section_list`]).

pub mod blocks;
pub mod error;
pub mod heading;
pub mod options;
pub mod payload;
pub mod reconstruct;
pub mod sections;

pub use blocks::{parse_blocks, parse_blocks_from_bytes, parse_blocks_with, Block, BlockKind};
pub use error::SectionError;
pub use heading::{classify, is_numbered_heading, Boundary, UNTITLED_SECTION};
pub use options::ExtractOptions;
pub use payload::{export_sections_json, ErrorBody, ExportRequest, UploadResponse};
pub use reconstruct::{reconstruct_document, render_section_list, slugify};
pub use sections::{
    extract_section_list, extract_section_list_with, extract_sections, extract_sections_with,
    section_list_from_blocks, sections_from_blocks, Section, SectionMap, GENERAL_SECTION,
};
