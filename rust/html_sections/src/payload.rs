// JSON bodies exchanged with the upload/export endpoints.

use crate::blocks::parse_blocks_from_bytes;
use crate::error::SectionError;
use crate::options::ExtractOptions;
use crate::sections::{extract_sections_with, sections_from_blocks, SectionMap};
use serde::{Deserialize, Serialize};

/// Body returned after a document has been converted to HTML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub content: String,
    pub sections: SectionMap,
}

impl UploadResponse {
    pub fn from_html(html: impl Into<String>) -> Result<Self, SectionError> {
        Self::from_html_with(html, &ExtractOptions::default())
    }

    pub fn from_html_with(
        html: impl Into<String>,
        options: &ExtractOptions,
    ) -> Result<Self, SectionError> {
        let content = html.into();
        let sections = extract_sections_with(&content, options)?;
        Ok(Self { content, sections })
    }

    /// Same as [`UploadResponse::from_html_with`] for raw converter output;
    /// bytes that are not UTF-8 fail with `ParseFailure`.
    pub fn from_bytes(bytes: &[u8], options: &ExtractOptions) -> Result<Self, SectionError> {
        let blocks = parse_blocks_from_bytes(bytes, options)?;
        Ok(Self {
            content: String::from_utf8_lossy(bytes).into_owned(),
            sections: sections_from_blocks(&blocks),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub html: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&SectionError> for ErrorBody {
    fn from(e: &SectionError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

/// Handle an export body (`{"html": "..."}`) and return the section map as a
/// JSON object in section order.
pub fn export_sections_json(body: &str) -> Result<String, SectionError> {
    export_sections_json_with(body, &ExtractOptions::default())
}

pub fn export_sections_json_with(
    body: &str,
    options: &ExtractOptions,
) -> Result<String, SectionError> {
    let request: ExportRequest = serde_json::from_str(body)?;
    if request.html.is_empty() {
        return Err(SectionError::EmptyHtml);
    }
    let sections = extract_sections_with(&request.html, options)?;
    Ok(serde_json::to_string(&sections)?)
}
