use serde::{Deserialize, Serialize};

/// Structured recommendation returned by the remote analysis function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub garment_description: String,
    pub style: String,
    pub color_palette: Vec<String>,
    pub accessories: Vec<Accessory>,
    pub styling_tips: Vec<String>,
    pub occasion_match: Vec<String>,
}

/// A recommended complementary item.
///
/// `category` is soft-enumerated (Jewelry, Bag, Shoes, ...) and kept as free text;
/// unknown categories are rendered with a fallback glyph rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    pub category: String,
    pub name: String,
    pub description: String,
    pub color_suggestion: String,
}

/// Request body sent to the remote analysis function.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_base64: String,
}
