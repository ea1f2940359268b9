//! Shared wire types for the paper generation services.
//!
//! Field names follow the JSON shapes the web frontend stores and
//! submits (camelCase, `type` discriminators), so every crate in the
//! workspace serializes the exact same documents.

use serde::{Deserialize, Serialize};

/// The fixed question-type enumeration used by every blueprint.
///
/// `ALL` carries the canonical ordering: past-year papers emit one
/// section per type in this order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    #[default]
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "VSA")]
    Vsa,
    #[serde(rename = "SA_2")]
    Sa2,
    #[serde(rename = "SA_3")]
    Sa3,
    #[serde(rename = "LA_4")]
    La4,
}

impl SectionType {
    pub const ALL: [SectionType; 5] = [
        SectionType::Mcq,
        SectionType::Vsa,
        SectionType::Sa2,
        SectionType::Sa3,
        SectionType::La4,
    ];

    /// The wire/display label, matching the serde rename.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Mcq => "MCQ",
            SectionType::Vsa => "VSA",
            SectionType::Sa2 => "SA_2",
            SectionType::Sa3 => "SA_3",
            SectionType::La4 => "LA_4",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// One stored bank entry. Read-only to the generator: placed copies
/// get their `marks` overridden, the bank record never changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub chapter: String,
    #[serde(rename = "type")]
    pub _type: SectionType,
    pub marks: u32,
    pub difficulty: Difficulty,
    /// May embed markup/math.
    pub content: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    pub solution: String,
    #[serde(rename = "examYear", default)]
    pub exam_year: Option<String>,
}

/// A user-defined section rule for custom-blueprint generation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintRule {
    pub id: String,
    /// e.g. "Section A - MCQ"
    pub name: String,
    #[serde(rename = "type")]
    pub _type: SectionType,
    #[serde(rename = "requiredCount")]
    pub required_count: usize,
    #[serde(rename = "marksPerQuestion")]
    pub marks_per_question: u32,
    /// "All" or a specific chapter name.
    #[serde(rename = "chapterFilter", default)]
    pub chapter_filter: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperMode {
    #[default]
    #[serde(rename = "generator")]
    Generator,
    #[serde(rename = "past_year")]
    PastYear,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyFocus {
    #[default]
    Standard,
    Easy,
    Challenging,
}

/// Everything the frontend form submits for one generation request.
///
/// Only `mode`, `blueprint`, `totalMarks`, the header fields, and
/// `selectedYear` steer the generator; the watermark/font fields are
/// presentation state that round-trips untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub mode: PaperMode,
    pub class: String,
    #[serde(rename = "selectedYear", default)]
    pub selected_year: Option<String>,
    #[serde(rename = "selectedChapters")]
    pub selected_chapters: Vec<String>,
    #[serde(rename = "totalMarks")]
    pub total_marks: u32,
    #[serde(rename = "difficultyFocus")]
    pub difficulty_focus: DifficultyFocus,
    #[serde(rename = "headerTitle")]
    pub header_title: String,
    #[serde(rename = "subHeader")]
    pub sub_header: String,
    #[serde(rename = "testDate")]
    pub test_date: String,
    #[serde(rename = "printTimestamp")]
    pub print_timestamp: String,
    pub watermark: String,
    #[serde(rename = "watermarkImage", default)]
    pub watermark_image: Option<String>,
    #[serde(rename = "watermarkRotation")]
    pub watermark_rotation: f64,
    #[serde(rename = "watermarkOpacity")]
    pub watermark_opacity: f64,
    pub subject: String,
    #[serde(rename = "timeAllowed")]
    pub time_allowed: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "showExamYear")]
    pub show_exam_year: bool,
    #[serde(rename = "fontSize")]
    pub font_size: u32,
    #[serde(default)]
    pub blueprint: Vec<BlueprintRule>,
}

/// One logical grouping of placed questions in the output paper.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperSection {
    pub name: String,
    /// Present when the section accepts exactly one question type.
    #[serde(rename = "type", default)]
    pub _type: Option<SectionType>,
    pub description: String,
    #[serde(rename = "marksPerQuestion")]
    pub marks_per_question: u32,
    /// Target count from the rule; the section may hold fewer.
    #[serde(rename = "requiredCount")]
    pub required_count: usize,
    /// Count actually placed.
    #[serde(rename = "totalPoolCount")]
    pub total_pool_count: usize,
    pub questions: Vec<Question>,
    /// Member of a visually grouped sub-question cluster (Q.1/Q.2).
    #[serde(rename = "isSubQuestionGroup", default)]
    pub is_sub_question_group: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPaper {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub date: String,
    #[serde(rename = "totalMarks")]
    pub total_marks: u32,
    #[serde(rename = "timeAllowed")]
    pub time_allowed: String,
    pub sections: Vec<PaperSection>,
}
