//! Blueprint resolution: turns a [`GenerationConfig`] into the ordered
//! list of concrete section specs the populator executes.

use schema::{BlueprintRule, GenerationConfig, PaperMode, Question, SectionType};

/// A fully resolved section rule, ready for population.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpec {
    pub name: String,
    /// Echoed onto the output section when exactly one type is accepted.
    pub type_tag: Option<SectionType>,
    pub description: String,
    pub types: Vec<SectionType>,
    pub required_count: usize,
    /// Candidate oversampling factor for pool-richness reporting.
    pub pool_multiplier: f64,
    pub marks_per_question: u32,
    /// `None` or `"All"` means no chapter restriction.
    pub chapter_filter: Option<String>,
    pub is_sub_question_group: bool,
    /// Past-year sections reproduce the stored questions verbatim:
    /// no shuffle, no mark stamping, everything placed.
    pub passthrough: bool,
}

impl SectionSpec {
    fn fixed(
        name: &str,
        description: &str,
        types: &[SectionType],
        required_count: usize,
        pool_multiplier: f64,
        marks_per_question: u32,
    ) -> Self {
        SectionSpec {
            name: name.to_string(),
            type_tag: if types.len() == 1 {
                Some(types[0])
            } else {
                None
            },
            description: description.to_string(),
            types: types.to_vec(),
            required_count,
            pool_multiplier,
            marks_per_question,
            chapter_filter: None,
            is_sub_question_group: false,
            passthrough: false,
        }
    }
}

/// One entry of a fixed template: either a standalone section rule or
/// a named group of child rules sharing a visual heading (the 80-mark
/// paper's "SECTION - A" holding Q.1 and Q.2).
enum TemplateEntry {
    Rule(SectionSpec),
    Group {
        #[allow(dead_code)]
        name: &'static str,
        rules: Vec<SectionSpec>,
    },
}

/// The three mutually exclusive resolution strategies, in priority
/// order: past-year passthrough, then a user-defined rule list, then
/// the legacy fixed templates keyed by total marks.
#[derive(Clone, Debug, PartialEq)]
pub enum Blueprint {
    PastYear,
    Custom(Vec<BlueprintRule>),
    FixedTemplate(u32),
}

impl Blueprint {
    pub fn resolve(config: &GenerationConfig) -> Self {
        if config.mode == PaperMode::PastYear {
            Blueprint::PastYear
        } else if !config.blueprint.is_empty() {
            Blueprint::Custom(config.blueprint.clone())
        } else {
            Blueprint::FixedTemplate(config.total_marks)
        }
    }

    /// Flattens the strategy into concrete section specs.
    ///
    /// Past-year resolution inspects the pool: one section per type
    /// present, sized to everything available. The other strategies
    /// ignore the pool here and leave supply questions to population.
    pub fn section_specs(&self, config: &GenerationConfig, pool: &[Question]) -> Vec<SectionSpec> {
        match self {
            Blueprint::PastYear => past_year_specs(config, pool),
            Blueprint::Custom(rules) => rules.iter().map(custom_spec).collect(),
            Blueprint::FixedTemplate(total_marks) => fixed_template(*total_marks)
                .into_iter()
                .flat_map(|entry| match entry {
                    TemplateEntry::Rule(spec) => vec![spec],
                    TemplateEntry::Group { name: _, rules } => rules
                        .into_iter()
                        .map(|mut spec| {
                            spec.is_sub_question_group = true;
                            spec
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// One section per question type present in the (year-filtered) pool,
/// in the canonical type order. `marksPerQuestion` echoes whatever the
/// first stored question carries; it is not recomputed.
fn past_year_specs(config: &GenerationConfig, pool: &[Question]) -> Vec<SectionSpec> {
    let year = config.selected_year.as_deref().unwrap_or_default();
    let mut specs = vec![];

    for _type in SectionType::ALL {
        let matching: Vec<&Question> = pool.iter().filter(|q| q._type == _type).collect();
        let Some(first) = matching.first() else {
            continue;
        };

        specs.push(SectionSpec {
            name: format!("{} Section", _type.as_str()),
            type_tag: Some(_type),
            description: format!("Questions from {year}"),
            types: vec![_type],
            required_count: matching.len(),
            pool_multiplier: 1.0,
            marks_per_question: if first.marks == 0 { 1 } else { first.marks },
            chapter_filter: None,
            is_sub_question_group: false,
            passthrough: true,
        });
    }

    specs
}

fn custom_spec(rule: &BlueprintRule) -> SectionSpec {
    SectionSpec {
        name: rule.name.clone(),
        type_tag: Some(rule._type),
        description: format!("Attempt {} questions.", rule.required_count),
        types: vec![rule._type],
        required_count: rule.required_count,
        pool_multiplier: 1.0,
        marks_per_question: rule.marks_per_question,
        chapter_filter: rule.chapter_filter.clone(),
        is_sub_question_group: false,
        passthrough: false,
    }
}

/// The hardcoded board-paper templates. Unknown totals fall back to
/// the 80-mark shape.
fn fixed_template(total_marks: u32) -> Vec<TemplateEntry> {
    use SectionType::*;

    match total_marks {
        20 => vec![
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section A",
                "MCQs & VSA (All questions compulsory)",
                &[Mcq, Vsa],
                6,
                1.0,
                1,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section B",
                "Short Answer I (Attempt any 2)",
                &[Sa2],
                2,
                1.5,
                2,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section C",
                "Short Answer II (Attempt any 2)",
                &[Sa3],
                2,
                1.5,
                3,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section D",
                "Long Answer (Attempt any 1)",
                &[La4],
                1,
                2.0,
                4,
            )),
        ],
        40 => vec![
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section A",
                "MCQs & VSA (All questions compulsory)",
                &[Mcq, Vsa],
                12,
                1.0,
                1,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section B",
                "Short Answer I (Attempt any 4)",
                &[Sa2],
                4,
                1.5,
                2,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section C",
                "Short Answer II (Attempt any 4)",
                &[Sa3],
                4,
                1.5,
                3,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "Section D",
                "Long Answer (Attempt any 2)",
                &[La4],
                2,
                2.0,
                4,
            )),
        ],
        _ => vec![
            TemplateEntry::Group {
                name: "SECTION - A",
                rules: vec![
                    SectionSpec::fixed(
                        "Q.1",
                        "Select and write the correct answer for the following multiple choice type of questions:",
                        &[Mcq],
                        8,
                        1.0,
                        2,
                    ),
                    SectionSpec::fixed(
                        "Q.2",
                        "Answer the following questions:",
                        &[Vsa],
                        4,
                        1.0,
                        1,
                    ),
                ],
            },
            TemplateEntry::Rule(SectionSpec::fixed(
                "SECTION - B",
                "Attempt any EIGHT of the following questions:",
                &[Sa2],
                8,
                1.5,
                2,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "SECTION - C",
                "Attempt any EIGHT of the following questions:",
                &[Sa3],
                8,
                1.5,
                3,
            )),
            TemplateEntry::Rule(SectionSpec::fixed(
                "SECTION - D",
                "Attempt any FIVE of the following questions:",
                &[La4],
                5,
                1.6,
                4,
            )),
        ],
    }
}
