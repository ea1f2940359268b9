//! Paper assembly: executes resolved section specs against a question
//! pool, plus the alternative-question lookup used for manual swaps.

use std::collections::HashSet;

use chrono::Utc;
use rand::seq::{IndexedRandom, SliceRandom};
use schema::{GeneratedPaper, GenerationConfig, PaperSection, Question};
use tracing::trace;

use crate::blueprint::{Blueprint, SectionSpec};
use crate::error::Error;

/// Legacy fixed-template generation refuses pools smaller than this.
const MIN_LEGACY_POOL: usize = 5;

/// Assembles a paper from the configured blueprint and the fetched
/// question pool.
///
/// The section list is deterministic for a given config; question
/// content within each section is randomly sampled. Sections may hold
/// fewer questions than required when the pool runs short; that is not
/// an error and shows up as `total_pool_count < required_count`.
///
/// Fails only in legacy fixed-template mode, when the chapter-filtered
/// pool has fewer than [`MIN_LEGACY_POOL`] questions.
pub fn generate_paper(
    config: &GenerationConfig,
    pool: &[Question],
) -> Result<GeneratedPaper, Error> {
    let blueprint = Blueprint::resolve(config);

    if matches!(blueprint, Blueprint::FixedTemplate(_)) && pool.len() < MIN_LEGACY_POOL {
        return Err(Error::InsufficientPool(
            "Insufficient questions in selected chapters to generate a paper.".into(),
        ));
    }

    let specs = blueprint.section_specs(config, pool);

    let mut rng = rand::rng();
    // Local to this generation. Earlier specs claim questions first,
    // shrinking the pool for later ones.
    let mut used_ids: HashSet<String> = HashSet::new();
    let mut sections = Vec::with_capacity(specs.len());

    for spec in &specs {
        let (questions, total_pool_count) = populate_section(spec, pool, &mut used_ids, &mut rng);
        trace!(
            section = %spec.name,
            placed = questions.len(),
            required = spec.required_count,
            pool = total_pool_count,
            "populated section"
        );

        sections.push(PaperSection {
            name: spec.name.clone(),
            _type: spec.type_tag,
            description: spec.description.clone(),
            marks_per_question: spec.marks_per_question,
            required_count: spec.required_count,
            total_pool_count,
            questions,
            is_sub_question_group: spec.is_sub_question_group,
        });
    }

    // Past-year papers declare the sum of the stored marks; generated
    // papers declare the configured target.
    let total_marks = if blueprint == Blueprint::PastYear {
        sections
            .iter()
            .flat_map(|s| &s.questions)
            .map(|q| q.marks)
            .sum()
    } else {
        config.total_marks
    };

    Ok(GeneratedPaper {
        id: format!("PAPER_{}", Utc::now().timestamp_millis()),
        title: config.header_title.clone(),
        subject: config.subject.clone(),
        date: config.test_date.clone(),
        total_marks,
        time_allowed: config.time_allowed.clone(),
        sections,
    })
}

/// Executes one section spec: filters the pool by type/chapter and the
/// shared used-ID set, samples, and stamps the rule's mark value onto
/// shallow copies of the picks.
///
/// Returns the placed questions and the section's `totalPoolCount`.
/// The pool count is capped at `ceil(required × multiplier)` so the
/// report can show candidate richness beyond the required count; the
/// placed list itself never exceeds `required_count`.
pub fn populate_section<R: rand::Rng>(
    spec: &SectionSpec,
    pool: &[Question],
    used_ids: &mut HashSet<String>,
    rng: &mut R,
) -> (Vec<Question>, usize) {
    let mut candidates: Vec<&Question> = pool
        .iter()
        .filter(|q| spec.types.contains(&q._type))
        .filter(|q| match &spec.chapter_filter {
            Some(chapter) if chapter != "All" => q.chapter == *chapter,
            _ => true,
        })
        .filter(|q| !used_ids.contains(&q.id))
        .collect();

    if spec.passthrough {
        // Exact reproduction: pool order, stored marks, nothing dropped.
        for question in &candidates {
            used_ids.insert(question.id.clone());
        }
        let questions: Vec<Question> = candidates.into_iter().cloned().collect();
        let count = questions.len();
        return (questions, count);
    }

    let count_to_pick = (spec.required_count as f64 * spec.pool_multiplier).ceil() as usize;
    candidates.shuffle(rng);
    let total_pool_count = count_to_pick.min(candidates.len());

    let mut picked = Vec::new();
    for candidate in candidates.into_iter().take(spec.required_count) {
        let mut placed = candidate.clone();
        placed.marks = spec.marks_per_question;
        used_ids.insert(placed.id.clone());
        picked.push(placed);
    }

    (picked, total_pool_count)
}

/// Finds a random same-chapter, same-type replacement for a placed
/// question, skipping every ID already used anywhere in the paper.
///
/// Returns `None` when no alternative exists; callers surface that as
/// a non-blocking notice. Pure lookup: neither the pool nor any
/// used-ID set is touched, and the caller keeps the original
/// rule-assigned mark value when splicing the replacement in.
pub fn get_alternative_question(
    current: &Question,
    pool: &[Question],
    exclude_ids: &[String],
) -> Option<Question> {
    let filtered: Vec<&Question> = pool
        .iter()
        .filter(|q| {
            q.chapter == current.chapter
                && q._type == current._type
                && q.id != current.id
                && !exclude_ids.contains(&q.id)
        })
        .collect();

    let mut rng = rand::rng();
    filtered.choose(&mut rng).map(|q| (*q).clone())
}

/// Validates a generated paper for basic structural properties:
/// 1) No question placed in more than one section
/// 2) No section holding more questions than its required count
pub fn validate_paper(paper: &GeneratedPaper) -> Result<(), Error> {
    let mut q_ids: Vec<&str> = vec![];
    for section in &paper.sections {
        if section.questions.len() > section.required_count {
            return Err(Error::Generation(format!(
                "section {} holds {} questions for a required count of {}",
                section.name,
                section.questions.len(),
                section.required_count
            )));
        }
        for question in &section.questions {
            if q_ids.contains(&question.id.as_str()) {
                return Err(Error::Generation(format!(
                    "question id {} placed in more than one section",
                    question.id
                )));
            }
            q_ids.push(&question.id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::{BlueprintRule, PaperMode, SectionType};

    fn question(id: &str, chapter: &str, _type: SectionType, marks: u32) -> Question {
        Question {
            id: id.into(),
            chapter: chapter.into(),
            _type,
            marks,
            content: format!("Question {id}"),
            solution: "Solution".into(),
            ..Default::default()
        }
    }

    /// `per_type` questions of every type, chapters cycling through
    /// Algebra/Vectors/Probability.
    fn even_pool(per_type: usize) -> Vec<Question> {
        let chapters = ["Algebra", "Vectors", "Probability"];
        let mut pool = vec![];
        for _type in SectionType::ALL {
            for i in 0..per_type {
                pool.push(question(
                    &format!("{}-{i}", _type.as_str()),
                    chapters[i % chapters.len()],
                    _type,
                    1,
                ));
            }
        }
        pool
    }

    fn legacy_config(total_marks: u32) -> GenerationConfig {
        GenerationConfig {
            total_marks,
            header_title: "BOARD QUESTION PAPER : FEBRUARY 2025".into(),
            subject: "MATHEMATICS AND STATISTICS".into(),
            test_date: "FEBRUARY 2025".into(),
            time_allowed: "3 Hrs.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn eighty_mark_paper_has_board_shape() {
        let pool = even_pool(20);
        let paper = generate_paper(&legacy_config(80), &pool).unwrap();

        let names: Vec<&str> = paper.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Q.1", "Q.2", "SECTION - B", "SECTION - C", "SECTION - D"]
        );
        let required: Vec<usize> = paper.sections.iter().map(|s| s.required_count).collect();
        assert_eq!(required, [8, 4, 8, 8, 5]);
        let marks: Vec<u32> = paper
            .sections
            .iter()
            .map(|s| s.marks_per_question)
            .collect();
        assert_eq!(marks, [2, 1, 2, 3, 4]);
        assert_eq!(paper.total_marks, 80);
        assert_eq!(paper.title, "BOARD QUESTION PAPER : FEBRUARY 2025");

        // Rich pool: every section fills to its required count.
        for section in &paper.sections {
            assert_eq!(section.questions.len(), section.required_count);
        }
        // The 1.5x oversample reports 12 candidates for SECTION - B.
        assert_eq!(paper.sections[2].total_pool_count, 12);

        validate_paper(&paper).unwrap();
    }

    #[test]
    fn no_question_appears_twice_across_sections() {
        // Two rules competing for the same 10 MCQs.
        let pool: Vec<Question> = (0..10)
            .map(|i| question(&format!("m{i}"), "Algebra", SectionType::Mcq, 1))
            .collect();
        let rule = |id: &str, name: &str| BlueprintRule {
            id: id.into(),
            name: name.into(),
            _type: SectionType::Mcq,
            required_count: 6,
            marks_per_question: 2,
            chapter_filter: None,
        };
        let config = GenerationConfig {
            blueprint: vec![rule("r1", "Part I"), rule("r2", "Part II")],
            ..legacy_config(24)
        };

        let paper = generate_paper(&config, &pool).unwrap();
        assert_eq!(paper.sections[0].questions.len(), 6);
        // Second rule only gets what the first left behind.
        assert_eq!(paper.sections[1].questions.len(), 4);
        assert_eq!(paper.sections[1].total_pool_count, 4);

        let mut ids: Vec<&str> = paper
            .sections
            .iter()
            .flat_map(|s| &s.questions)
            .map(|q| q.id.as_str())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
        validate_paper(&paper).unwrap();
    }

    #[test]
    fn placed_questions_carry_rule_marks_not_stored_marks() {
        let pool = vec![
            question("v1", "Vectors", SectionType::La4, 1),
            question("v2", "Vectors", SectionType::La4, 7),
        ];
        let config = GenerationConfig {
            blueprint: vec![BlueprintRule {
                id: "r1".into(),
                name: "Section D".into(),
                _type: SectionType::La4,
                required_count: 2,
                marks_per_question: 4,
                chapter_filter: Some("Vectors".into()),
            }],
            ..legacy_config(8)
        };

        let paper = generate_paper(&config, &pool).unwrap();
        for placed in &paper.sections[0].questions {
            assert_eq!(placed.marks, 4);
        }
        // The pool entries themselves are untouched.
        assert_eq!(pool[0].marks, 1);
        assert_eq!(pool[1].marks, 7);
    }

    #[test]
    fn chapter_filter_restricts_candidates() {
        let mut pool = vec![
            question("t1", "Vectors", SectionType::La4, 4),
            question("t2", "Vectors", SectionType::La4, 4),
        ];
        for i in 0..10 {
            pool.push(question(&format!("o{i}"), "Algebra", SectionType::Sa2, 2));
        }
        let config = GenerationConfig {
            blueprint: vec![BlueprintRule {
                id: "r1".into(),
                name: "Long Answer".into(),
                _type: SectionType::La4,
                required_count: 2,
                marks_per_question: 4,
                chapter_filter: Some("Vectors".into()),
            }],
            ..legacy_config(8)
        };

        let paper = generate_paper(&config, &pool).unwrap();
        let section = &paper.sections[0];
        assert_eq!(section.questions.len(), 2);
        for q in &section.questions {
            assert_eq!(q.chapter, "Vectors");
            assert_eq!(q._type, SectionType::La4);
        }
    }

    /// "All" is a sentinel, not a chapter name.
    #[test]
    fn all_chapter_filter_means_unrestricted() {
        let pool = vec![
            question("a1", "Algebra", SectionType::Mcq, 1),
            question("b1", "Vectors", SectionType::Mcq, 1),
        ];
        let config = GenerationConfig {
            blueprint: vec![BlueprintRule {
                id: "r1".into(),
                name: "MCQs".into(),
                _type: SectionType::Mcq,
                required_count: 2,
                marks_per_question: 1,
                chapter_filter: Some("All".into()),
            }],
            ..legacy_config(2)
        };

        let paper = generate_paper(&config, &pool).unwrap();
        assert_eq!(paper.sections[0].questions.len(), 2);
    }

    #[test]
    fn short_pool_under_fills_without_error() {
        let pool = vec![
            question("m1", "Algebra", SectionType::Mcq, 1),
            question("m2", "Algebra", SectionType::Mcq, 1),
            question("m3", "Algebra", SectionType::Mcq, 1),
            question("v1", "Algebra", SectionType::Vsa, 1),
            question("v2", "Algebra", SectionType::Vsa, 1),
        ];
        let paper = generate_paper(&legacy_config(80), &pool).unwrap();

        let q1 = &paper.sections[0];
        assert_eq!(q1.questions.len(), 3);
        assert_eq!(q1.total_pool_count, 3);
        assert!(q1.total_pool_count < q1.required_count);

        // Zero matches is a valid, empty section.
        let section_b = &paper.sections[2];
        assert_eq!(section_b.questions.len(), 0);
        assert_eq!(section_b.total_pool_count, 0);
    }

    #[test]
    fn tiny_pool_fails_only_in_legacy_mode() {
        let pool = vec![
            question("m1", "Algebra", SectionType::Mcq, 1),
            question("m2", "Algebra", SectionType::Mcq, 1),
        ];

        let err = generate_paper(&legacy_config(80), &pool).unwrap_err();
        assert!(matches!(err, Error::InsufficientPool(_)));

        // The same pool is fine under a custom blueprint.
        let config = GenerationConfig {
            blueprint: vec![BlueprintRule {
                id: "r1".into(),
                name: "MCQs".into(),
                _type: SectionType::Mcq,
                required_count: 2,
                marks_per_question: 1,
                chapter_filter: None,
            }],
            ..legacy_config(2)
        };
        assert!(generate_paper(&config, &pool).is_ok());
    }

    #[test]
    fn same_config_yields_same_shape() {
        let pool = even_pool(20);
        let config = legacy_config(40);

        let first = generate_paper(&config, &pool).unwrap();
        let second = generate_paper(&config, &pool).unwrap();

        let shape = |paper: &GeneratedPaper| -> Vec<(String, usize, u32)> {
            paper
                .sections
                .iter()
                .map(|s| (s.name.clone(), s.required_count, s.marks_per_question))
                .collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }

    #[test]
    fn past_year_paper_reproduces_pool() {
        let mut pool: Vec<Question> = (0..6)
            .map(|i| {
                let mut q = question(&format!("m{i}"), "Algebra", SectionType::Mcq, 1);
                q.exam_year = Some("2023".into());
                q
            })
            .collect();
        for i in 0..4 {
            let mut q = question(&format!("v{i}"), "Vectors", SectionType::Vsa, 2);
            q.exam_year = Some("2023".into());
            pool.push(q);
        }
        let config = GenerationConfig {
            mode: PaperMode::PastYear,
            selected_year: Some("2023".into()),
            ..legacy_config(0)
        };

        let paper = generate_paper(&config, &pool).unwrap();
        assert_eq!(paper.sections.len(), 2);

        let mcq = &paper.sections[0];
        assert_eq!(mcq.name, "MCQ Section");
        assert_eq!(mcq.description, "Questions from 2023");
        assert_eq!(mcq.questions.len(), 6);
        assert_eq!(mcq.required_count, 6);
        // No shuffling: stored order survives.
        let ids: Vec<&str> = mcq.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, ["m0", "m1", "m2", "m3", "m4", "m5"]);
        // Stored marks survive too.
        assert!(mcq.questions.iter().all(|q| q.marks == 1));

        let vsa = &paper.sections[1];
        assert_eq!(vsa.name, "VSA Section");
        assert_eq!(vsa.questions.len(), 4);

        // Declared total is the sum of stored marks: 6x1 + 4x2.
        assert_eq!(paper.total_marks, 14);
    }

    #[test]
    fn alternative_matches_chapter_and_type() {
        let current = question("c1", "Logic", SectionType::Mcq, 2);
        let pool = vec![
            current.clone(),
            question("c2", "Logic", SectionType::Mcq, 2),
            question("c3", "Logic", SectionType::Sa2, 2),
            question("c4", "Matrices", SectionType::Mcq, 2),
        ];

        let alternative = get_alternative_question(&current, &pool, &[]).unwrap();
        assert_eq!(alternative.id, "c2");

        // Once the only candidate is used elsewhere, there is nothing left.
        let exclude = vec!["c2".to_string()];
        assert!(get_alternative_question(&current, &pool, &exclude).is_none());
    }

    #[test]
    fn alternative_never_returns_current_or_excluded() {
        let current = question("c1", "Logic", SectionType::Mcq, 2);
        let pool: Vec<Question> = (0..20)
            .map(|i| question(&format!("c{i}"), "Logic", SectionType::Mcq, 2))
            .collect();
        let exclude: Vec<String> = vec!["c2".into(), "c3".into()];

        for _ in 0..50 {
            let alternative = get_alternative_question(&current, &pool, &exclude).unwrap();
            assert_ne!(alternative.id, "c1");
            assert!(!exclude.contains(&alternative.id));
            assert_eq!(alternative.chapter, "Logic");
            assert_eq!(alternative._type, SectionType::Mcq);
        }
    }

    #[test]
    fn validate_paper_rejects_duplicates() {
        let placed = question("dup", "Algebra", SectionType::Mcq, 1);
        let section = |name: &str| PaperSection {
            name: name.into(),
            required_count: 1,
            total_pool_count: 1,
            questions: vec![placed.clone()],
            ..Default::default()
        };
        let paper = GeneratedPaper {
            sections: vec![section("Q.1"), section("Q.2")],
            ..Default::default()
        };

        let err = validate_paper(&paper).unwrap_err();
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn validate_paper_rejects_overfilled_sections() {
        let paper = GeneratedPaper {
            sections: vec![PaperSection {
                name: "Q.1".into(),
                required_count: 1,
                total_pool_count: 2,
                questions: vec![
                    question("a", "Algebra", SectionType::Mcq, 1),
                    question("b", "Algebra", SectionType::Mcq, 1),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(validate_paper(&paper).is_err());
    }
}
