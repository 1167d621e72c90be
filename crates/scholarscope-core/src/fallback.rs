//! Placeholder content used when a provider is unreachable or returns nothing.
//!
//! Every generator is infallible and interpolates the query into its text so
//! a run always has something to show. Numeric filler (citation counts,
//! patent numbers) is drawn from the injected [`RandomSource`].

use chrono::{Datelike, Duration, NaiveDate};

use crate::model::{NewsItem, Patent, Query, ResearchPaper, ResearchSummary};
use crate::random::RandomSource;

pub const FALLBACK_PAPER_COUNT: usize = 2;
pub const FALLBACK_PATENT_COUNT: usize = 1;
pub const FALLBACK_NEWS_COUNT: usize = 2;

/// Random US-style patent number, `US1000000`..=`US9999999`.
pub(crate) fn synthetic_patent_number(rng: &dyn RandomSource) -> String {
    format!("US{}", rng.in_range(1_000_000, 9_000_000))
}

pub fn papers(query: &Query, today: NaiveDate, rng: &dyn RandomSource) -> Vec<ResearchPaper> {
    let year = today.year();
    vec![
        ResearchPaper {
            title: format!("Advanced Methods in {query}: A Comprehensive Review"),
            authors: vec!["Dr. Sarah Johnson".into(), "Prof. Michael Chen".into()],
            abstract_text: format!(
                "This comprehensive review examines the current state and future prospects of {query}, analyzing recent developments and identifying key challenges in the field. We present a systematic analysis of methodologies and their applications."
            ),
            publication_date: year.to_string(),
            journal: "Nature Reviews".into(),
            citation_count: rng.in_range(50, 300),
            url: "#".into(),
            doi: Some(format!("10.1038/s41586-{year}-0001-x")),
        },
        ResearchPaper {
            title: format!("Innovations in {query}: Recent Breakthroughs and Applications"),
            authors: vec!["Dr. Emily Rodriguez".into(), "Dr. James Wilson".into()],
            abstract_text: format!(
                "Recent innovations in {query} have opened new possibilities for practical applications. This study presents novel approaches and demonstrates their effectiveness through experimental validation."
            ),
            publication_date: (year - 1).to_string(),
            journal: "Science".into(),
            citation_count: rng.in_range(30, 200),
            url: "#".into(),
            doi: Some(format!("10.1126/science.{}.001", year - 1)),
        },
    ]
}

pub fn patents(query: &Query, today: NaiveDate, rng: &dyn RandomSource) -> Vec<Patent> {
    vec![Patent {
        title: format!("System and Method for {query} Enhancement"),
        inventors: vec!["Dr. Alex Thompson".into(), "Dr. Maria Garcia".into()],
        abstract_text: format!(
            "A novel system and method for enhancing {query} through innovative technological approaches. The invention provides improved efficiency and accuracy in {query} applications."
        ),
        patent_number: synthetic_patent_number(rng),
        publication_date: today.year().to_string(),
        assignee: "Innovation Technologies Inc.".into(),
        url: "#".into(),
    }]
}

pub fn news(query: &Query, today: NaiveDate) -> Vec<NewsItem> {
    let dated = |days_back: i64| (today - Duration::days(days_back)).format("%Y-%m-%d").to_string();
    vec![
        NewsItem {
            title: format!("Major Breakthrough in {query} Research Announced"),
            summary: format!(
                "Researchers have announced a significant breakthrough in {query} that could revolutionize the field. The new findings demonstrate improved efficiency and novel applications."
            ),
            source: "Science Daily".into(),
            published_date: dated(0),
            url: "#".into(),
            relevance_score: 95,
        },
        NewsItem {
            title: format!("New Study Reveals Promising Results in {query}"),
            summary: format!(
                "A comprehensive study has revealed promising results in {query} research, showing potential for real-world applications and commercial development."
            ),
            source: "Research News".into(),
            published_date: dated(3),
            url: "#".into(),
            relevance_score: 88,
        },
    ]
}

/// Broad subject area a query is filed under when choosing related fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicBucket {
    ArtificialIntelligence,
    Medical,
    Technology,
    Science,
}

const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial",
    "intelligence",
    "machine",
    "learning",
    "neural",
    "deep",
];
const MEDICAL_KEYWORDS: &[&str] = &[
    "medical",
    "health",
    "healthcare",
    "medicine",
    "clinical",
    "patient",
    "disease",
];
const TECHNOLOGY_KEYWORDS: &[&str] = &["technology", "software", "algorithm", "data", "digital"];

impl TopicBucket {
    /// Classify by whole-word keyword match; first matching bucket wins.
    pub fn classify(query: &str) -> Self {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        let mentions = |keywords: &[&str]| words.iter().any(|word| keywords.contains(word));

        if mentions(AI_KEYWORDS) {
            Self::ArtificialIntelligence
        } else if mentions(MEDICAL_KEYWORDS) {
            Self::Medical
        } else if mentions(TECHNOLOGY_KEYWORDS) {
            Self::Technology
        } else {
            Self::Science
        }
    }

    pub fn related_fields(&self) -> &'static [&'static str] {
        match self {
            Self::ArtificialIntelligence => &[
                "Computer Science",
                "Data Science",
                "Robotics",
                "Cognitive Science",
                "Statistics",
            ],
            Self::Medical => &[
                "Biomedical Engineering",
                "Clinical Research",
                "Pharmacology",
                "Public Health",
                "Biotechnology",
            ],
            Self::Technology => &[
                "Software Engineering",
                "Information Systems",
                "Cybersecurity",
                "Human-Computer Interaction",
                "Systems Design",
            ],
            Self::Science => &[
                "Applied Mathematics",
                "Engineering",
                "Physics",
                "Chemistry",
                "Biology",
            ],
        }
    }
}

pub fn summary(query: &Query) -> ResearchSummary {
    let bucket = TopicBucket::classify(query.as_str());
    ResearchSummary {
        overview: format!(
            "Research in {query} represents a rapidly evolving field with significant implications for both theoretical understanding and practical applications. Current investigations focus on advancing methodologies, improving efficiency, and addressing real-world challenges. The field has seen substantial growth in recent years, with researchers exploring innovative approaches and interdisciplinary collaborations to push the boundaries of knowledge."
        ),
        key_findings: vec![
            format!("Recent studies in {query} show promising results with improved accuracy and efficiency"),
            format!("Interdisciplinary approaches are proving effective in advancing {query} research"),
            format!("New methodologies in {query} are addressing previously unsolved challenges"),
            format!("The field of {query} is experiencing rapid growth with increased funding and interest"),
        ],
        future_directions: vec![
            format!("Integration of advanced technologies to enhance {query} research capabilities"),
            format!("Development of more robust and scalable approaches in {query}"),
            format!("Exploration of ethical implications and responsible development in {query}"),
            format!("Cross-disciplinary collaboration to expand {query} applications"),
        ],
        related_fields: bucket
            .related_fields()
            .iter()
            .map(|field| field.to_string())
            .collect(),
    }
}
