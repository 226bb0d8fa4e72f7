//! Free-Text Findings Scraper
//!
//! Last-resort extraction of hazards, regulatory citations, and
//! recommendations from unstructured model text. Used only when a stored
//! analysis predates structured stage output; the pipeline itself never
//! produces free text on the happy path.

use std::sync::LazyLock;

use regex::Regex;

static HAZARD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // Lines announcing a hazard or risk, with or without a list marker
    Regex::new(r"(?im)^\s*(?:[-*\d.]+\s*)?(?:hazard|risk)\s*[:\-]\s*(.+)$").expect("hazard regex")
});

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    // OSHA construction-standard citations like "1926.501(b)(1)" or "29 CFR 1910.23"
    Regex::new(r"(?:29\s*CFR\s*)?19(?:10|26)\.\d+(?:\([a-z0-9]+\))*").expect("citation regex")
});

static RECOMMENDATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:[-*\d.]+\s*)?(?:recommend(?:ation|ed)?|must|should)\s*[:\-]?\s*(.+)$")
        .expect("recommendation regex")
});

/// Findings scraped from unstructured analysis text
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScrapedFindings {
    pub hazards: Vec<String>,
    pub citations: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ScrapedFindings {
    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty() && self.citations.is_empty() && self.recommendations.is_empty()
    }
}

/// Scrape whatever findings the text yields. Never fails; text with no
/// recognizable structure produces an empty result.
pub fn scrape(text: &str) -> ScrapedFindings {
    let mut findings = ScrapedFindings {
        hazards: capture_lines(&HAZARD_LINE, text),
        citations: Vec::new(),
        recommendations: capture_lines(&RECOMMENDATION_LINE, text),
    };

    for citation in CITATION.find_iter(text) {
        let cited = citation.as_str().to_string();
        if !findings.citations.contains(&cited) {
            findings.citations.push(cited);
        }
    }

    findings
}

fn capture_lines(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrapes_hazard_lines() {
        let text = "Site review notes:\n\
                    - Hazard: unguarded floor opening on level 3\n\
                    Risk: crane swing radius overlaps walkway.\n";
        let findings = scrape(text);
        assert_eq!(
            findings.hazards,
            vec![
                "unguarded floor opening on level 3",
                "crane swing radius overlaps walkway"
            ]
        );
    }

    #[test]
    fn test_scrapes_osha_citations_once() {
        let text = "Violates 1926.501(b)(1). See also 29 CFR 1926.501(b)(1) and 1910.23.";
        let findings = scrape(text);
        assert!(findings.citations.iter().any(|c| c.contains("1926.501")));
        assert!(findings.citations.iter().any(|c| c.contains("1910.23")));
    }

    #[test]
    fn test_scrapes_recommendations() {
        let text = "Recommendation: install perimeter netting\nMust: brief crew on rescue plan";
        let findings = scrape(text);
        assert_eq!(findings.recommendations.len(), 2);
    }

    #[test]
    fn test_unstructured_text_yields_empty() {
        assert!(scrape("The weather was pleasant all afternoon.").is_empty());
    }
}
