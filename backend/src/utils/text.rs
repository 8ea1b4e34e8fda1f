// src/utils/text.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::models::topic::LegalTopic;

/// Longest title taken from the head of a question.
const TITLE_MAX_CHARS: usize = 100;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]").unwrap());

/// Keywords scored per topic when categorizing a board question.
fn topic_keywords(topic: LegalTopic) -> &'static [&'static str] {
    match topic {
        LegalTopic::ConstitutionalRightsAndRemedies => &[
            "constitution", "rights", "freedom", "speech", "religion", "amendment",
            "civil rights", "discrimination", "equal protection", "voting",
        ],
        LegalTopic::CriminalJusticeSystem => &[
            "criminal", "crime", "arrest", "police", "jail", "trial", "felony",
            "misdemeanor", "warrant", "sentence", "probation", "parole",
        ],
        LegalTopic::FamilyAndPersonalLaws => &[
            "divorce", "custody", "marriage", "child support", "alimony", "adoption",
            "will", "estate", "inheritance", "guardianship",
        ],
        LegalTopic::PropertyAndContractBasics => &[
            "property", "contract", "lease", "mortgage", "deed", "title", "landlord",
            "tenant", "agreement", "breach", "real estate", "sale",
        ],
        LegalTopic::ConsumerAndDigitalProtection => &[
            "consumer", "digital", "online", "scam", "fraud", "privacy", "data",
            "internet", "warranty", "return", "refund", "identity theft",
        ],
        LegalTopic::EmploymentAndLabourRights => &[
            "employment", "job", "workplace", "discrimination", "harassment", "overtime",
            "wages", "termination", "firing", "union", "worker", "compensation",
        ],
        LegalTopic::EverydayLegalProcedures => &[
            "procedure", "sue", "lawsuit", "small claims", "court", "legal aid",
            "notary", "document", "filing", "representation", "lawyer",
        ],
    }
}

/// Picks the topic whose keywords occur most often (substring match, case-insensitive).
///
/// Ties go to the topic declared first. No hits at all means
/// `EverydayLegalProcedures`.
pub fn categorize_legal_topic(question: &str) -> LegalTopic {
    let lower = question.to_lowercase();

    let mut best = LegalTopic::EverydayLegalProcedures;
    let mut best_score = 0;

    for topic in LegalTopic::ALL {
        let score = topic_keywords(topic)
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count();
        if score > best_score {
            best_score = score;
            best = topic;
        }
    }

    best
}

/// Derives a thread title from the question body.
///
/// The first sentence is used when it ends within the first 100 characters.
/// Otherwise the first 100 characters are taken and `...` is appended unless
/// they already end with a period.
pub fn extract_title(content: &str) -> String {
    if let Some(m) = SENTENCE_END.find(content) {
        let end_chars = content[..m.start()].chars().count();
        if end_chars > 0 && end_chars < TITLE_MAX_CHARS {
            return content[..m.end()].to_string();
        }
    }

    let head: String = content.chars().take(TITLE_MAX_CHARS).collect();
    if head.ends_with('.') {
        head
    } else {
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_by_keyword_count() {
        assert_eq!(
            categorize_legal_topic("My landlord kept the deposit after the lease ended"),
            LegalTopic::PropertyAndContractBasics
        );
        assert_eq!(
            categorize_legal_topic("The POLICE made an arrest without a warrant"),
            LegalTopic::CriminalJusticeSystem
        );
        assert_eq!(
            categorize_legal_topic("Is overtime mandatory at my job?"),
            LegalTopic::EmploymentAndLabourRights
        );
    }

    #[test]
    fn unknown_text_defaults_to_everyday_procedures() {
        assert_eq!(
            categorize_legal_topic("hello there"),
            LegalTopic::EverydayLegalProcedures
        );
    }

    #[test]
    fn ties_go_to_earlier_topic() {
        // "discrimination" appears under both constitutional and employment topics.
        assert_eq!(
            categorize_legal_topic("discrimination"),
            LegalTopic::ConstitutionalRightsAndRemedies
        );
    }

    #[test]
    fn title_is_first_sentence() {
        assert_eq!(
            extract_title("Can I break my lease early? My landlord refuses."),
            "Can I break my lease early?"
        );
    }

    #[test]
    fn long_first_sentence_is_truncated() {
        let content = "a".repeat(150) + ".";
        let title = extract_title(&content);
        assert_eq!(title, format!("{}...", "a".repeat(100)));
    }

    #[test]
    fn short_text_without_terminator_gets_ellipsis() {
        assert_eq!(extract_title("what are my rights"), "what are my rights...");
    }

    #[test]
    fn leading_terminator_falls_back_to_prefix() {
        assert_eq!(extract_title("?help"), "?help...");
    }
}
