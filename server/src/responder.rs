//! Reply source for the WebSocket endpoint.
//!
//! DESIGN
//! ======
//! The development backend does not run a language model. `Responder` is the
//! seam where one would plug in; the built-in `KnowledgeBaseResponder` answers
//! from a fixed loan-product fact sheet by keyword match.

use crate::state::StoredMessage;

/// Greeting sent when a socket attaches to a session that did not exist yet.
pub const GREETING: &str = "Hello! I'm Lu, your loan sales assistant. I can help you find the right \
personal loan. What kind of loan are you interested in, or how much do you need?";

const FALLBACK_REPLY: &str = "I can help with personal, home, education and car loans, plus KYC and \
eligibility questions. Tell me how much you need and what it is for.";

#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("responder unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait Responder: Send + Sync {
    /// Produce the assistant reply to `message`. `history` holds the session
    /// transcript before `message`, oldest first.
    async fn reply(&self, history: &[StoredMessage], message: &str) -> Result<String, ResponderError>;
}

struct Fact {
    keywords: &'static [&'static str],
    text: &'static str,
}

const FACTS: &[Fact] = &[
    Fact {
        keywords: &["personal"],
        text: "Personal Loan: up to ₹5,00,000 at 10-15% over 12-60 months, for salaried applicants with a credit score of 650+.",
    },
    Fact {
        keywords: &["home", "house", "property"],
        text: "Home Loan: up to ₹50,00,000 at 7-9% over 60-360 months, for property owners with stable income.",
    },
    Fact {
        keywords: &["education", "study", "student", "students"],
        text: "Education Loan: up to ₹20,00,000 at 8-12% over 12-120 months, for students admitted to recognized institutions.",
    },
    Fact {
        keywords: &["car", "cars", "vehicle"],
        text: "Car Loan: up to ₹15,00,000 at 9-14% over 12-84 months, for new or used car purchases.",
    },
    Fact {
        keywords: &["eligible", "eligibility", "income", "age"],
        text: "Eligibility: applicants must be 21-60 years old with a minimum monthly income of ₹25,000 for personal loans.",
    },
    Fact {
        keywords: &["kyc", "document", "documents", "aadhaar", "pan"],
        text: "KYC documents: an ID proof (Aadhaar, passport or driving license), an address proof, and a PAN card.",
    },
    Fact {
        keywords: &["credit", "score", "cibil"],
        text: "Credit score: 700+ usually earns better rates; scores below 600 may lead to rejection.",
    },
    Fact {
        keywords: &["sanction", "sanctioned", "approval", "approved", "disbursement"],
        text: "Sanction: once approved, a digital sanction letter is issued; physical documents may be needed before disbursement.",
    },
];

/// Keyword lookup over the built-in fact sheet.
#[derive(Debug, Default)]
pub struct KnowledgeBaseResponder;

impl KnowledgeBaseResponder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Facts with a keyword equal to some word of `message`, in fact-sheet order.
    #[must_use]
    pub fn lookup(&self, message: &str) -> Vec<&'static str> {
        let lower = message.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        FACTS
            .iter()
            .filter(|fact| fact.keywords.iter().any(|k| words.contains(k)))
            .map(|fact| fact.text)
            .collect()
    }
}

#[async_trait::async_trait]
impl Responder for KnowledgeBaseResponder {
    async fn reply(&self, _history: &[StoredMessage], message: &str) -> Result<String, ResponderError> {
        let facts = self.lookup(message);
        if facts.is_empty() {
            return Ok(FALLBACK_REPLY.to_owned());
        }
        Ok(facts.join(" "))
    }
}

#[cfg(test)]
#[path = "responder_test.rs"]
mod tests;
