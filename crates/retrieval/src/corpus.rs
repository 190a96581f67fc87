//! The built-in reference corpus.
//!
//! Shipped with the crate and embedded at seed time: five
//! marketing-trend documents and four per-channel best-practice
//! documents. Best-practice metadata carries a channel tag
//! ("instagram", "blog", "email", or "general") used by the
//! channel-preference filter.

use copymill_core::{Document, DocumentMetadata};

fn meta(
    source: Option<&str>,
    category: Option<&str>,
    channel: Option<&str>,
) -> DocumentMetadata {
    DocumentMetadata {
        source: source.map(String::from),
        category: category.map(String::from),
        channel: channel.map(String::from),
    }
}

/// Marketing-trend documents for the strategy stage.
pub fn trend_documents() -> Vec<Document> {
    vec![
        Document::new(
            "Marketing trends 2024-2025: personalization and AI.\n\
             AI-assisted personalization has become table stakes for small businesses. \
             Tailoring the message to customer data is the core move. On social media, \
             short and punchy messages perform best, and storytelling that builds an \
             emotional connection matters more than product specs.",
            meta(Some("Marketing Trends 2024"), Some("personalization"), None),
        ),
        Document::new(
            "The heart of content marketing: provide value, build trust.\n\
             Modern consumers want useful information, not plain advertising. Educational, \
             genuinely helpful content earns trust over time. Keep the message and tone \
             consistent across blog, email, and social channels, and always present a \
             solution to a problem the customer actually has.",
            meta(Some("Content Marketing Guide"), Some("value"), None),
        ),
        Document::new(
            "Social media marketing: short, intense messages.\n\
             On Instagram and similar feeds you have about three seconds to earn \
             attention. A striking first sentence, a visual hook, and a clear call to \
             action are essential. Five to ten hashtags is the sweet spot, chosen from \
             tags your target audience actually follows. Short video or image series \
             through story features also convert well.",
            meta(Some("Social Media Marketing 2024"), Some("social"), None),
        ),
        Document::new(
            "The golden rules of email marketing: subject lines and personalization.\n\
             Keep subject lines under 40 characters and lead with urgency or curiosity. \
             Including the recipient's name and reflecting their purchase history can \
             double or triple open rates. Keep the body short, mobile-friendly, and built \
             around a single clear CTA button to maximize conversion.",
            meta(Some("Email Marketing Best Practices"), Some("email"), None),
        ),
        Document::new(
            "Blog SEO: writing for search engines and humans.\n\
             Aim for at least 800 characters, put the main keyword in the title, and \
             structure the post with H2/H3 subheadings. Open with the reader's problem, \
             present the solution in the middle, and close with a call to action. \
             Internal links and links to authoritative sources lift SEO scores.",
            meta(Some("Blog SEO Guide 2024"), Some("blog"), None),
        ),
    ]
}

/// Per-channel best-practice documents for the content stage.
pub fn best_practice_documents() -> Vec<Document> {
    vec![
        Document::new(
            "Instagram caption template:\n\
             [Striking opening line]\n\
             [The problem your product or service solves]\n\
             [Two or three concrete benefits as short bullets]\n\
             [An emotional connection line]\n\
             [A clear call to action]\n\
             [5-8 relevant hashtags]",
            meta(None, Some("caption"), Some("instagram")),
        ),
        Document::new(
            "Blog post template:\n\
             Title: a number or question that sparks curiosity.\n\
             Intro: empathize with the reader's problem and state what the post delivers.\n\
             Body: three core points, each with a concrete example or how-to.\n\
             Conclusion: summarize and hand the reader a next step (CTA).",
            meta(None, Some("structure"), Some("blog")),
        ),
        Document::new(
            "Marketing email template:\n\
             Subject: under 40 characters, lead with urgency, benefit, or curiosity.\n\
             Greeting: personalized, referencing the recipient's interest.\n\
             Core message: the value you are offering, in three lines or fewer.\n\
             Benefits: three short bullet points.\n\
             One clear CTA button, plus a postscript that adds urgency.",
            meta(None, Some("template"), Some("email")),
        ),
        Document::new(
            "Copywriting formulas that work on every channel:\n\
             AIDA — Attention (striking opener), Interest (connect to the reader's \
             problem), Desire (present the solution and benefits), Action (clear CTA).\n\
             Emotional levers: fear of missing out, belonging, achievement.\n\
             Specificity beats abstraction: not \"fast shipping\" but \"ships within \
             24 hours of ordering\".",
            meta(None, Some("copywriting"), Some("general")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corpus_sizes() {
        assert_eq!(trend_documents().len(), 5);
        assert_eq!(best_practice_documents().len(), 4);
    }

    #[test]
    fn every_best_practice_has_a_channel_tag() {
        for doc in best_practice_documents() {
            assert!(doc.metadata.channel.is_some(), "untagged doc: {}", doc.content);
        }
    }

    #[test]
    fn one_general_practice_exists() {
        let general = best_practice_documents()
            .into_iter()
            .filter(|d| d.metadata.channel.as_deref() == Some("general"))
            .count();
        assert_eq!(general, 1);
    }
}
