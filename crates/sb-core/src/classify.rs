//! Classification with a static fallback: submission never waits on, or
//! fails because of, the classifier.

use crate::models::Analysis;
use crate::traits::Classifier;

/// Lowercases and trims tags, dropping empties and repeats.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

pub async fn classify_or_fallback(
    classifier: Option<&dyn Classifier>,
    title: &str,
    description: &str,
) -> Analysis {
    let Some(classifier) = classifier else {
        log::warn!("No classifier configured, using default analysis");
        return Analysis::unconfigured();
    };

    match classifier.analyze(title, description).await {
        Ok(analysis) => Analysis {
            tags: normalize_tags(&analysis.tags),
            ..analysis
        },
        Err(e) => {
            log::error!("Error analyzing suggestion: {:#}", e);
            Analysis::failed()
        }
    }
}
