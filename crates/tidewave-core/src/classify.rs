//! Keyword-based intent classification.

use crate::types::Intent;

/// Terms that mark a deploy request. Checked first.
const DEPLOY_TERMS: &[&str] = &["deploy", "redeploy", "배포", "재배포"];

/// Terms that mark a health check request.
const HEALTH_TERMS: &[&str] = &["health", "status", "alive", "헬스", "상태", "살아있"];

/// Classify free text into an [`Intent`].
///
/// Case-insensitive substring match, first match wins in the order
/// Deploy > HealthCheck > Other.
pub fn classify(text: &str) -> Intent {
    let text = text.to_lowercase();
    let matches = |terms: &[&str]| terms.iter().any(|term| text.contains(term));

    if matches(DEPLOY_TERMS) {
        Intent::Deploy
    } else if matches(HEALTH_TERMS) {
        Intent::HealthCheck
    } else {
        Intent::Other
    }
}
