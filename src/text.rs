// Write-time token extraction: hashtag and mention arrays are derived from
// post content when the post is written, then queried by containment.

use once_cell::sync::Lazy;
use regex::Regex;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").unwrap());

/// Scan text for `#word` tokens. Tokens are lowercased and deduplicated,
/// preserving first-seen order.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    collect_tokens(&HASHTAG_RE, text)
}

/// Scan text for `@word` tokens, same normalization as hashtags.
pub fn extract_mentions(text: &str) -> Vec<String> {
    collect_tokens(&MENTION_RE, text)
}

fn collect_tokens(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for cap in re.captures_iter(text) {
        let token = cap[1].to_lowercase();
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen
}
