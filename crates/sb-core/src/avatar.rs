//! Inline SVG avatars, encoded as `data:` URIs.

use base64::Engine;
use sha2::{Digest, Sha256};

const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

const ANONYMOUS_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="40" height="40"><rect width="100" height="100" fill="#64748b" /><path d="M50 55C38.954 55 30 63.954 30 75V80H70V75C70 63.954 61.046 55 50 55ZM50 25C41.716 25 35 31.716 35 40C35 48.284 41.716 55 50 55C58.284 55 65 48.284 65 40C65 31.716 58.284 25 50 25Z" fill="#cbd5e1"/></svg>"##;

/// Hue in `0..360` derived from a SHA-256 of the seed.
fn hue_for(seed: &str) -> u16 {
    let digest = Sha256::digest(seed.as_bytes());
    u16::from_be_bytes([digest[0], digest[1]]) % 360
}

fn initial_for(seed: &str) -> String {
    let initial: String = seed
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    match initial.as_str() {
        "&" => "&amp;".to_string(),
        "<" => "&lt;".to_string(),
        ">" => "&gt;".to_string(),
        _ => initial,
    }
}

fn encode(svg: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg.as_bytes());
    format!("{DATA_URI_PREFIX}{encoded}")
}

/// Coloured circle with the seed's initial. Same seed, same avatar.
pub fn generate_avatar(seed: &str) -> String {
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100" width="40" height="40"><rect width="100" height="100" fill="hsl({hue}, 75%, 60%)" /><text x="50" y="55" font-family="Arial, sans-serif" font-size="50" fill="#fff" text-anchor="middle" dominant-baseline="middle">{initial}</text></svg>"##,
        hue = hue_for(seed),
        initial = initial_for(seed),
    );
    encode(&svg)
}

/// Fixed silhouette for anonymous submissions.
pub fn anonymous_avatar() -> String {
    encode(ANONYMOUS_SVG)
}
