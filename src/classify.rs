/// Marker phrases seeded into placeholder rows by earlier content passes.
const PLACEHOLDER_MARKERS: [&str; 3] = [
    "sample question",
    "please add content",
    "sample explanation",
];

/// True when the prompt or explanation carries a known placeholder marker.
/// Substring match, case-insensitive. A legitimate question containing a
/// marker phrase is misclassified; the heuristic only guarantees detection
/// of intentionally seeded rows.
pub fn is_placeholder(prompt: &str, explanation: &str) -> bool {
    let prompt = prompt.to_lowercase();
    let explanation = explanation.to_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .any(|m| prompt.contains(m) || explanation.contains(m))
}
