// src/runner/prompt.rs
// Confirmation prompt detection

/// Substrings that mark a line as a yes/no prompt, matched case-insensitively.
pub const PROMPT_TRIGGERS: [&str; 4] = [
    "ok to proceed",
    "do you want to continue",
    "(y/n)",
    "[y/n]",
];

/// Return the first trigger contained in `line`, if any.
pub fn detect_prompt(line: &str) -> Option<&'static str> {
    let lowered = line.to_lowercase();
    PROMPT_TRIGGERS
        .iter()
        .copied()
        .find(|trigger| lowered.contains(trigger))
}
