// Shared prompt fragments. Each feature keeps its own prompts next to its handlers.

/// Keeps model output pasteable into a plain-text document.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Respond with the document text only. \
    Do NOT use markdown code fences. \
    Do NOT add commentary before or after the document.";
