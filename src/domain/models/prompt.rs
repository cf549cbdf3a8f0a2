/// Persona given to the completion service as the `system` message.
pub const SYSTEM_PROMPT: &str = "You are a data consultant at LINKR.";

/// Sampling temperature requested for every brief.
pub const TEMPERATURE: f64 = 0.6;

/// Returned in place of the model text when the service answers without any.
pub const FALLBACK_OUTPUT: &str = "No output received from OpenAI.";

/// The eight sections every brief is asked to contain, in order.
pub const SECTIONS: [&str; 8] = [
    "About LINKR",
    "Why this company is a fit for data monetization",
    "Top 3 use cases",
    "Suggested packaging (API, export, etc.)",
    "Compliance table",
    "Revenue forecast (1-3 yrs)",
    "Schema preview",
    "2–3 LinkedIn outreach messages",
];

/// Build the `user` prompt for `domain`.
///
/// The domain is interpolated verbatim; nothing here validates or escapes it.
pub fn build_prompt(domain: &str) -> String {
    let mut prompt = format!(
        "Act as a data monetization consultant from LINKR. A company has entered the domain: {domain}. Return the following sections:\n"
    );
    for (i, section) in SECTIONS.iter().enumerate() {
        prompt.push_str(&format!("\n{}. {}", i + 1, section));
    }
    prompt
}
