//! Prompt cleaning

/// Verbs dropped from the start of a prompt
const LEADING_VERBS: [&str; 2] = ["generate", "create"];

/// Strip leading `generate`/`create` verbs and surrounding whitespace
///
/// A verb is only stripped when followed by whitespace, so `"generated art"`
/// is left alone. Stripping repeats until no leading verb remains, which
/// makes the function idempotent.
pub fn clean_prompt(raw: &str) -> String {
    let mut prompt = raw.trim_start();

    while let Some(rest) = strip_leading_verb(prompt) {
        prompt = rest.trim_start();
    }

    prompt.trim_end().to_string()
}

fn strip_leading_verb(prompt: &str) -> Option<&str> {
    LEADING_VERBS.iter().find_map(|verb| {
        let head = prompt.get(..verb.len())?;
        if !head.eq_ignore_ascii_case(verb) {
            return None;
        }
        let rest = &prompt[verb.len()..];
        rest.starts_with(char::is_whitespace).then_some(rest)
    })
}
