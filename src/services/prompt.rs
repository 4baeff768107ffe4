use crate::models::PreferenceProfile;

/// How many titles the generative service is asked for
pub const SUGGESTION_COUNT: usize = 12;

/// Renders the instruction sent to the generative service.
///
/// Pure function: equal profiles produce byte-identical prompts, so tests
/// can assert on exact output. Only non-empty preference fields are
/// enumerated, always in the same order (genres, actors, directors, free
/// text). One profile means solo mode; two means the model is told to
/// balance both rather than average them.
pub fn build_prompt(profiles: &[PreferenceProfile]) -> String {
    let mut prompt = format!(
        "Act as a film expert. Recommend {} popular, broadly known movies, \
         without limiting by release year. ",
        SUGGESTION_COUNT
    );

    match profiles {
        [profile] => {
            prompt.push_str("My preferences: ");
            push_profile_fields(&mut prompt, profile);
        }
        [first, second, ..] => {
            prompt.push_str("We are two people looking for movies we can watch together. ");
            prompt.push_str("Person 1 preferences: ");
            push_profile_fields(&mut prompt, first);
            prompt.push_str("Person 2 preferences: ");
            push_profile_fields(&mut prompt, second);
            prompt.push_str(
                "Find movies that balance both sets of tastes rather than averaging them. ",
            );
        }
        [] => {}
    }

    prompt.push_str(
        "\n\nReturn ONLY valid JSON (application/json), exactly in this format:\n\
         {\n  \"movies\": [\n    { \"title\": \"Movie Name\" },\n    { \"title\": \"Another Movie\" }\n  ]\n}\n\
         Rules: every item MUST contain a 'title' field (string). \
         The 'year' field is OPTIONAL; include it only when certain.",
    );

    prompt
}

fn push_profile_fields(prompt: &mut String, profile: &PreferenceProfile) {
    if !profile.genres.is_empty() {
        prompt.push_str(&format!("Genres: {}. ", profile.genres.join(", ")));
    }
    if !profile.actors.is_empty() {
        prompt.push_str(&format!("Actors: {}. ", profile.actors.join(", ")));
    }
    if !profile.directors.is_empty() {
        prompt.push_str(&format!("Directors: {}. ", profile.directors.join(", ")));
    }
    if let Some(free_text) = &profile.free_text {
        prompt.push_str(&format!("Other preferences: {}. ", free_text));
    }
}
