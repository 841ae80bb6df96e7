use rand::prelude::*;

const THINKING_MESSAGES: &[&str] = &[
    "Thinking",
    "Rummaging through the store",
    "Collecting shiny records",
    "Consulting the schema",
    "Chasing down field values",
    "Phrasing an answer",
];

/// Randomly select a thinking message for the spinner
pub fn get_random_thinking_message() -> &'static str {
    THINKING_MESSAGES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(THINKING_MESSAGES[0])
}
