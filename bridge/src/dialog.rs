//! Built-in dialog line sets
//!
//! These are the lines the bridge speaks until a real script engine sits
//! behind it. Selection rotates per event so repeated requests do not
//! sound like a broken record, while the first line of each set stays
//! deterministic for the host's smoke tests.

/// Greetings for `OnBoot`
pub const GREETINGS: &[&str] = &[
    "Hello again. Ready when you are.",
    "Welcome back.",
    "Good to see you.",
    "Another day, another desktop.",
];

/// First-run greeting for `OnFirstBoot`
pub const FIRST_BOOT: &str = "Nice to meet you. I live on your desktop now.";

/// Farewells for `OnClose`
pub const FAREWELLS: &[&str] = &[
    "See you later.",
    "Closing up. Take care.",
    "Until next time.",
];

/// Reactions for `OnMouseClick`
pub const CLICK_REACTIONS: &[&str] = &[
    "That tickles.",
    "Yes? I'm listening.",
    "Careful with the cursor.",
    "Was that on purpose?",
];

/// Idle talk for `OnRandom` / `OnAiTalk`
pub const IDLE_TALK: &[&str] = &[
    "Quiet day, isn't it.",
    "I wonder what's in the news.",
    "Don't forget to stretch once in a while.",
    "If you need me, just click.",
];

/// Hourly chime for `OnMinuteChange` at minute zero
pub const CHIME: &str = "On the hour, right on time.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sets_are_nonempty() {
        for set in [GREETINGS, FAREWELLS, CLICK_REACTIONS, IDLE_TALK] {
            assert!(!set.is_empty());
            assert!(set.iter().all(|line| !line.is_empty()));
        }
    }
}
