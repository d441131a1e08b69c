/// A selectable option on the setup screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

pub const LANGUAGES: &[Choice] = &[
    Choice {
        code: "es",
        label: "Spanish",
    },
    Choice {
        code: "en",
        label: "English",
    },
    Choice {
        code: "fr",
        label: "French",
    },
];

pub const LEVELS: &[Choice] = &[
    Choice {
        code: "A1",
        label: "A1 - Beginner",
    },
    Choice {
        code: "B1",
        label: "B1 - Intermediate",
    },
    Choice {
        code: "C1",
        label: "C1 - Advanced",
    },
];

pub fn index_of(choices: &[Choice], code: &str) -> Option<usize> {
    choices.iter().position(|c| c.code.eq_ignore_ascii_case(code))
}

/// Display label for a code, falling back to the code itself for values the
/// backend knows about but this client does not.
pub fn label_for<'a>(choices: &[Choice], code: &'a str) -> &'a str {
    match index_of(choices, code) {
        Some(idx) => choices[idx].label,
        None => code,
    }
}
