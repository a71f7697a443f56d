//! SakuraScript payload composition
//!
//! Only composition lives here; interpreting scripts is the host's job.
//! `\h` and `\u` select the speaking character, `\s[N]` selects a surface,
//! `\n` breaks a line, and `\e` terminates the utterance.

/// Builder for a SakuraScript utterance
#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    script: String,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to the main character (`\h`)
    pub fn scope_main(mut self) -> Self {
        self.script.push_str("\\h");
        self
    }

    /// Switch to the partner character (`\u`)
    pub fn scope_partner(mut self) -> Self {
        self.script.push_str("\\u");
        self
    }

    /// Select a surface (`\s[N]`)
    pub fn surface(mut self, surface: u32) -> Self {
        self.script.push_str(&format!("\\s[{surface}]"));
        self
    }

    /// Append spoken text, escaping backslashes so free text can never
    /// be mistaken for a command
    pub fn text(mut self, text: &str) -> Self {
        self.script.push_str(&escape_text(text));
        self
    }

    /// Line break (`\n`)
    pub fn line_break(mut self) -> Self {
        self.script.push_str("\\n");
        self
    }

    /// Terminate the utterance (`\e`) and return the script
    pub fn build(mut self) -> String {
        self.script.push_str("\\e");
        self.script
    }
}

/// Escape free text for embedding in a script
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
}

/// A single-speaker utterance: `\h\s[0]<text>\e`
pub fn plain(text: &str) -> String {
    ScriptBuilder::new()
        .scope_main()
        .surface(0)
        .text(text)
        .build()
}
