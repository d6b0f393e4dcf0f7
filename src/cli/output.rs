use console::{style, Color};

pub struct OutputFormatter {
    use_colors: bool,
}

impl OutputFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn banner(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.style_text("Parley chatbot ready!", Color::Cyan),
            "Type 'quit' or 'exit' to leave.",
            "-".repeat(70)
        )
    }

    pub fn user_prompt(&self) -> String {
        format!("{} ", self.style_text("You:", Color::Green))
    }

    pub fn format_reply(&self, reply: &str) -> String {
        format!("{} {}", self.style_text("Bot:", Color::Cyan), reply)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_text("Error:", Color::Red), message)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_text("✓", Color::Green), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_text("⚠", Color::Yellow), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_text("ℹ", Color::Blue), message)
    }

    fn style_text(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).to_string()
        } else {
            text.to_string()
        }
    }
}
