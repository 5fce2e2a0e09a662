use anyhow::Result;
use dialoguer::{Input, theme::ColorfulTheme};

use crate::traits::Prompt;

/// Reads answers from the controlling terminal.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompt for TerminalPrompt {
    fn input(&mut self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}
