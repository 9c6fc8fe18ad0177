/// Server-confirmed prompts a modify request extends, oldest first.
///
/// The history is append-only. `clear` only detaches the cursor, so a fresh
/// generate after a story still leaves earlier prompts inspectable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationChain {
    prompts: Vec<String>,
    cursor: Option<usize>,
}

impl ModificationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_head<T: Into<String>>(&mut self, prompt: T) {
        self.prompts.push(prompt.into());
        self.cursor = Some(self.prompts.len() - 1);
    }

    pub fn head(&self) -> Option<&str> {
        self.cursor
            .and_then(|index| self.prompts.get(index))
            .map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.cursor = None;
    }

    pub fn history(&self) -> &[String] {
        &self.prompts
    }
}
