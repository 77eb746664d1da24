use std::collections::BTreeMap;

use crate::Arrow;

/// What the learner has built so far in the sequence builder.
///
/// This belongs to whoever is presenting the puzzle, not to the world, so it survives resets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    sequence: Vec<Arrow>,
    functions: BTreeMap<String, Vec<Arrow>>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please create a sequence first!")]
    EmptySequence,
}

impl Session {
    pub fn push(&mut self, arrow: Arrow) {
        self.sequence.push(arrow);
    }

    pub fn sequence(&self) -> &[Arrow] {
        &self.sequence
    }

    pub fn clear_sequence(&mut self) {
        self.sequence.clear();
    }

    /// Save the current sequence under `name`, replacing any function already called that.
    pub fn save_function(&mut self, name: &str) -> Result<(), SessionError> {
        if self.sequence.is_empty() {
            return Err(SessionError::EmptySequence);
        }
        self.functions
            .insert(name.to_owned(), self.sequence.clone());
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&[Arrow]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}
