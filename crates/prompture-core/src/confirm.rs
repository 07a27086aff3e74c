use std::cell::RefCell;
use std::collections::VecDeque;

/// Interactive yes/no capability injected into every stage that can prompt.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Approves everything without prompting. Selected by `--force`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(%message, "auto-confirmed");
        true
    }
}

/// Replays a fixed sequence of answers and records every question asked.
/// Once the script runs out every further question is declined.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: RefCell<VecDeque<bool>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self::new([])
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.asked.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_in_order_then_declines() {
        let c = ScriptedConfirm::new([true, false]);
        assert!(c.confirm("one?"));
        assert!(!c.confirm("two?"));
        assert!(!c.confirm("three?"));
        assert_eq!(c.asked(), vec!["one?", "two?", "three?"]);
    }

    #[test]
    fn auto_confirm_always_approves() {
        assert!(AutoConfirm.confirm("anything?"));
    }
}
