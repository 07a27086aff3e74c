use prompture_core::confirm::{AutoConfirm, Confirm};

/// Asks on the terminal. Defaults to "no"; a prompt that cannot be shown
/// (no TTY, closed stdin) counts as declined.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        match dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt unavailable, treating as no");
                false
            }
        }
    }
}

/// `--force` answers yes to everything; otherwise ask.
pub fn confirmer(force: bool) -> Box<dyn Confirm> {
    if force {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalConfirm)
    }
}
