use crate::error::TidyError;

use dialoguer::{Confirm, theme::ColorfulTheme};

/// Abstraction over a boolean (yes/no) confirmation prompt.
///
/// This trait allows interactive confirmation to be injected or mocked,
/// so workflows can be exercised without a terminal.
pub trait ConfirmPrompter {
    /// Prompt the user for a yes/no confirmation.
    ///
    /// # Parameters
    /// - `prompt`: The confirmation message.
    /// - `default`: The default answer if the user presses Enter.
    ///
    /// # Returns
    /// `Ok(true)` if confirmed, `Ok(false)` if declined, or `Err(String)` on input failure.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String>;
}

/// Default implementation of `ConfirmPrompter` using `dialoguer::Confirm`.
///
/// Displays a yes/no dialog with styling from `ColorfulTheme`.
pub struct DialoguerConfirmPrompter;

impl ConfirmPrompter for DialoguerConfirmPrompter {
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, String> {
        let theme = ColorfulTheme::default();
        let confirm = Confirm::with_theme(&theme)
            .with_prompt(prompt)
            .default(default);
        match confirm.interact() {
            Ok(v) => Ok(v),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Asks before a mutating step, defaulting to "no".
///
/// When `enabled` is `false` (`--no-prompt`), the step is approved without
/// asking.
pub fn proceed<P: ConfirmPrompter + ?Sized>(
    prompter: &mut P,
    enabled: bool,
    question: &str,
) -> Result<bool, TidyError> {
    if !enabled {
        return Ok(true);
    }
    prompter.confirm(question, false).map_err(TidyError::Prompt)
}


#[cfg(test)]
mod tests {
    use super::testing::MockConfirmPrompter;
    use super::*;

    #[test]
    fn test_proceed_asks_when_enabled() {
        let mut prompter = MockConfirmPrompter::answering(true);
        let result = proceed(&mut prompter, true, "Proceed with rebase?");
        assert!(result.unwrap());
        assert_eq!(prompter.asked, vec!["Proceed with rebase?"]);
    }

    #[test]
    fn test_proceed_declined() {
        let mut prompter = MockConfirmPrompter::answering(false);
        assert!(!proceed(&mut prompter, true, "Proceed?").unwrap());
    }

    #[test]
    fn test_proceed_skips_prompt_when_disabled() {
        let mut prompter = MockConfirmPrompter::answering(false);
        assert!(proceed(&mut prompter, false, "Proceed?").unwrap());
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_proceed_error() {
        let mut prompter = MockConfirmPrompter {
            response: Err("confirm failed".to_string()),
            asked: Vec::new(),
        };
        let result = proceed(&mut prompter, true, "Proceed?");
        assert!(matches!(result, Err(TidyError::Prompt(_))));
    }
}
