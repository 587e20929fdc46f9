/*!
 * Interactive confirmation
 *
 * Commands never talk to the terminal directly; they receive something
 * that implements [`Confirm`]. The binary passes [`TerminalConfirm`],
 * tests pass a closure.
 */

use crate::error::{NodectlError, Result};
use dialoguer::{theme::ColorfulTheme, Confirm as DialoguerConfirm};

/// Ask the operator a yes/no question
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// Yes/no prompt on the controlling terminal, defaulting to "no"
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        DialoguerConfirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| NodectlError::Prompt(e.to_string()))
    }
}
