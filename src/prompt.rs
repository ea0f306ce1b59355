use anyhow::Result;
use dialoguer::Input;

/// Terminal input seam for configuration resolution and the pre-run pause.
///
/// Core logic never reads stdin directly; it asks through this trait, so
/// tests can script every answer instead of needing a real terminal.
#[cfg_attr(test, mockall::automock)]
pub trait PromptProvider {
    /// Ask for one line of input under the given label.
    fn ask(&self, label: &str) -> Result<String>;

    /// Print `message` and block until the user presses enter.
    fn pause(&self, message: &str) -> Result<()>;
}

/// Prompt provider backed by the interactive terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl PromptProvider for TerminalPrompt {
    fn ask(&self, label: &str) -> Result<String> {
        let value = Input::<String>::new()
            .with_prompt(label)
            .interact_text()?;
        Ok(value)
    }

    fn pause(&self, message: &str) -> Result<()> {
        println!("{message}");
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(())
    }
}
