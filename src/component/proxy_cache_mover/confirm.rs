use anyhow::Result;
use console::Term;
use std::path::Path;

/// 移動前的確認
pub trait ConfirmMove {
    fn confirm(&mut self, source: &Path, destination: &Path) -> Result<bool>;
}

impl<T: ConfirmMove + ?Sized> ConfirmMove for &mut T {
    fn confirm(&mut self, source: &Path, destination: &Path) -> Result<bool> {
        (**self).confirm(source, destination)
    }
}

impl<T: ConfirmMove + ?Sized> ConfirmMove for Box<T> {
    fn confirm(&mut self, source: &Path, destination: &Path) -> Result<bool> {
        (**self).confirm(source, destination)
    }
}

/// `--yes`：全部自動同意
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl ConfirmMove for AutoApprove {
    fn confirm(&mut self, _source: &Path, _destination: &Path) -> Result<bool> {
        Ok(true)
    }
}

/// 在終端機詢問，只有完全等於 `y` 的回答才會移動
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    #[must_use]
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new(Term::stdout())
    }
}

impl ConfirmMove for TerminalPrompt {
    fn confirm(&mut self, source: &Path, destination: &Path) -> Result<bool> {
        self.term.write_str(&format_prompt(source, destination))?;
        let answer = self.term.read_line()?;
        Ok(is_approval(&answer))
    }
}

#[must_use]
pub fn format_prompt(source: &Path, destination: &Path) -> String {
    format!(
        "Move {} to {} (y/n)? ",
        source.display(),
        destination.display()
    )
}

#[must_use]
pub fn is_approval(answer: &str) -> bool {
    answer == "y"
}
