use std::io::Write;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::tracker::Confirm;

/// Answer decided up front, e.g. by `--yes`.
pub struct Answered(pub bool);

#[async_trait]
impl Confirm for Answered {
    async fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// Asks on `out` and reads a `y`/`yes` answer from `input`. Anything else, including end of
/// input, counts as no.
pub struct PromptConfirm<R, W> {
    input: R,
    out: W,
}

impl<R, W> PromptConfirm<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send, W: Write + Send> Confirm for PromptConfirm<R, W> {
    async fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.out, "{prompt} [y/N] ")?;
        self.out.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer).await?;
        Ok(is_yes(&answer))
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
