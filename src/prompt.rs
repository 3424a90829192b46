use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// Asks the operator for one line of text.
pub trait InteractivePrompt: Send {
    fn request_line(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from stdin.
pub struct StdinPrompt;

impl InteractivePrompt for StdinPrompt {
    fn request_line(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{prompt} -> ")?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Error reading input")?;
        if read == 0 {
            bail!("input stream closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays canned answers and records every prompt it was shown.
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl InteractivePrompt for ScriptedPrompt {
    fn request_line(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("input stream closed"),
        }
    }
}
