use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::Config;
use crate::model::{self, Message};

pub use crate::providers::ollama::extract_generated_text;

/// A running conversation with a local model server.
///
/// Holds the target model, mutable system instructions, file excerpts added
/// to the session, and the turn history. All I/O is blocking and runs on the
/// caller's thread; the type is not meant to be shared across threads.
/// History and session files grow without bound until explicitly cleared.
pub struct Session {
    http: Client,
    cfg: Config,
    session_files: Vec<String>,
    history: Vec<Message>,
}

impl Session {
    /// Build a session from configuration. Fails only if the HTTP client
    /// cannot be constructed.
    pub fn new(cfg: Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.model_timeout_secs))
            .build()
            .context("Failed to initialize HTTP client")?;
        Ok(Self {
            http,
            cfg,
            session_files: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Build a session whose system instructions come from a file.
    pub fn with_system_instructions_file(mut cfg: Config, path: impl AsRef<Path>) -> Result<Self> {
        cfg.system_prompt = read_file(path.as_ref())?;
        Self::new(cfg)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Ask the server to download the configured model. Returns the raw
    /// response body, success or not.
    pub fn pull_model(&self) -> Result<String> {
        model::pull(&self.http, &self.cfg)
    }

    /// Read a file and append its contents to the session context used for
    /// every later generation. Returns the raw contents.
    pub fn add_file_to_context(&mut self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let contents = read_file(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(file = %name, bytes = contents.len(), "adding file to session context");
        self.session_files
            .push(format!("File '{}' contents:\n{}", name, contents));
        Ok(contents)
    }

    pub fn session_files(&self) -> &[String] {
        &self.session_files
    }

    pub fn clear_session_files(&mut self) {
        self.session_files.clear();
    }

    /// Send a generation request and return the raw response body. The
    /// prompt and the extracted reply are appended to the turn history.
    pub fn generate_text(&mut self, prompt: &str) -> Result<String> {
        let system = self.system_context();
        let raw = model::generate(&self.http, &self.cfg, prompt, &system)?;

        self.history.push(Message::user(prompt));
        self.history
            .push(Message::assistant(extract_generated_text(&raw)));
        info!(
            model = %self.cfg.model,
            history_len = self.history.len(),
            "recorded generation turn"
        );
        Ok(raw)
    }

    /// Send a generation request and return only the generated text.
    pub fn generate_clean_text(&mut self, prompt: &str) -> Result<String> {
        let raw = self.generate_text(prompt)?;
        Ok(extract_generated_text(&raw))
    }

    /// Alias for [`Session::generate_clean_text`].
    pub fn respond(&mut self, prompt: &str) -> Result<String> {
        self.generate_clean_text(prompt)
    }

    /// Alias for [`Session::generate_clean_text`].
    pub fn prompt(&mut self, prompt: &str) -> Result<String> {
        self.generate_clean_text(prompt)
    }

    /// The effective system context: instructions first, then each session
    /// file excerpt in insertion order, blank-line separated.
    pub fn system_context(&self) -> String {
        let mut context = self.cfg.system_prompt.clone();
        for entry in &self.session_files {
            if !context.is_empty() {
                context.push_str("\n\n");
            }
            context.push_str(entry);
        }
        context
    }

    pub fn set_system_instructions(&mut self, instructions: impl Into<String>) {
        self.cfg.system_prompt = instructions.into();
    }

    pub fn set_system_instructions_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.cfg.system_prompt = read_file(path.as_ref())?;
        Ok(())
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.cfg.model = model.into();
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Forget all recorded turns.
    pub fn clear_context(&mut self) {
        self.history.clear();
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}
