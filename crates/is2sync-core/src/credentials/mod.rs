//! NASA Earthdata credential resolution: CLI flags, netrc, or terminal prompt.

mod netrc;

pub use netrc::{Netrc, NetrcEntry};

use anyhow::{Context, Result};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Username/password pair for Earthdata Login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the user asked us to take credentials from.
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    pub user: Option<String>,
    pub netrc: Option<PathBuf>,
}

/// Interactive input. The terminal implementation is `TerminalPrompt`.
pub trait Prompt {
    fn username(&mut self, host: &str) -> Result<String>;
    fn password(&mut self, user: &str, host: &str) -> Result<String>;
}

/// Reads the username from stdin and the password without echo.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn username(&mut self, host: &str) -> Result<String> {
        print!("Username for {}: ", host);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read username")?;
        Ok(line.trim().to_string())
    }

    fn password(&mut self, user: &str, host: &str) -> Result<String> {
        rpassword::prompt_password(format!("Password for {}@{}: ", user, host))
            .context("read password")
    }
}

/// Resolve credentials for `host`.
///
/// With neither a user nor a netrc file, both are prompted for. A netrc file
/// takes precedence over `--user`. A bare user only prompts for the password.
pub fn resolve(source: &CredentialSource, host: &str, prompt: &mut dyn Prompt) -> Result<Credentials> {
    let creds = match (&source.user, &source.netrc) {
        (_, Some(path)) => {
            let netrc = Netrc::from_path(path)?;
            let entry = netrc
                .authenticator(host)
                .with_context(|| format!("no entry for {} in {}", host, path.display()))?;
            let username = entry
                .login
                .clone()
                .with_context(|| format!("netrc entry for {} has no login", host))?;
            let password = entry
                .password
                .clone()
                .with_context(|| format!("netrc entry for {} has no password", host))?;
            tracing::debug!(user = %username, netrc = %path.display(), "credentials from netrc");
            Credentials { username, password }
        }
        (Some(user), None) => Credentials {
            username: user.clone(),
            password: prompt.password(user, host)?,
        },
        (None, None) => {
            let username = prompt.username(host)?;
            let password = prompt.password(&username, host)?;
            Credentials { username, password }
        }
    };

    if creds.username.is_empty() {
        anyhow::bail!("empty username for {}", host);
    }
    Ok(creds)
}
