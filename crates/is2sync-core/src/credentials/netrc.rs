//! Minimal `.netrc` reader.

use anyhow::{Context, Result};
use std::path::Path;

/// One `machine` (or `default`) block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetrcEntry {
    /// `None` for the `default` block.
    pub machine: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Netrc {
    entries: Vec<NetrcEntry>,
}

impl Netrc {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read netrc {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("parse netrc {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let mut entries: Vec<NetrcEntry> = Vec::new();
        let mut lines = data.lines();

        while let Some(line) = lines.next() {
            let mut tokens = line.split_whitespace();
            while let Some(token) = tokens.next() {
                match token {
                    // Comment runs to the end of the line.
                    t if t.starts_with('#') => break,
                    "machine" => {
                        let host = tokens.next().context("machine without a host name")?;
                        entries.push(NetrcEntry {
                            machine: Some(host.to_string()),
                            ..Default::default()
                        });
                    }
                    "default" => entries.push(NetrcEntry::default()),
                    "login" | "password" | "account" => {
                        let value = tokens
                            .next()
                            .with_context(|| format!("{} without a value", token))?
                            .to_string();
                        let entry = entries
                            .last_mut()
                            .with_context(|| format!("{} outside of a machine block", token))?;
                        match token {
                            "login" => entry.login = Some(value),
                            "password" => entry.password = Some(value),
                            _ => entry.account = Some(value),
                        }
                    }
                    "macdef" => {
                        // Macro body runs until the next blank line.
                        for body in lines.by_ref() {
                            if body.trim().is_empty() {
                                break;
                            }
                        }
                        break;
                    }
                    other => anyhow::bail!("unexpected netrc token {:?}", other),
                }
            }
        }

        Ok(Netrc { entries })
    }

    /// Entry for `host`, falling back to the `default` block.
    pub fn authenticator(&self, host: &str) -> Option<&NetrcEntry> {
        self.entries
            .iter()
            .find(|e| e.machine.as_deref() == Some(host))
            .or_else(|| self.entries.iter().find(|e| e.machine.is_none()))
    }
}
