//! Output formatting utilities

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use amity_core::{User, UserSummary};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: {} (expected table or json)", other),
        }
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// One-line rendering of a user record
pub fn user_line(user: &User) -> String {
    match &user.email {
        Some(email) => format!("#{:<4} @{:<16} {} <{}>", user.id, user.username, user.name, email),
        None => format!("#{:<4} @{:<16} {}", user.id, user.username, user.name),
    }
}

/// Render enriched ids joined by an arrow, e.g. for paths
pub fn chain(users: &[UserSummary]) -> String {
    users
        .iter()
        .map(|u| format!("@{}", u.username))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Print a titled list of enriched ids, or a placeholder when empty
pub fn print_summaries(title: &str, users: &[UserSummary], empty: &str) {
    if users.is_empty() {
        println!("{}", empty);
        return;
    }
    println!("{} ({}):", title, users.len());
    for user in users {
        println!("  {}", user);
    }
}
