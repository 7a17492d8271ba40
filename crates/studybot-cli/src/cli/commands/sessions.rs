//! Session command handlers.

use std::fmt::Write as _;

use anyhow::Result;
use chrono::{Local, TimeZone};
use studybot_core::model::{ChatSession, Role};

pub fn list() -> Result<()> {
    let (_, store) = super::restore_state()?;
    if store.sessions().is_empty() {
        println!("No sessions found.");
    } else {
        for session in store.sessions() {
            println!(
                "{}  {}  {} messages  {}",
                session.title,
                session.id,
                session.messages.len(),
                format_millis(session.created_at)
            );
        }
    }
    Ok(())
}

pub fn show(id: &str) -> Result<()> {
    let (_, store) = super::restore_state()?;
    let Some(session) = store.get(id) else {
        anyhow::bail!("Session '{id}' not found");
    };
    if session.is_empty() {
        println!("Session '{}' has no messages yet.", session.title);
    } else {
        println!("{}", format_transcript(session));
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let (_, mut store) = super::restore_state()?;
    let count = store.sessions().len();
    store.clear();
    println!("Cleared {count} session(s).");
    Ok(())
}

fn format_millis(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map_or_else(|| "unknown".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

fn format_transcript(session: &ChatSession) -> String {
    let mut out = format!("# {}\n", session.title);
    for message in &session.messages {
        let speaker = match message.role {
            Role::User => "You",
            Role::Model => "Tutor",
        };
        let _ = write!(
            out,
            "\n[{}] {speaker}:\n{}\n",
            format_millis(message.timestamp),
            message.content
        );
    }
    out
}
