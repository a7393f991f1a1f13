// Dashboard module
// The page-based console surface: sidebar-style navigation between named
// sections, mock telemetry rendering, and the chat widget. Session state
// lives here and belongs to exactly one interactive session.

pub mod geomap;
pub mod mock;
pub mod pages;

#[cfg(test)]
mod tests;

use std::io::Write;

use console::style;
use dialoguer::{Input, Select};
use rand::thread_rng;
use tracing::warn;

use crate::assistant::{Assistant, GREETING, MISSING_KEY_NOTICE};
use crate::chat::{ChatMessage, ChatRole};
use crate::config::Config;
use crate::embeddings::encoder::{Embedder, LocalEncoder};
use crate::{GridError, Result};

/// Process-local state for one interactive session; reset on restart
pub struct Session {
    pub conversation: Vec<ChatMessage>,
    pub refresh_ticks: u64,
}

impl Session {
    #[inline]
    pub fn new() -> Self {
        Self {
            conversation: vec![ChatMessage::assistant(GREETING)],
            refresh_ticks: 0,
        }
    }

    #[inline]
    pub fn record_user(&mut self, content: impl Into<String>) {
        self.conversation.push(ChatMessage::user(content));
    }

    #[inline]
    pub fn record_assistant(&mut self, content: impl Into<String>) {
        self.conversation.push(ChatMessage::assistant(content));
    }
}

impl Default for Session {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

const PAGES: [&str; 9] = [
    "Overview",
    "Live Monitoring",
    "Topology",
    "Documents",
    "Fault Detection",
    "Fault Simulation",
    "User Manual",
    "Assistant",
    "Quit",
];

/// Run the page-based console application until the user quits
#[inline]
pub async fn run(config: &Config) -> Result<()> {
    let mut session = Session::new();
    let mut assistant: Option<Assistant<LocalEncoder>> = None;

    loop {
        session.refresh_ticks += 1;

        let selection = Select::new()
            .with_prompt("Navigate")
            .items(&PAGES)
            .default(0)
            .interact()
            .map_err(|e| GridError::Config(format!("Terminal interaction failed: {e}")))?;

        match PAGES[selection] {
            "Overview" => pages::render_overview(session.refresh_ticks),
            "Live Monitoring" => {
                let mut rng = thread_rng();
                pages::render_monitoring(
                    &mock::current_kpis(),
                    &mock::steady_state_series(&mut rng),
                    &mock::frequency_response_grid_forming(),
                    &mock::frequency_response_grid_following(),
                );
            }
            "Topology" => pages::render_topology(&geomap::load_boundary()),
            "Documents" => pages::render_documents(config, &mock::simulation_summary()),
            "Fault Detection" => pages::render_fault_detection(&mock::health_report()),
            "Fault Simulation" => {
                let fault = Select::new()
                    .with_prompt("Select fault type")
                    .items(&mock::FAULT_TYPES)
                    .default(0)
                    .interact()
                    .map_err(|e| {
                        GridError::Config(format!("Terminal interaction failed: {e}"))
                    })?;
                pages::render_fault_trigger(
                    mock::FAULT_TYPES[fault],
                    &mock::voltage_recovery_curve(),
                );
            }
            "User Manual" => pages::render_manual(),
            "Assistant" => chat_widget(config, &mut session, &mut assistant).await,
            _ => break,
        }
    }

    Ok(())
}

/// The chat widget: an input loop over the shared session transcript
pub async fn chat_widget(
    config: &Config,
    session: &mut Session,
    assistant_slot: &mut Option<Assistant<LocalEncoder>>,
) {
    println!();
    println!("{}", style("⚡ Platform Assistant").bold().cyan());
    println!("{}", style("Connected to the offshore wind knowledge base").dim());
    println!();

    for message in &session.conversation {
        render_message(message);
    }

    loop {
        let question: String = match Input::new()
            .with_prompt("You (blank to go back)")
            .allow_empty(true)
            .interact_text()
        {
            Ok(question) => question,
            Err(e) => {
                warn!("Input failed: {e}");
                return;
            }
        };

        if question.trim().is_empty() {
            return;
        }

        submit_question(config, session, assistant_slot, &question).await;
    }
}

/// Handle one submitted question, containing every failure at this
/// boundary: a missing credential renders the fixed setup notice, any
/// other error is surfaced inline. Both outcomes are appended to the
/// transcript so the visible conversation reflects what happened.
pub async fn submit_question(
    config: &Config,
    session: &mut Session,
    assistant_slot: &mut Option<Assistant<LocalEncoder>>,
    question: &str,
) {
    session.record_user(question);

    if config.chat.resolve_api_key().is_none() {
        println!("{}", style(MISSING_KEY_NOTICE).red());
        session.record_assistant(MISSING_KEY_NOTICE);
        return;
    }

    // The assistant (and with it the index and embedding model) is loaded
    // on first use and reused for the rest of the session
    if assistant_slot.is_none() {
        println!("{}", style("📚 Opening the knowledge base...").dim());
        match Assistant::open(config).await {
            Ok(assistant) => *assistant_slot = Some(assistant),
            Err(e) => {
                record_failure(session, &e);
                return;
            }
        }
    }

    let Some(assistant) = assistant_slot.as_mut() else {
        return;
    };
    deliver_answer(session, assistant).await;
}

/// One embed → retrieve → prompt → stream round trip over the session
/// transcript; the reply (or an inline error notice) is appended once the
/// stream completes.
pub async fn deliver_answer<E: Embedder>(session: &mut Session, assistant: &mut Assistant<E>) {
    print!("{} ", style("Assistant:").bold().green());

    let result = assistant
        .answer(&session.conversation, |delta| {
            print!("{delta}");
            let _ = std::io::stdout().flush();
        })
        .await;
    println!();

    match result {
        Ok(answer) => session.record_assistant(answer),
        Err(e) => record_failure(session, &e),
    }
}

fn record_failure(session: &mut Session, error: &GridError) {
    let notice = format!("🚨 Interrupted, backend error: {error}");
    println!("{}", style(&notice).red());
    session.record_assistant(notice);
}

fn render_message(message: &ChatMessage) {
    match message.role {
        ChatRole::User => println!("{} {}", style("You:").bold(), message.content),
        ChatRole::Assistant => {
            println!("{} {}", style("Assistant:").bold().green(), message.content);
        }
        ChatRole::System => println!("{} {}", style("System:").dim(), message.content),
    }
}
