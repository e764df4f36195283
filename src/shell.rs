//! Interactive terminal front end.
//!
//! Owns the readline loop, command dispatch, and user confirmation for
//! destructive actions. Rendering goes through the pure formatter and
//! the metadata renderer; all state lives in [`ConversationView`] and
//! [`SessionStore`].

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::api::LegalApi;
use crate::config;
use crate::export;
use crate::format::{self, render};
use crate::metadata;
use crate::refresh;
use crate::session::SessionStore;
use crate::status;
use crate::suggestions;
use crate::transcript::Message;
use crate::view::{ConversationView, SubmitOutcome};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("terminal input error: {0}")]
    Readline(#[from] ReadlineError),

    #[error("input task failed: {0}")]
    Input(#[from] tokio::task::JoinError),
}

const HELP: &str = "\
Ask any question about the Bharatiya Nyaya Sanhita, or use:
  :status     system readiness of the consultation service
  :examples   curated example queries
  :session    server-side statistics for the current session
  :snapshot   export the local session record
  :export     export the full transcript
  :clear      wipe the visible transcript (asks first)
  :reset      start a fresh session (asks first)
  :help       this text
  :quit       leave";

/// Run the interactive shell until the user quits.
pub async fn run(
    api: Arc<dyn LegalApi>,
    store: Arc<Mutex<SessionStore>>,
) -> Result<(), ShellError> {
    let view = ConversationView::new(api.clone(), store.clone());

    let indicator = Arc::new(std::sync::Mutex::new({
        let store = store.lock().await;
        refresh::session_indicator(store.record())
    }));
    let _session_refresh = refresh::spawn_session_refresh(
        store.clone(),
        Duration::from_secs(config::SESSION_REFRESH_SECS),
    );
    let _indicator_refresh = refresh::spawn_indicator_refresh(
        store.clone(),
        indicator.clone(),
        Duration::from_secs(config::INDICATOR_REFRESH_SECS),
    );

    print_banner(api.as_ref()).await;
    for message in view.messages().await {
        print_message(&message);
    }

    let mut editor = DefaultEditor::new()?;
    loop {
        let prompt = {
            let line = indicator
                .lock()
                .map(|i| i.clone())
                .unwrap_or_else(|_| "no session".to_string());
            format!("[{line}] ask> ")
        };

        let (ed, line) = read_line(editor, prompt).await?;
        editor = ed;
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(input);

        match input {
            ":quit" | ":exit" | ":q" => break,
            ":help" => println!("{HELP}"),
            ":status" => show_status(api.as_ref()).await,
            ":examples" => show_examples(api.as_ref()).await,
            ":session" => show_session(api.as_ref(), &store).await,
            ":snapshot" => export_snapshot(&store).await,
            ":export" => export_transcript(&view).await,
            ":clear" => {
                let (ed, yes) = confirm(editor, "Wipe the visible transcript?").await?;
                editor = ed;
                if yes {
                    view.clear().await;
                    println!("{}", "Transcript cleared.".dimmed());
                }
            }
            ":reset" => {
                let (ed, yes) =
                    confirm(editor, "Start a fresh session? The current one is discarded.").await?;
                editor = ed;
                if yes {
                    match view.reset().await {
                        Ok(new_id) => {
                            refresh_indicator(&store, &indicator).await;
                            println!("{}", format!("New session: {new_id}").dimmed());
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "session reset failed");
                            println!("{}", "Could not reset the session. Try again.".red());
                        }
                    }
                }
            }
            question => {
                println!("{}", "consulting legal sources…".dimmed().italic());
                let outcome = view.submit(question).await;
                match outcome {
                    SubmitOutcome::Answered | SubmitOutcome::Failed => {
                        if let Some(reply) = view.messages().await.last() {
                            print_message(reply);
                        }
                        refresh_indicator(&store, &indicator).await;
                    }
                    SubmitOutcome::IgnoredBusy => {
                        println!("{}", "Still working on the previous question.".dimmed());
                    }
                    SubmitOutcome::IgnoredEmpty | SubmitOutcome::Stale => {}
                }
            }
        }
    }

    println!("{}", "Namaste.".dimmed());
    Ok(())
}

async fn print_banner(api: &dyn LegalApi) {
    println!(
        "{} v{} — legal consultation over the Bharatiya Nyaya Sanhita",
        config::APP_NAME.bold(),
        config::APP_VERSION
    );
    match api.health().await {
        Ok(health) => println!("{}", status::render_health(&health).dimmed()),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            println!(
                "{}",
                "The consultation service is not reachable yet; answers will fail until it is."
                    .yellow()
            );
        }
    }
    println!("{}", "Type :help for commands.".dimmed());
}

fn print_message(message: &Message) {
    match message.sender {
        crate::transcript::Sender::User => {
            println!("{} {}", "you:".bold(), message.text);
        }
        crate::transcript::Sender::Assistant if message.is_error => {
            println!("{} {}", "nyaya:".bold(), message.text.red());
        }
        crate::transcript::Sender::Assistant => {
            let blocks = format::format_content(&message.text);
            println!("{}\n{}", "nyaya:".bold(), render::to_ansi(&blocks));
            if let Some(meta) = &message.metadata {
                for line in metadata::render_metadata(meta) {
                    println!("  {}", line.dimmed());
                }
            }
        }
    }
}

async fn show_status(api: &dyn LegalApi) {
    match api.system_status().await {
        Ok(system) => {
            for line in status::render_status(&system) {
                println!("{line}");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "status fetch failed");
            println!("{}", "Could not retrieve system status.".red());
        }
    }
}

async fn show_examples(api: &dyn LegalApi) {
    let categories = match api.example_queries().await {
        Ok(categories) if !categories.is_empty() => categories,
        Ok(_) => suggestions::default_examples(),
        Err(e) => {
            tracing::debug!(error = %e, "examples fetch failed, using built-in set");
            suggestions::default_examples()
        }
    };
    for line in suggestions::render_examples(&categories) {
        println!("{line}");
    }
}

async fn show_session(api: &dyn LegalApi, store: &Arc<Mutex<SessionStore>>) {
    let session_id = {
        let store = store.lock().await;
        store.current().map(str::to_string)
    };
    let Some(session_id) = session_id else {
        println!("{}", "No active session.".dimmed());
        return;
    };
    match api.session_stats(&session_id).await {
        Ok(stats) => {
            for line in status::render_session_stats(&stats) {
                println!("{line}");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "session stats fetch failed");
            println!("{}", "Could not retrieve session statistics.".red());
        }
    }
}

async fn export_snapshot(store: &Arc<Mutex<SessionStore>>) {
    let snapshot = {
        let store = store.lock().await;
        store.snapshot()
    };
    let snapshot = match snapshot {
        Ok(snapshot) => snapshot,
        Err(_) => {
            println!("{}", "No session to export.".yellow());
            return;
        }
    };
    match export::write_json(&config::exports_dir(), "session", &snapshot) {
        Ok(path) => println!("Session snapshot written to {}", path.display()),
        Err(e) => {
            tracing::warn!(error = %e, "snapshot export failed");
            println!("{}", "Could not write the snapshot.".red());
        }
    }
}

async fn export_transcript(view: &ConversationView) {
    match view.export_transcript(&config::exports_dir()).await {
        Ok(path) => println!("Transcript written to {}", path.display()),
        Err(crate::export::ExportError::Empty) => {
            println!("{}", "Nothing to export yet — ask a question first.".yellow());
        }
        Err(e) => {
            tracing::warn!(error = %e, "transcript export failed");
            println!("{}", "Could not write the transcript.".red());
        }
    }
}

async fn refresh_indicator(
    store: &Arc<Mutex<SessionStore>>,
    indicator: &Arc<std::sync::Mutex<String>>,
) {
    let rendered = {
        let store = store.lock().await;
        refresh::session_indicator(store.record())
    };
    if let Ok(mut current) = indicator.lock() {
        *current = rendered;
    }
}

/// Run one readline on the blocking pool. The editor moves into the
/// blocking task and back so no async worker stalls on terminal input.
async fn read_line(
    mut editor: DefaultEditor,
    prompt: String,
) -> Result<(DefaultEditor, Result<String, ReadlineError>), ShellError> {
    let (editor, result) = tokio::task::spawn_blocking(move || {
        let result = editor.readline(&prompt);
        (editor, result)
    })
    .await?;
    Ok((editor, result))
}

async fn confirm(
    editor: DefaultEditor,
    question: &str,
) -> Result<(DefaultEditor, bool), ShellError> {
    let (editor, answer) = read_line(editor, format!("{question} [y/N] ")).await?;
    let yes = match answer {
        Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => false,
        Err(e) => return Err(e.into()),
    };
    Ok((editor, yes))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `spawn_blocking` moves the editor across threads; this pins the
    /// `Send` bound that makes [`read_line`] possible.
    #[test]
    fn editor_crosses_the_blocking_boundary() {
        fn assert_send<T: Send>() {}
        assert_send::<DefaultEditor>();
    }
}
