//! Line-driven search sessions.
//!
//! Every input line is the full content of a panel's search box. A handful of
//! `:`-prefixed lines are commands instead of text. The session runs three
//! futures side by side on one task: the reader turning lines into
//! [`PanelCommand`]s, the controller loop, and the renderer printing state
//! changes.

use std::io::Write;

use dtk_core::{ControllerStats, Fetcher, PanelCommand, SearchController, SearchPhase};
use dtk_panels::{PanelItem, TriggerMode};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::render::{items_table, status_line};

/// What one input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLine {
    /// New search box content.
    Text(String),
    Refresh,
    Clear,
    Quit,
}

impl SessionLine {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            ":refresh" | ":r" => Self::Refresh,
            ":clear" | ":c" => Self::Clear,
            ":quit" | ":q" => Self::Quit,
            _ => Self::Text(line.to_string()),
        }
    }

    /// Controller command for this line; `None` ends the session.
    ///
    /// Text becomes an input event on debounced panels and a submit on
    /// button-triggered ones.
    pub fn into_command(self, trigger: TriggerMode) -> Option<PanelCommand> {
        match self {
            Self::Text(text) => Some(match trigger {
                TriggerMode::Debounced => PanelCommand::Input(text),
                TriggerMode::Immediate => PanelCommand::Submit(text),
            }),
            Self::Refresh => Some(PanelCommand::Refresh),
            Self::Clear => Some(PanelCommand::Clear),
            Self::Quit => None,
        }
    }
}

/// Run a session until the input ends or a `:quit` line.
///
/// End of input lets outstanding searches finish; `:quit` stops at once.
pub async fn run_session<F, R, W>(
    controller: SearchController<F>,
    trigger: TriggerMode,
    input: R,
    out: &mut W,
) -> std::io::Result<ControllerStats>
where
    F: Fetcher,
    F::Item: PanelItem + Clone,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let noun = controller.noun().to_string();
    let mut states = controller.subscribe();
    let (commands, receiver) = mpsc::unbounded_channel();

    let reader = async move {
        let mut lines = input.lines();
        let mut stop = PanelCommand::Finish;
        while let Some(line) = lines.next_line().await? {
            match SessionLine::parse(&line).into_command(trigger) {
                Some(command) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                None => {
                    stop = PanelCommand::Dispose;
                    break;
                }
            }
        }
        // The controller may already be gone; nothing left to stop then.
        let _ = commands.send(stop);
        Ok::<(), std::io::Error>(())
    };

    let renderer = async {
        // Ends once the controller, and with it the state sender, is dropped.
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            writeln!(out, "{}", status_line(&noun, &state))?;
            if state.phase() == SearchPhase::Success {
                writeln!(out, "{}", items_table(state.items()))?;
            }
        }
        Ok::<(), std::io::Error>(())
    };

    let (read, stats, rendered) = tokio::join!(reader, controller.run(receiver), renderer);
    read?;
    rendered?;
    Ok(stats)
}
