//! Interactive session: line commands over a task store.
//!
//! The session layer owns no task state of its own. It parses one-line
//! commands into intents, enforces the input rules that sit above the store
//! (titles are trimmed and must be non-empty), dispatches into
//! [`TaskStore`], and renders whatever the store holds afterwards. Filter
//! and search changes go through [`TaskStore::set_query`], which reloads.

use std::fmt::Write as _;

use taskdeck_proto::task::{ParseFilterError, TaskDraft, TaskFilter, TaskId, TaskPatch};

use crate::gateway::TaskGateway;
use crate::store::TaskStore;

/// One parsed user intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Render the current collection without contacting the gateway.
    List,
    /// Create a task with the given (already trimmed) title.
    Add { title: String },
    /// Flip completion for the task with this id.
    Toggle { id: TaskId },
    /// Replace the title of the task with this id.
    Edit { id: TaskId, title: String },
    /// Delete the task with this id.
    Remove { id: TaskId },
    /// Switch the completion filter and reload.
    Filter { filter: TaskFilter },
    /// Replace the search term (empty clears it) and reload.
    Search { term: String },
    /// Reload from the gateway without touching the query.
    Refresh,
    /// Show the command reference.
    Help,
    /// End the session.
    Quit,
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line was blank.
    #[error("empty input")]
    Empty,
    /// The first word is not a known command.
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    /// The command needs an argument that was not supplied.
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command the argument belongs to.
        command: &'static str,
        /// Human description of what is missing.
        argument: &'static str,
    },
    /// An id argument was not a number.
    #[error("invalid task id `{0}`")]
    InvalidId(String),
    /// A filter argument was not `all`, `pending` or `completed`.
    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),
    /// An `add` or `edit` title was empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Parses one input line into a [`Command`].
///
/// Leading and trailing whitespace is ignored everywhere; titles are
/// trimmed before they are accepted, so a title of only spaces is rejected
/// here and never reaches the store.
///
/// # Errors
///
/// Returns a [`ParseError`] describing what was wrong with the line.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word {
        "list" | "ls" => Ok(Command::List),
        "add" => {
            if rest.is_empty() {
                return Err(ParseError::EmptyTitle);
            }
            Ok(Command::Add {
                title: rest.to_string(),
            })
        }
        "toggle" => Ok(Command::Toggle {
            id: parse_id("toggle", rest)?,
        }),
        "edit" => {
            let (id_word, title) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(id_word, title)| (id_word, title.trim()));
            let id = parse_id("edit", id_word)?;
            if title.is_empty() {
                return Err(ParseError::EmptyTitle);
            }
            Ok(Command::Edit {
                id,
                title: title.to_string(),
            })
        }
        "rm" | "delete" => Ok(Command::Remove {
            id: parse_id("rm", rest)?,
        }),
        "filter" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument {
                    command: "filter",
                    argument: "`all`, `pending` or `completed`",
                });
            }
            Ok(Command::Filter {
                filter: rest.parse()?,
            })
        }
        "search" => Ok(Command::Search {
            term: rest.to_string(),
        }),
        "refresh" => Ok(Command::Refresh),
        "help" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_id(command: &'static str, rest: &str) -> Result<TaskId, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument {
            command,
            argument: "a task id",
        });
    }
    rest.parse::<u64>()
        .map(TaskId::new)
        .map_err(|_| ParseError::InvalidId(rest.to_string()))
}

/// What the caller should do after a command has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Text to display; the session continues.
    Output(String),
    /// The session is over.
    Quit,
}

/// Command reference shown by `help`.
const HELP: &str = "\
commands:
  list                 show the current collection
  add <title>          create a task
  toggle <id>          flip completion for a task
  edit <id> <title>    replace a task's title
  rm <id>              delete a task
  filter <which>       switch to all, pending or completed
  search [term]        set the search term; no term clears it
  refresh              reload from the server
  help                 show this reference
  quit                 end the session";

/// Interactive session over a task store.
pub struct Session<G: TaskGateway> {
    store: TaskStore<G>,
}

impl<G: TaskGateway> Session<G> {
    /// Wraps a store, which should not have been loaded yet.
    #[must_use]
    pub const fn new(store: TaskStore<G>) -> Self {
        Self { store }
    }

    /// Read access to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore<G> {
        &self.store
    }

    /// Runs the initial load and renders the first view.
    pub async fn start(&mut self) -> String {
        self.store.reload().await;
        self.render()
    }

    /// Executes one command against the store and renders the result.
    pub async fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::List => {}
            Command::Add { title } => self.store.add_task(&TaskDraft::new(title)).await,
            Command::Toggle { id } => {
                // The store needs the current record to know which value to
                // send and which to restore.
                let Some(task) = self.store.tasks().iter().find(|t| t.id == id).cloned() else {
                    return Outcome::Output(format!("no task with id {id}"));
                };
                self.store.toggle_task(&task).await;
            }
            Command::Edit { id, title } => {
                self.store
                    .update_task(id, &TaskPatch::default().title(title))
                    .await;
            }
            Command::Remove { id } => self.store.delete_task(id).await,
            Command::Filter { filter } => {
                let query = self.store.query().clone().with_filter(filter);
                self.store.set_query(query).await;
            }
            Command::Search { term } => {
                let query = self.store.query().clone().with_search(term);
                self.store.set_query(query).await;
            }
            Command::Refresh => self.store.reload().await,
            Command::Help => return Outcome::Output(HELP.to_string()),
            Command::Quit => return Outcome::Quit,
        }
        Outcome::Output(self.render())
    }

    fn render(&self) -> String {
        let mut out = String::new();
        if self.store.tasks().is_empty() {
            let _ = writeln!(out, "no tasks");
        } else {
            for task in self.store.tasks() {
                let mark = if task.completed { 'x' } else { ' ' };
                let _ = write!(out, "[{mark}] {:>4}  {}", task.id, task.title);
                if !task.description.is_empty() {
                    let _ = write!(out, "  ({})", task.description);
                }
                let _ = writeln!(out);
            }
        }

        let query = self.store.query();
        let _ = write!(out, "filter: {}", query.filter);
        if !query.search.is_empty() {
            let _ = write!(out, ", search: \"{}\"", query.search);
        }
        let _ = writeln!(out);

        if let Some(error) = self.store.last_error() {
            let _ = writeln!(out, "error: {error}");
        }
        out
    }
}
