//! Task model shared by the `TaskDeck` client and server.
//!
//! Defines the [`Task`] entity, the [`TaskDraft`] / [`TaskPatch`] mutation
//! payloads, the [`TaskFilter`] / [`TaskQuery`] selection types, and the
//! field validation rules both sides enforce.

use serde::{Deserialize, Serialize};

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Unique identifier for a task, assigned by the remote store at creation.
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task identifier from its numeric value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the numeric value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A titled, completable item in the task list.
///
/// `description` and `completed` default when absent from a JSON payload,
/// so a minimal record of `{"id": 1, "title": "x"}` decodes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Short label, 1 to [`MAX_TITLE_LENGTH`] characters.
    pub title: String,
    /// Free-form body text, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Whether the task has been marked done.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Applies a partial update in place. Fields absent from the patch
    /// keep their current values.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Payload for creating a task. The id is assigned by the store.
///
/// Optional fields are omitted from the serialized body when unset, so the
/// store applies its own defaults (empty description, not completed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Title of the new task.
    pub title: String,
    /// Initial description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial completion state, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskDraft {
    /// Creates a draft with only a title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: None,
        }
    }

    /// Sets the initial description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial completion state.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Partial update for an existing task. Only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement description (an empty string clears it).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement completion state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Sets the replacement title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement completion state.
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

/// Which slice of the collection a query selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// Every task, regardless of completion.
    #[default]
    All,
    /// Only tasks not yet completed.
    Pending,
    /// Only completed tasks.
    Completed,
}

impl TaskFilter {
    /// Returns the wire value of this filter (`all`, `pending`, `completed`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing a [`TaskFilter`] from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0}")]
pub struct ParseFilterError(pub String);

impl std::str::FromStr for TaskFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// The filter/search pair that selects a view of the collection.
///
/// Serializes to the list endpoint's query string: `status` always, `search`
/// only when non-empty. The same shape deserializes on the server side, so
/// client and server agree on parameter names by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Completion filter, sent as the `status` parameter.
    #[serde(rename = "status", default)]
    pub filter: TaskFilter,
    /// Case-insensitive text search over title and description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
}

impl TaskQuery {
    /// Creates a query from a filter and a search string.
    pub fn new(filter: TaskFilter, search: impl Into<String>) -> Self {
        Self {
            filter,
            search: search.into(),
        }
    }

    /// Returns this query with the filter replaced.
    #[must_use]
    pub fn with_filter(mut self, filter: TaskFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns this query with the search string replaced.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Whether a task satisfies both the filter and the search.
    ///
    /// The search matches when the lowercased needle occurs in the
    /// lowercased title or description. An empty search matches everything.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let filter_ok = match self.filter {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        };
        if !filter_ok {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }
}

/// Validates a creation payload, returning one message per violation.
///
/// An empty vector means the draft is acceptable. Lengths are counted in
/// characters, not bytes.
#[must_use]
pub fn validate_draft(draft: &TaskDraft) -> Vec<String> {
    let mut violations = Vec::new();
    if draft.title.is_empty() {
        violations.push("title must not be empty".to_string());
    } else if draft.title.chars().count() > MAX_TITLE_LENGTH {
        violations.push(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        ));
    }
    if let Some(description) = &draft.description
        && description.chars().count() > MAX_DESCRIPTION_LENGTH
    {
        violations.push(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    violations
}

/// Validates a partial update, returning one message per violation.
///
/// Applies the same rules as [`validate_draft`], but only to the fields the
/// patch actually carries.
#[must_use]
pub fn validate_patch(patch: &TaskPatch) -> Vec<String> {
    let mut violations = Vec::new();
    if let Some(title) = &patch.title {
        if title.is_empty() {
            violations.push("title must not be empty".to_string());
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            violations.push(format!(
                "title must be at most {MAX_TITLE_LENGTH} characters"
            ));
        }
    }
    if let Some(description) = &patch.description
        && description.chars().count() > MAX_DESCRIPTION_LENGTH
    {
        violations.push(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    violations
}
