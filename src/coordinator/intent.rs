// Intent routing
// Keyword classification of owner messages

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AddTask,
    SetReminder,
    Search,
    Social,
    Summary,
    SmallTalk,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::AddTask => "add_task",
            Intent::SetReminder => "set_reminder",
            Intent::Search => "search",
            Intent::Social => "social",
            Intent::Summary => "summary",
            Intent::SmallTalk => "small_talk",
        }
    }
}

const TASK_WORDS: &[&str] = &["task", "todo", "remind me", "add"];
const SEARCH_WORDS: &[&str] = &["search", "find", "look up", "what is", "how to"];
const SOCIAL_WORDS: &[&str] = &["moltbook", "post", "share", "social"];
const SUMMARY_WORDS: &[&str] = &["summary", "status", "overview"];

/// Classify a message by the first matching keyword group. The groups
/// are checked in a fixed order, so "add a task and post it" is a task
/// request, not a social one. Anything unmatched is small talk.
pub fn route(message: &str) -> Intent {
    let lower = message.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    let intent = if contains_any(TASK_WORDS) {
        // "remind me" shares keywords with tasks; the verb decides
        if lower.contains("remind") {
            Intent::SetReminder
        } else {
            Intent::AddTask
        }
    } else if contains_any(SEARCH_WORDS) {
        Intent::Search
    } else if contains_any(SOCIAL_WORDS) {
        Intent::Social
    } else if contains_any(SUMMARY_WORDS) {
        Intent::Summary
    } else {
        Intent::SmallTalk
    };

    tracing::debug!(intent = intent.as_str(), "Routed message");
    intent
}
