// Daily summary rendering

const RULE_WIDTH: usize = 40;

/// Render the owner's daily status block
pub fn daily_summary(
    owner: &str,
    pending_tasks: usize,
    high_priority: usize,
    active_reminders: usize,
    moltbook_active: bool,
) -> String {
    let rule = "═".repeat(RULE_WIDTH);
    let moltbook = if moltbook_active { "active" } else { "disabled" };

    format!(
        "Daily summary for {owner}\n\
         {rule}\n\
         Pending tasks: {pending_tasks} ({high_priority} high priority)\n\
         Active reminders: {active_reminders}\n\
         Moltbook: {moltbook}\n\
         {rule}"
    )
}
