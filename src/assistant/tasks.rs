// Task store
// Owner tasks persisted as TOML under the data directory

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// Tasks live in `<data_dir>/tasks.toml`. Every mutation saves the whole
/// file; the store is small and the write keeps state crash-safe.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn load(path: PathBuf) -> Result<Self> {
        let tasks = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: TaskFile = toml::from_str(&contents)
                .with_context(|| format!("Invalid task file {}", path.display()))?;
            file.tasks
        } else {
            Vec::new()
        };

        Ok(Self { path, tasks })
    }

    pub fn add(
        &mut self,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
        priority: TaskPriority,
        tags: Vec<String>,
    ) -> Result<Task> {
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            due_date,
            priority,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            tags,
        };

        self.tasks.push(task.clone());
        self.save()?;
        tracing::info!(task_id = task.id.as_str(), title, "Task added");
        Ok(task)
    }

    /// Open tasks, soonest due date first, undated tasks last. Order is
    /// stable so undated tasks keep their creation order.
    pub fn pending(&self, priority: Option<TaskPriority>) -> Vec<&Task> {
        let mut open: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .filter(|t| priority.map(|p| t.priority == p).unwrap_or(true))
            .collect();

        open.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        open
    }

    /// Mark an open task completed. Returns true only on the transition;
    /// an unknown id or an already-completed task returns false.
    pub fn complete(&mut self, task_id: &str) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(false);
        };
        if task.status == TaskStatus::Completed {
            return Ok(false);
        }

        task.status = TaskStatus::Completed;
        let title = task.title.clone();
        self.save()?;
        tracing::info!(task_id, title = title.as_str(), "Task completed");
        Ok(true)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .count()
    }

    /// Open tasks at High or Urgent priority
    pub fn high_priority_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Completed)
            .filter(|t| matches!(t.priority, TaskPriority::High | TaskPriority::Urgent))
            .count()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = TaskFile {
            tasks: self.tasks.clone(),
        };
        let toml_string = toml::to_string_pretty(&file).context("Failed to serialize tasks")?;
        fs::write(&self.path, toml_string)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
