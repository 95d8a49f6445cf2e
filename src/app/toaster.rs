use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToasterPosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToasterOptions {
    pub position: ToasterPosition,
    pub rich_colors: bool,
    pub visible_toasts: usize,
}

impl Default for ToasterOptions {
    fn default() -> Self {
        Self {
            position: ToasterPosition::TopRight,
            rich_colors: true,
            visible_toasts: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Info => "ℹ️",
            ToastKind::Warning => "⚠️",
            ToastKind::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// Terminal rendering; `rich` adds the kind icon.
    pub fn render(&self, rich: bool) -> String {
        if rich {
            format!("{} {}", self.kind.icon(), self.message)
        } else {
            self.message.clone()
        }
    }
}

/// Global notification host. Holds every toast raised during a render and
/// mirrors each one to the log.
pub struct Toaster {
    options: ToasterOptions,
    next_id: AtomicU64,
    toasts: Mutex<VecDeque<Toast>>,
}

impl Toaster {
    pub fn new(options: ToasterOptions) -> Self {
        Self {
            options,
            next_id: AtomicU64::new(1),
            toasts: Mutex::new(VecDeque::new()),
        }
    }

    pub fn options(&self) -> &ToasterOptions {
        &self.options
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message.into())
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message.into())
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Warning, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message.into())
    }

    fn push(&self, kind: ToastKind, message: String) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match kind {
            ToastKind::Success | ToastKind::Info => tracing::info!(toast_id = id, "{}", message),
            ToastKind::Warning => tracing::warn!(toast_id = id, "{}", message),
            ToastKind::Error => tracing::error!(toast_id = id, "{}", message),
        }
        self.queue().push_back(Toast {
            id,
            kind,
            message,
            created_at: Utc::now(),
        });
        id
    }

    /// Newest toasts first, at most `visible_toasts` of them.
    pub fn toasts(&self) -> Vec<Toast> {
        self.queue()
            .iter()
            .rev()
            .take(self.options.visible_toasts)
            .cloned()
            .collect()
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.queue();
        let before = queue.len();
        queue.retain(|t| t.id != id);
        queue.len() != before
    }

    /// Remove and return every toast, oldest first.
    pub fn drain(&self) -> Vec<Toast> {
        self.queue().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue().is_empty()
    }
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new(ToasterOptions::default())
    }
}
