//! Static model catalog and task-based model selection.
//!
//! The catalog is pure data: it is built once on first use, never mutated, and
//! shared through an `Arc` by every client created in the process.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lightweight chat model, used whenever nothing more specific is requested.
pub const DEFAULT_CHAT_MODEL: &str = "grok-3-mini-beta";
/// Default model for image understanding.
pub const DEFAULT_VISION_MODEL: &str = "grok-2-latest";
/// Default model for embeddings.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Metadata of a single model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub capabilities: Vec<String>,
    pub context_window: u32,
    pub max_output: u32,
}

impl ModelDescriptor {
    fn new(
        id: &str,
        name: &str,
        capabilities: &[&str],
        context_window: u32,
        max_output: u32,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            context_window,
            max_output,
        }
    }

    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

/// Task complexity hint used for automatic model selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskComplexity {
    Simple,
    Complex,
    Reasoning,
    Research,
}

impl TaskComplexity {
    /// Parse a complexity hint. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "simple" => Some(Self::Simple),
            "complex" => Some(Self::Complex),
            "reasoning" => Some(Self::Reasoning),
            "research" => Some(Self::Research),
            _ => None,
        }
    }

    pub fn model_id(self) -> &'static str {
        match self {
            Self::Simple => DEFAULT_CHAT_MODEL,
            Self::Complex => "grok-3",
            Self::Reasoning => "grok-3-reasoner",
            Self::Research => "grok-3-deepsearch",
        }
    }
}

/// Pick a model id for a complexity hint. Total: anything unrecognized
/// (including `None`) maps to the lightweight chat model.
pub fn select_model(task_complexity: Option<&str>) -> &'static str {
    task_complexity
        .and_then(TaskComplexity::parse)
        .map(TaskComplexity::model_id)
        .unwrap_or(DEFAULT_CHAT_MODEL)
}

/// Read-only, ordered model catalog.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
}

static BUILTIN: Lazy<Arc<ModelCatalog>> = Lazy::new(|| {
    Arc::new(ModelCatalog {
        models: vec![
            ModelDescriptor::new(
                "grok-2-latest",
                "Grok 2 Latest",
                &["chat", "reasoning", "code", "analysis"],
                128_000,
                4_096,
            ),
            ModelDescriptor::new(
                "grok-3",
                "Grok 3",
                &["chat", "reasoning", "code", "analysis", "advanced"],
                128_000,
                8_192,
            ),
            ModelDescriptor::new(
                "grok-3-reasoner",
                "Grok 3 Reasoner",
                &["chat", "reasoning", "complex_analysis", "multi_step"],
                128_000,
                8_192,
            ),
            ModelDescriptor::new(
                "grok-3-deepsearch",
                "Grok 3 DeepSearch",
                &["chat", "research", "web_search", "fact_checking"],
                128_000,
                8_192,
            ),
            ModelDescriptor::new(
                "grok-3-mini-beta",
                "Grok 3 Mini Beta",
                &["chat", "basic_reasoning", "code"],
                64_000,
                4_096,
            ),
        ],
    })
});

impl ModelCatalog {
    /// The process-wide catalog of Grok models.
    pub fn builtin() -> Arc<ModelCatalog> {
        BUILTIN.clone()
    }

    /// Build a catalog from explicit entries. Later duplicates of an id are dropped.
    pub fn from_models(models: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut unique: Vec<ModelDescriptor> = Vec::new();
        for model in models {
            if !unique.iter().any(|m| m.id == model.id) {
                unique.push(model);
            }
        }
        Self { models: unique }
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<String> {
        self.models.iter().map(|m| m.id.clone()).collect()
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Markdown overview of every model, one section per entry.
    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::new();
        for model in &self.models {
            lines.push(format!("## {} ({})", model.name, model.id));
            lines.push(format!("- Capabilities: {}", model.capabilities.join(", ")));
            lines.push(format!(
                "- Context Window: {} tokens",
                group_thousands(model.context_window)
            ));
            lines.push(format!("- Max Output: {} tokens", group_thousands(model.max_output)));
            lines.push(String::new());
        }
        lines.join("\n")
    }
}

fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
