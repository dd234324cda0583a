use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use town_core::{Embedder, Tick};

pub const DEFAULT_RECENCY_DECAY: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Observation,
    Action,
    Plan,
    Reflection,
}

impl MemoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MemoryKind::Observation => "observation",
            MemoryKind::Action => "action",
            MemoryKind::Plan => "plan",
            MemoryKind::Reflection => "reflection",
        }
    }

    /// Importance used when the backend gives no usable score.
    pub fn fallback_importance(self) -> u8 {
        match self {
            MemoryKind::Observation => 2,
            MemoryKind::Action => 3,
            MemoryKind::Plan => 1,
            MemoryKind::Reflection => 3,
        }
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub description: String,
    pub created_at: Tick,
    pub last_accessed_at: Tick,
    pub importance: u8,
    #[serde(rename = "type")]
    pub kind: MemoryKind,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// One retrieval hit with its combined score.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    pub record: MemoryRecord,
    pub score: f64,
}

/// Append-only memory log for a single agent.
///
/// Records are never removed or rewritten; retrieval only refreshes
/// `last_accessed_at` on the records it returns.
pub struct MemoryStream {
    agent_id: String,
    embedder: Rc<dyn Embedder>,
    recency_decay: f64,
    records: Vec<MemoryRecord>,
}

impl fmt::Debug for MemoryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStream")
            .field("agent_id", &self.agent_id)
            .field("recency_decay", &self.recency_decay)
            .field("records", &self.records.len())
            .finish()
    }
}

impl MemoryStream {
    pub fn new(agent_id: impl Into<String>, embedder: Rc<dyn Embedder>) -> Self {
        Self {
            agent_id: agent_id.into(),
            embedder,
            recency_decay: DEFAULT_RECENCY_DECAY,
            records: Vec::new(),
        }
    }

    pub fn with_recency_decay(mut self, decay: f64) -> Self {
        self.recency_decay = decay;
        self
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MemoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// The last `n` records, oldest first.
    pub fn latest(&self, n: usize) -> &[MemoryRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    /// Embed and store a new record; `last_accessed_at` starts at `tick`.
    pub fn append(
        &mut self,
        description: impl Into<String>,
        tick: Tick,
        importance: u8,
        kind: MemoryKind,
        links: Vec<String>,
    ) -> MemoryRecord {
        let description = description.into();
        let embedding = self.embedder.embed(&description);
        let record = MemoryRecord {
            id: format!("{}-m{}", self.agent_id, self.records.len() + 1),
            description,
            created_at: tick,
            last_accessed_at: tick,
            importance,
            kind,
            links,
            embedding,
        };
        self.records.push(record.clone());
        record
    }

    /// Top-`k` records by normalized recency + relevance + importance.
    ///
    /// Each column is min-max normalized on its own; a constant column
    /// contributes nothing. Equal scores keep insertion order. Returned
    /// records have `last_accessed_at` set to `current_tick`.
    pub fn retrieve(&mut self, query: &str, current_tick: Tick, k: usize) -> Vec<Retrieved> {
        if self.records.is_empty() || k == 0 {
            return Vec::new();
        }
        let query_embedding = self.embedder.embed(query);

        let recency: Vec<f64> = self
            .records
            .iter()
            .map(|r| {
                let age = current_tick.saturating_sub(r.last_accessed_at) as f64;
                (-self.recency_decay * age).exp()
            })
            .collect();
        let relevance: Vec<f64> = self
            .records
            .iter()
            .map(|r| cosine_similarity(&query_embedding, &r.embedding))
            .collect();
        let importance: Vec<f64> = self
            .records
            .iter()
            .map(|r| f64::from(r.importance))
            .collect();

        let recency = min_max_normalize(&recency);
        let relevance = min_max_normalize(&relevance);
        let importance = min_max_normalize(&importance);

        let mut ranked: Vec<(usize, f64)> = (0..self.records.len())
            .map(|i| (i, recency[i] + relevance[i] + importance[i]))
            .collect();
        // `sort_by` is stable, so ties stay in insertion order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        ranked
            .into_iter()
            .map(|(idx, score)| {
                let record = &mut self.records[idx];
                record.last_accessed_at = current_tick;
                Retrieved {
                    record: record.clone(),
                    score,
                }
            })
            .collect()
    }
}

/// Cosine similarity over the common prefix. Empty or zero-norm vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a[..len].iter().zip(&b[..len]) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let Some(min) = values.iter().copied().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);
    if max == min {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}
