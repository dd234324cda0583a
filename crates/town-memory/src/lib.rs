//! Memory stream with recency/relevance/importance retrieval, plus the
//! importance-driven reflection trigger.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod reflection;
pub mod stream;

pub use reflection::{fallback_insights, Insight, ReflectionTrigger, DEFAULT_REFLECTION_THRESHOLD};
pub use stream::{
    cosine_similarity, min_max_normalize, MemoryKind, MemoryRecord, MemoryStream, Retrieved,
    DEFAULT_RECENCY_DECAY,
};
