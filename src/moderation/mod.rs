//! Moderation module: regex-first toxicity screening with AI arbitration
pub mod model;
pub mod pipeline;

pub use self::model::{
    AiToxicityVerdict, BatchSummary, CLEAN_CATEGORY, CommentResult, ModerationVerdict, SAFETY_BLOCK_CATEGORY,
    VerdictSource,
};
pub use self::pipeline::ModerationPipeline;
