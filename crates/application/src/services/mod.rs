mod answer_rebuilder;
mod reply_classifier;

pub use answer_rebuilder::{AnswerRebuilder, CraftedAnswer, Provenance, RebuildOutcome};
pub use reply_classifier::{Classification, ReplyClassifier};
