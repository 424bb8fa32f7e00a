pub mod filter_answer;

pub use filter_answer::{FilterAnswerUseCase, QueryData, SubstitutionState};
