mod persist;
mod workflow;

pub use persist::PersistHandle;
pub use workflow::{Advance, CompletedQuiz, QuizService};
