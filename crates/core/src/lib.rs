#![forbid(unsafe_code)]

pub mod aggregate;
pub mod model;
pub mod name;
pub mod score;
pub mod session;
pub mod time;

pub use aggregate::aggregate;
pub use name::normalize_name;
pub use session::{AnswerFeedback, QuizSession, SessionError, SessionProgress, SessionState, Step};
pub use time::Clock;
