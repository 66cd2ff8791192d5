mod ids;
mod quiz;
mod result;
mod summary;

pub use ids::{ParseIdError, QuizId};
pub use quiz::{Question, QuestionDraft, Quiz, QuizCatalog, QuizDraft, QuizError, QuizListing};
pub use result::{NewResultRecord, ResultFeedback, ResultRecord};
pub use summary::{ProficiencyBand, QuizStat, UserSummary};
