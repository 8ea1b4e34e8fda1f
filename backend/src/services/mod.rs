pub mod clock;
pub mod daily_quiz;
pub mod profile_store;
pub mod profiles;
pub mod question_generator;
pub mod quiz_store;
pub mod tips_generator;
