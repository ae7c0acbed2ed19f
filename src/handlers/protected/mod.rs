pub mod flashcards;
pub mod users;
