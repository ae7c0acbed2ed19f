pub mod flashcard;
pub mod flashcard_set;
pub mod user;

pub use flashcard::{CardChanges, Flashcard, NewCard};
pub use flashcard_set::{FlashcardSet, NewSet, SetChanges, Visibility};
pub use user::{NewUser, ProfileChanges, PublicUser, User, UserProfile};
