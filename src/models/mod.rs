pub mod event;
pub mod film;

pub use event::{Event, EventOperation, EventType, NewEvent};
pub use film::{Director, Film, FilmRow, Genre, Mpa};
