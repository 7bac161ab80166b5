pub mod movie;
pub mod user;

pub use movie::{Director, Genre, Movie, MovieDetails};
pub use user::{NewUser, User, UserChanges};
