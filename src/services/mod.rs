pub mod analysis;
pub mod discovery;
pub mod providers;
pub mod recommendations;
pub mod search;
pub mod top_movies;
