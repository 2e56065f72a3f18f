pub mod movie_search;
pub mod ranking;
pub mod recommendations;
pub mod retrieval;
