pub mod movie;
pub mod recommendation;

pub use movie::{CandidateRow, MovieCandidate, MovieSearchResult, SearchRow};
pub use recommendation::{
    MergedRecommendation, RankingPolicy, RecommendationResponse, ScoredCandidate,
};
