pub mod ranking_index;
pub mod view;

pub use ranking_index::RankingIndex;
pub use view::Ranking;
