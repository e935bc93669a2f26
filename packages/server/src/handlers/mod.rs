pub mod admin;
pub mod contest;
pub mod leaderboard;
pub mod movie;
pub mod movie_list;
