pub mod contest;
pub mod crew_member;
pub mod crew_member_request;
pub mod crew_role;
pub mod movie;
pub mod movie_list;
pub mod movie_list_like;
pub mod movie_list_movie;
pub mod profile;
pub mod top_creator;
pub mod top_curator;
pub mod user;
