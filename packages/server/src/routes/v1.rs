use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{admin, contest, leaderboard, movie, movie_list};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/contests", contest_routes())
        .nest("/movies", movie_routes())
        .nest("/movie-lists", movie_list_routes())
        .nest("/admin", admin_routes())
}

fn contest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(contest::list_contests))
        .routes(routes!(contest::get_contest))
        .routes(routes!(contest::list_contest_movies))
        .routes(routes!(
            contest::get_contest_recommend,
            contest::add_contest_recommend,
            contest::remove_contest_recommend
        ))
        .routes(routes!(leaderboard::list_top_creators))
        .routes(routes!(leaderboard::list_top_curators))
        .routes(routes!(leaderboard::my_creator_position))
        .routes(routes!(leaderboard::my_curator_position))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(movie::recommend_movie, movie::unrecommend_movie))
}

fn movie_list_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(movie_list::list_movie_lists))
        .routes(routes!(movie_list::get_movie_list))
        .routes(routes!(
            movie_list::like_movie_list,
            movie_list::unlike_movie_list
        ))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(admin::refresh_leaderboard))
        .routes(routes!(admin::approve_crew_request))
        .routes(routes!(admin::decline_crew_request))
}
