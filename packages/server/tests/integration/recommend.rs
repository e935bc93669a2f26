use chrono::Duration;
use common::{ContestState, MovieState};
use serde_json::json;

use crate::common::{ContestFixture, MovieFixture, TestApp, routes};

mod contest_curation {
    use super::*;

    #[tokio::test]
    async fn fills_list_up_to_capacity_then_rejects() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;

        for i in 0..20 {
            let movie = app.create_entry(&format!("Film {i}"), contest.id).await;
            let res = app
                .post_with_token(
                    &routes::contest_recommend(contest.id),
                    &json!({ "movie": movie.id }),
                    &curator.token,
                )
                .await;
            assert_eq!(res.status, 200, "pick {i} failed: {}", res.text);
            assert_eq!(res.body["recommended"], i + 1);
        }

        let extra = app.create_entry("Film 20", contest.id).await;
        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": extra.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CAPACITY_EXCEEDED");
        assert_eq!(
            res.rejection(),
            "You can only recommended 20 films for Spring Shorts contest"
        );
        assert_eq!(app.find_movie(extra.id).await.recommend_count, 0);

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommended"], 20);
        assert_eq!(res.body["max_recommends"], 20);
    }

    #[tokio::test]
    async fn finished_contest_rejects_picks() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Closed Shorts",
                ContestFixture {
                    state: ContestState::Finished,
                    ..Default::default()
                },
            )
            .await;
        let movie = app.create_entry("Late Film", contest.id).await;

        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "NOT_ELIGIBLE");
        assert_eq!(res.rejection(), "Contest is not live");

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.body["recommended"], 0);
        assert_eq!(app.find_movie(movie.id).await.recommend_count, 0);
    }

    #[tokio::test]
    async fn contest_outside_its_window_is_not_live() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Future Shorts",
                ContestFixture {
                    starts_in: Duration::days(2),
                    ends_in: Duration::days(12),
                    ..Default::default()
                },
            )
            .await;
        let movie = app.create_entry("Early Film", contest.id).await;

        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.rejection(), "Contest is not live");
    }

    #[tokio::test]
    async fn film_from_another_contest_is_rejected() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let other = app.create_live_contest("Autumn Shorts").await;
        let movie = app.create_entry("Elsewhere", other.id).await;

        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "NOT_ELIGIBLE");
        assert_eq!(res.rejection(), "Film hasn't participated in this contest");
    }

    #[tokio::test]
    async fn unpublished_or_missing_film_is_rejected() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let draft = app
            .create_movie(
                "Draft",
                Some(contest.id),
                MovieFixture {
                    state: MovieState::Submitted,
                    published_ago: None,
                    ..Default::default()
                },
            )
            .await;

        for movie_id in [draft.id, 999_999] {
            let res = app
                .post_with_token(
                    &routes::contest_recommend(contest.id),
                    &json!({ "movie": movie_id }),
                    &curator.token,
                )
                .await;
            assert_eq!(res.status, 400);
            assert_eq!(res.rejection(), "Film hasn't participated in this contest");
        }
    }

    #[tokio::test]
    async fn elapsed_recommend_window_is_rejected() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Weekly Shorts",
                ContestFixture {
                    days_per_movie: 7,
                    ..Default::default()
                },
            )
            .await;
        let movie = app
            .create_movie(
                "Old Film",
                Some(contest.id),
                MovieFixture {
                    published_ago: Some(Duration::days(10)),
                    ..Default::default()
                },
            )
            .await;

        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "NOT_ELIGIBLE");
        assert_eq!(
            res.rejection(),
            "Films in Weekly Shorts contest can be recommended only within 7 days of their release date"
        );
    }

    #[tokio::test]
    async fn repeated_pick_is_counted_once() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;

        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;
        let res = app
            .post_with_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
                &curator.token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommended"], 1);
        assert_eq!(app.find_movie(movie.id).await.recommend_count, 1);
    }

    #[tokio::test]
    async fn remove_drops_pick_and_is_idempotent() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Second Thoughts", contest.id).await;
        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;

        for _ in 0..2 {
            let res = app
                .delete_with_body(
                    &routes::contest_recommend(contest.id),
                    &json!({ "movie": movie.id }),
                    &curator.token,
                )
                .await;
            assert_eq!(res.status, 200, "remove failed: {}", res.text);
            assert_eq!(res.body["recommended"], 0);
        }
        assert_eq!(app.find_movie(movie.id).await.recommend_count, 0);
    }

    #[tokio::test]
    async fn curation_list_is_named_after_contest_and_frozen() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;
        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;

        let res = app
            .get_without_token(&format!(
                "{}?owner_id={}&contest_id={}",
                routes::MOVIE_LISTS,
                curator.user.id,
                contest.id
            ))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        let list = &res.body["data"][0];
        assert_eq!(list["name"], "Spring Shorts");
        assert_eq!(list["frozen"], true);
        assert_eq!(list["movies_count"], 1);
    }

    #[tokio::test]
    async fn concurrent_picks_never_overfill_list() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Tiny Shorts",
                ContestFixture {
                    max_recommends: 3,
                    ..Default::default()
                },
            )
            .await;
        let mut movies = Vec::new();
        for i in 0..5 {
            movies.push(app.create_entry(&format!("Film {i}"), contest.id).await);
        }
        app.recommend_in_contest(contest.id, movies[0].id, &curator.token)
            .await;

        let path = routes::contest_recommend(contest.id);
        let pick = |movie_id: i32| {
            let body = json!({ "movie": movie_id });
            let path = path.clone();
            let token = curator.token.clone();
            let app = &app;
            async move { app.post_with_token(&path, &body, &token).await }
        };
        let (a, b, c, d) = tokio::join!(
            pick(movies[1].id),
            pick(movies[2].id),
            pick(movies[3].id),
            pick(movies[4].id)
        );

        let results = [&a, &b, &c, &d];
        let accepted = results.iter().filter(|r| r.status == 200).count();
        assert_eq!(accepted, 2);
        for res in results.into_iter().filter(|r| r.status != 200) {
            assert_eq!(res.body["code"], "CAPACITY_EXCEEDED", "{}", res.text);
        }

        let res = app.get_with_token(&path, &curator.token).await;
        assert_eq!(res.body["recommended"], 3);
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;

        let res = app
            .post_without_token(
                &routes::contest_recommend(contest.id),
                &json!({ "movie": movie.id }),
            )
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), "not-a-token")
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn unknown_contest_returns_404() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;

        let res = app
            .get_with_token(&routes::contest_recommend(999_999), &curator.token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod recommend_toggle {
    use super::*;

    #[tokio::test]
    async fn live_film_lands_in_both_lists() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;

        let res = app
            .put_with_token(&routes::movie_recommend(movie.id), &curator.token)
            .await;

        assert_eq!(res.status, 200, "recommend failed: {}", res.text);
        assert_eq!(res.body["recommend_count"], 1);
        assert!(res.body["recommend_deadline"].is_string());

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.body["recommended"], 1);

        let res = app
            .get_without_token(&format!(
                "{}?owner_id={}&include_global=true",
                routes::MOVIE_LISTS,
                curator.user.id
            ))
            .await;
        assert_eq!(res.body["pagination"]["total"], 2);
    }

    #[tokio::test]
    async fn film_outside_contest_lands_only_in_global_list() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let movie = app.create_movie("Indie", None, MovieFixture::default()).await;

        let res = app
            .put_with_token(&routes::movie_recommend(movie.id), &curator.token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommend_count"], 0);

        let res = app
            .get_without_token(&format!(
                "{}?owner_id={}&include_global=true",
                routes::MOVIE_LISTS,
                curator.user.id
            ))
            .await;
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["name"], "Recommendation");
        assert_eq!(res.body["data"][0]["frozen"], false);
    }

    #[tokio::test]
    async fn recommend_twice_then_withdraw() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;
        let path = routes::movie_recommend(movie.id);

        app.put_with_token(&path, &curator.token).await;
        let res = app.put_with_token(&path, &curator.token).await;
        assert_eq!(res.body["recommend_count"], 1);

        let res = app.delete_with_token(&path, &curator.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommend_count"], 0);

        let res = app.delete_with_token(&path, &curator.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommend_count"], 0);

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.body["recommended"], 0);
    }

    #[tokio::test]
    async fn elapsed_window_skips_curation_list() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Weekly Shorts",
                ContestFixture {
                    days_per_movie: 7,
                    ..Default::default()
                },
            )
            .await;
        let movie = app
            .create_movie(
                "Old Film",
                Some(contest.id),
                MovieFixture {
                    published_ago: Some(Duration::days(10)),
                    ..Default::default()
                },
            )
            .await;

        let res = app
            .put_with_token(&routes::movie_recommend(movie.id), &curator.token)
            .await;
        assert_eq!(res.status, 200, "recommend failed: {}", res.text);
        assert_eq!(res.body["recommend_count"], 0);

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.body["recommended"], 0);

        let res = app
            .get_without_token(&format!(
                "{}?owner_id={}&include_global=true",
                routes::MOVIE_LISTS,
                curator.user.id
            ))
            .await;
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["name"], "Recommendation");
        assert_eq!(res.body["data"][0]["movies_count"], 1);
    }

    #[tokio::test]
    async fn mixing_endpoints_keeps_count_in_step_with_curation_list() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Favourite", contest.id).await;
        let path = routes::movie_recommend(movie.id);

        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;
        assert_eq!(app.find_movie(movie.id).await.recommend_count, 1);

        let res = app.put_with_token(&path, &curator.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommend_count"], 1);

        let res = app.delete_with_token(&path, &curator.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["recommend_count"], 0);

        let res = app
            .get_with_token(&routes::contest_recommend(contest.id), &curator.token)
            .await;
        assert_eq!(res.body["recommended"], 0);
        assert_eq!(app.find_movie(movie.id).await.recommend_count, 0);
    }

    #[tokio::test]
    async fn full_curation_list_rejects_whole_recommend() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;
        let contest = app
            .create_contest(
                "Tiny Shorts",
                ContestFixture {
                    max_recommends: 1,
                    ..Default::default()
                },
            )
            .await;
        let first = app.create_entry("First", contest.id).await;
        let second = app.create_entry("Second", contest.id).await;

        let res = app
            .put_with_token(&routes::movie_recommend(first.id), &curator.token)
            .await;
        assert_eq!(res.status, 200);

        let res = app
            .put_with_token(&routes::movie_recommend(second.id), &curator.token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "CAPACITY_EXCEEDED");
        assert_eq!(app.find_movie(second.id).await.recommend_count, 0);

        let res = app
            .get_without_token(&format!(
                "{}?owner_id={}&include_global=true",
                routes::MOVIE_LISTS,
                curator.user.id
            ))
            .await;
        for list in res.body["data"].as_array().unwrap() {
            assert_eq!(list["movies_count"], 1, "list {}", list["name"]);
        }
    }

    #[tokio::test]
    async fn unknown_film_returns_404() {
        let app = TestApp::spawn().await;
        let curator = app.create_member("alice", false).await;

        let res = app
            .put_with_token(&routes::movie_recommend(999_999), &curator.token)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
