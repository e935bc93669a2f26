use common::{ContestState, TieBreak};
use serde_json::{Value, json};
use server::config::LeaderboardConfig;

use crate::common::{ContestFixture, MovieFixture, TestApp, routes};

fn rated(jury: f64, audience: f64) -> MovieFixture {
    MovieFixture {
        jury_rating: Some(jury),
        audience_rating: Some(audience),
        ..Default::default()
    }
}

fn rows(body: &Value) -> &Vec<Value> {
    body["data"].as_array().expect("data should be an array")
}

mod top_creators {
    use super::*;

    #[tokio::test]
    async fn rated_director_scores_composite_times_ten() {
        let app = TestApp::spawn().await;
        let director = app.create_member("dora", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app
            .create_movie("Debut", Some(contest.id), rated(5.0, 8.0))
            .await;
        app.add_director(movie.id, director.profile.id).await;

        let report = app.refresh("top-creators").await;
        assert_eq!(report["contests"], 1);
        assert_eq!(report["succeeded"], 1);
        assert_eq!(report["failed"], 0);
        assert_eq!(report["rows"], 1);

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        let row = &rows(&res.body)[0];
        assert_eq!(row["pos"], 1);
        assert_eq!(row["score"], 39.0);
        assert_eq!(row["recommend_count"], 0);
        assert_eq!(row["profile"]["id"], director.profile.id);
        assert_eq!(row["profile"]["name"], "dora");
    }

    #[tokio::test]
    async fn celebrity_picks_weigh_more_than_audience_picks() {
        let app = TestApp::spawn().await;
        let director = app.create_member("dora", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Debut", contest.id).await;
        app.add_director(movie.id, director.profile.id).await;

        let celeb = app.create_member("celeste", true).await;
        let fan1 = app.create_member("fan1", false).await;
        let fan2 = app.create_member("fan2", false).await;
        for token in [&celeb.token, &fan1.token, &fan2.token] {
            app.recommend_in_contest(contest.id, movie.id, token).await;
        }

        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        let row = &rows(&res.body)[0];
        assert_eq!(row["score"], 5.5);
        assert_eq!(row["recommend_count"], 3);
    }

    #[tokio::test]
    async fn co_directors_are_both_ranked() {
        let app = TestApp::spawn().await;
        let first = app.create_member("ann", false).await;
        let second = app.create_member("ben", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app
            .create_movie("Duet", Some(contest.id), rated(6.0, 6.0))
            .await;
        app.add_director(movie.id, first.profile.id).await;
        app.add_director(movie.id, second.profile.id).await;

        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        let data = rows(&res.body);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["score"], data[1]["score"]);
    }

    #[tokio::test]
    async fn equal_scores_break_on_name_descending_by_default() {
        let app = TestApp::spawn().await;
        let alice = app.create_member("Alice", false).await;
        let bob = app.create_member("Bob", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        for (title, director) in [("A", &alice), ("B", &bob)] {
            let movie = app
                .create_movie(title, Some(contest.id), rated(4.0, 4.0))
                .await;
            app.add_director(movie.id, director.profile.id).await;
        }

        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        let data = rows(&res.body);
        assert_eq!(data[0]["profile"]["name"], "Bob");
        assert_eq!(data[0]["pos"], 1);
        assert_eq!(data[1]["profile"]["name"], "Alice");
        assert_eq!(data[1]["pos"], 2);
    }

    #[tokio::test]
    async fn tie_break_follows_configuration() {
        let app = TestApp::spawn_with(LeaderboardConfig {
            creator_tie_break: TieBreak::NameAsc,
            ..Default::default()
        })
        .await;
        let alice = app.create_member("Alice", false).await;
        let bob = app.create_member("Bob", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        for (title, director) in [("A", &alice), ("B", &bob)] {
            let movie = app
                .create_movie(title, Some(contest.id), rated(4.0, 4.0))
                .await;
            app.add_director(movie.id, director.profile.id).await;
        }

        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        assert_eq!(rows(&res.body)[0]["profile"]["name"], "Alice");
    }

    #[tokio::test]
    async fn positions_are_dense_and_scores_non_increasing() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let ratings = [(2.0, 3.0), (9.0, 7.5), (5.0, 5.0), (7.0, 1.0)];
        for (i, (jury, audience)) in ratings.into_iter().enumerate() {
            let director = app.create_member(&format!("director{i}"), false).await;
            let movie = app
                .create_movie(&format!("Film {i}"), Some(contest.id), rated(jury, audience))
                .await;
            app.add_director(movie.id, director.profile.id).await;
        }

        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        let data = rows(&res.body);
        assert_eq!(data.len(), 4);
        for (i, row) in data.iter().enumerate() {
            assert_eq!(row["pos"], i as i64 + 1);
        }
        let scores: Vec<f64> = data.iter().map(|r| r["score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{scores:?}");
        assert_eq!(scores[0], 49.5);
    }

    #[tokio::test]
    async fn rerun_replaces_snapshot() {
        let app = TestApp::spawn().await;
        let first = app.create_member("ann", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app
            .create_movie("One", Some(contest.id), rated(3.0, 3.0))
            .await;
        app.add_director(movie.id, first.profile.id).await;

        app.refresh("top-creators").await;
        app.refresh("top-creators").await;
        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        assert_eq!(res.body["pagination"]["total"], 1);

        let second = app.create_member("ben", false).await;
        let movie = app
            .create_movie("Two", Some(contest.id), rated(9.0, 9.0))
            .await;
        app.add_director(movie.id, second.profile.id).await;

        app.refresh("top-creators").await;
        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        let data = rows(&res.body);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["profile"]["id"], second.profile.id);
        assert_eq!(data[1]["profile"]["id"], first.profile.id);
        assert_eq!(data[1]["pos"], 2);
    }

    #[tokio::test]
    async fn finished_contest_is_not_scored() {
        let app = TestApp::spawn().await;
        let director = app.create_member("dora", false).await;
        let contest = app
            .create_contest(
                "Closed Shorts",
                ContestFixture {
                    state: ContestState::Finished,
                    ..Default::default()
                },
            )
            .await;
        let movie = app
            .create_movie("Debut", Some(contest.id), rated(5.0, 8.0))
            .await;
        app.add_director(movie.id, director.profile.id).await;

        let report = app.refresh("top-creators").await;
        assert_eq!(report["contests"], 0);

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn empty_contest_yields_empty_board() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;

        let report = app.refresh("top-creators").await;
        assert_eq!(report["succeeded"], 1);
        assert_eq!(report["rows"], 0);

        let res = app
            .get_without_token(&routes::top_creators(contest.id))
            .await;
        assert_eq!(res.status, 200);
        assert!(rows(&res.body).is_empty());
    }

    #[tokio::test]
    async fn pages_through_snapshot() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        for (i, jury) in [8.0, 4.0].into_iter().enumerate() {
            let director = app.create_member(&format!("director{i}"), false).await;
            let movie = app
                .create_movie(&format!("Film {i}"), Some(contest.id), rated(jury, jury))
                .await;
            app.add_director(movie.id, director.profile.id).await;
        }
        app.refresh("top-creators").await;

        let res = app
            .get_without_token(&format!(
                "{}?page=2&per_page=1",
                routes::top_creators(contest.id)
            ))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 2);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        let data = rows(&res.body);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["pos"], 2);
    }

    #[tokio::test]
    async fn unknown_contest_returns_404() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(&routes::top_creators(999_999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod top_curators {
    use super::*;

    #[tokio::test]
    async fn curator_matching_celebrity_pool_scores_likes_times_match() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Shared Pick", contest.id).await;

        let celeb = app.create_member("celeste", true).await;
        let curator = app.create_member("ursula", false).await;
        app.recommend_in_contest(contest.id, movie.id, &celeb.token)
            .await;
        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;

        let lists = app
            .get_without_token(&format!(
                "{}?owner_id={}&contest_id={}",
                routes::MOVIE_LISTS,
                curator.user.id,
                contest.id
            ))
            .await;
        let list_id = lists.body["data"][0]["id"].as_i64().unwrap() as i32;
        for name in ["liker1", "liker2"] {
            let liker = app.create_member(name, false).await;
            let res = app
                .put_with_token(&routes::movie_list_like(list_id), &liker.token)
                .await;
            assert_eq!(res.status, 200);
        }

        let report = app.refresh("top-curators").await;
        assert_eq!(report["rows"], 1);

        let res = app
            .get_without_token(&routes::top_curators(contest.id))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 1);
        let row = &rows(&res.body)[0];
        assert_eq!(row["profile"]["id"], curator.profile.id);
        assert_eq!(row["pos"], 1);
        assert_eq!(row["match"], 100.0);
        assert_eq!(row["score"], 200.0);
        assert_eq!(row["likes_on_recommend"], 2);
        assert_eq!(row["recommend_count"], 1);
    }

    #[tokio::test]
    async fn without_overlap_score_is_like_count() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Lonely Pick", contest.id).await;
        let curator = app.create_member("ursula", false).await;
        app.recommend_in_contest(contest.id, movie.id, &curator.token)
            .await;

        let lists = app
            .get_without_token(&format!(
                "{}?owner_id={}",
                routes::MOVIE_LISTS,
                curator.user.id
            ))
            .await;
        let list_id = lists.body["data"][0]["id"].as_i64().unwrap() as i32;
        for name in ["liker1", "liker2", "liker3"] {
            let liker = app.create_member(name, false).await;
            app.put_with_token(&routes::movie_list_like(list_id), &liker.token)
                .await;
        }

        app.refresh("top-curators").await;

        let res = app
            .get_without_token(&routes::top_curators(contest.id))
            .await;
        let row = &rows(&res.body)[0];
        assert_eq!(row["match"], 0.0);
        assert_eq!(row["score"], 3.0);
    }

    #[tokio::test]
    async fn ranks_by_score_not_match() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let m1 = app.create_entry("One", contest.id).await;
        let m2 = app.create_entry("Two", contest.id).await;

        let celeb = app.create_member("celeste", true).await;
        app.recommend_in_contest(contest.id, m1.id, &celeb.token)
            .await;
        app.recommend_in_contest(contest.id, m2.id, &celeb.token)
            .await;

        // Full match with one like versus half match with three likes.
        let full = app.create_member("full", false).await;
        app.recommend_in_contest(contest.id, m1.id, &full.token)
            .await;
        app.recommend_in_contest(contest.id, m2.id, &full.token)
            .await;
        let half = app.create_member("half", false).await;
        app.recommend_in_contest(contest.id, m1.id, &half.token)
            .await;

        for (owner, likes) in [(&full, 1), (&half, 3)] {
            let lists = app
                .get_without_token(&format!(
                    "{}?owner_id={}",
                    routes::MOVIE_LISTS,
                    owner.user.id
                ))
                .await;
            let list_id = lists.body["data"][0]["id"].as_i64().unwrap() as i32;
            for i in 0..likes {
                let liker = app
                    .create_member(&format!("{}-liker{i}", owner.user.username), false)
                    .await;
                app.put_with_token(&routes::movie_list_like(list_id), &liker.token)
                    .await;
            }
        }

        app.refresh("top-curators").await;

        let res = app
            .get_without_token(&routes::top_curators(contest.id))
            .await;
        let data = rows(&res.body);
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["profile"]["id"], half.profile.id);
        assert_eq!(data[0]["score"], 150.0);
        assert_eq!(data[1]["profile"]["id"], full.profile.id);
        assert_eq!(data[1]["score"], 100.0);
    }

    #[tokio::test]
    async fn celebrities_are_not_ranked() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app.create_entry("Pick", contest.id).await;
        let celeb = app.create_member("celeste", true).await;
        app.recommend_in_contest(contest.id, movie.id, &celeb.token)
            .await;

        let report = app.refresh("top-curators").await;
        assert_eq!(report["rows"], 0);

        let res = app
            .get_with_token(&routes::my_curator_position(contest.id), &celeb.token)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod my_position {
    use super::*;

    #[tokio::test]
    async fn returns_callers_row() {
        let app = TestApp::spawn().await;
        let director = app.create_member("dora", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        let movie = app
            .create_movie("Debut", Some(contest.id), rated(5.0, 8.0))
            .await;
        app.add_director(movie.id, director.profile.id).await;
        app.refresh("top-creators").await;

        let res = app
            .get_with_token(&routes::my_creator_position(contest.id), &director.token)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pos"], 1);
        assert_eq!(res.body["score"], 39.0);
        assert_eq!(res.body["profile"]["id"], director.profile.id);
    }

    #[tokio::test]
    async fn unranked_caller_gets_404() {
        let app = TestApp::spawn().await;
        let outsider = app.create_member("olga", false).await;
        let contest = app.create_live_contest("Spring Shorts").await;
        app.refresh("top-creators").await;

        for path in [
            routes::my_creator_position(contest.id),
            routes::my_curator_position(contest.id),
        ] {
            let res = app.get_with_token(&path, &outsider.token).await;
            assert_eq!(res.status, 404);
            assert_eq!(res.body["message"], "You haven't participated in this contest");
        }
    }

    #[tokio::test]
    async fn requires_authentication() {
        let app = TestApp::spawn().await;
        let contest = app.create_live_contest("Spring Shorts").await;

        let res = app
            .get_without_token(&routes::my_creator_position(contest.id))
            .await;

        assert_eq!(res.status, 401);
    }
}

mod refresh {
    use super::*;

    #[tokio::test]
    async fn requires_refresh_permission() {
        let app = TestApp::spawn().await;
        let member = app.create_member("alice", false).await;

        let res = app
            .post_with_token(&routes::refresh("top-creators"), &json!({}), &member.token)
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");

        let res = app
            .post_without_token(&routes::refresh("top-creators"), &json!({}))
            .await;
        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn unknown_board_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(&routes::refresh("top-critics"), &json!({}), &app.admin_token())
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn reports_board_name() {
        let app = TestApp::spawn().await;

        let res = app
            .post_with_token(&routes::refresh("top-curators"), &json!({}), &app.admin_token())
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["board"], "top-curators");
        assert_eq!(res.body["report"]["failed"], 0);
    }
}
