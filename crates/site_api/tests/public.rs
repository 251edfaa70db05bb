mod base;

use actix_web::test;
use entity::games;
use esports_lib::repo::settings;
use sea_orm::{ActiveValue::Set, EntityTrait as _};

#[derive(serde::Deserialize)]
struct Tournament {
    id: i32,
    name: String,
    game_name: Option<String>,
    current_participants: i32,
    registration_count: i64,
}

async fn register<S, B>(app: &S, tournament_id: i32, captain: &str) -> anyhow::Result<()>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/tournaments_register")
        .set_json(serde_json::json!({
            "tournament_id": tournament_id,
            "captain_name": captain,
            "captain_email": format!("{}@x.com", captain.to_lowercase()),
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    Ok(())
}

#[tokio::test]
async fn test_tournament_list() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Valorant").await?;
        let early = base::insert_tournament(&db, game_id, "Early Cup", base::in_days(2)).await?;
        let late = base::insert_tournament(&db, game_id, "Late Cup", base::in_days(20)).await?;

        let app = base::get_app(db.clone()).await;
        register(&app, early, "Alice").await?;
        register(&app, early, "Bob").await?;

        let req = test::TestRequest::get().uri("/tournaments").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Vec<Tournament>>>(&body)?;
        assert_eq!(body.count, Some(2));

        // The most distant start date first
        let [first, second] = body.data.as_slice() else {
            panic!("Expected 2 tournaments");
        };
        assert_eq!(first.id, late);
        assert_eq!(first.registration_count, 0);
        assert_eq!(second.id, early);
        assert_eq!(second.name, "Early Cup");
        assert_eq!(second.game_name.as_deref(), Some("Valorant"));
        assert_eq!(second.registration_count, 2);
        assert_eq!(second.current_participants, 2);

        let req = test::TestRequest::get()
            .uri("/tournaments?limit=1&offset=1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Vec<Tournament>>>(&body)?;
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].id, early);

        let req = test::TestRequest::get().uri("/tournaments/4242").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_active_games_only() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Game {
        name: String,
    }

    base::with_db(async |db| {
        base::insert_game(&db, "Valorant").await?;
        let retired = base::insert_game(&db, "Paladins").await?;
        games::Entity::update(games::ActiveModel {
            id: Set(retired),
            is_active: Set(false),
            ..Default::default()
        })
        .exec(&db.sql_conn)
        .await?;

        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::get().uri("/games").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Vec<Game>>>(&body)?;
        let names = body.data.iter().map(|g| g.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Valorant"]);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_stats() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Stats {
        tournaments: u64,
        registrations: u64,
        players: u64,
        games: u64,
    }

    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Valorant").await?;
        let tournament_id =
            base::insert_tournament(&db, game_id, "Campus Cup", base::in_days(4)).await?;

        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::post()
            .uri("/tournaments_register")
            .set_json(serde_json::json!({
                "tournament_id": tournament_id,
                "captain_name": "Alice",
                "captain_email": "a@x.com",
                "team_members": [{ "name": "Bob" }],
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        let req = test::TestRequest::get().uri("/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Stats>>(&body)?;
        assert_eq!(body.data.tournaments, 1);
        assert_eq!(body.data.registrations, 1);
        assert_eq!(body.data.players, 2);
        assert_eq!(body.data.games, 1);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_countdown() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Countdown {
        title: String,
        source: String,
        seconds_remaining: i64,
    }

    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;

        let req = test::TestRequest::get().uri("/countdown").to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Option<Countdown>>>(&body)?;
        assert!(body.data.is_none());
        assert_eq!(body.message, "Nothing upcoming");

        let game_id = base::insert_game(&db, "Valorant").await?;
        base::insert_tournament(&db, game_id, "Campus Cup", base::in_days(4)).await?;

        let req = test::TestRequest::get().uri("/countdown").to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Option<Countdown>>>(&body)?;
        let countdown = body
            .data
            .unwrap_or_else(|| panic!("Countdown should target the tournament"));
        assert_eq!(countdown.source, "tournament");
        assert_eq!(countdown.title, "Campus Cup");
        assert!(countdown.seconds_remaining > 0);

        settings::upsert(
            &db.sql_conn,
            settings::COUNTDOWN_TARGET.to_owned(),
            base::in_days(1).format("%Y-%m-%d %H:%M:%S").to_string(),
        )
        .await?;

        let req = test::TestRequest::get().uri("/countdown").to_request();
        let resp = test::call_service(&app, req).await;
        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Option<Countdown>>>(&body)?;
        let countdown = body
            .data
            .unwrap_or_else(|| panic!("Countdown should target the setting"));
        assert_eq!(countdown.source, "setting");

        anyhow::Ok(())
    })
    .await
}
