mod base;

use actix_http::StatusCode;
use actix_web::test;
use entity::{
    games, registrations, tournaments,
    types::RegistrationStatus,
};
use sea_orm::{ActiveValue::Set, EntityTrait as _, PaginatorTrait as _};

#[tokio::test]
async fn test_login_and_me() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Admin {
        username: String,
        is_active: bool,
    }

    #[derive(serde::Deserialize)]
    struct Me {
        csrf_token: String,
        admin: Admin,
    }

    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::get().uri("/admin/me"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Me>>(&body)?;
        assert_eq!(body.data.admin.username, base::ADMIN_USERNAME);
        assert!(body.data.admin.is_active);
        assert_eq!(body.data.csrf_token, session.csrf_token);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        base::login(&app, &db).await?;

        let req = test::TestRequest::post()
            .uri("/admin/login")
            .set_json(serde_json::json!({
                "username": base::ADMIN_USERNAME,
                "password": "not the password",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 203);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_add_game() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Game {
        id: i32,
        name: String,
        image_url: Option<String>,
    }

    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::post().uri("/admin/games"))
            .set_json(serde_json::json!({
                "name": "Valorant",
                "genre": "Tactical shooter",
                "image_url": "https://cdn.example.org/valorant.png",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Game>>(&body)?;
        assert_eq!(body.data.name, "Valorant");
        assert_eq!(
            body.data.image_url.as_deref(),
            Some("https://cdn.example.org/valorant.png")
        );

        let game = games::Entity::find_by_id(body.data.id)
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Game should be inserted in database"));
        assert!(game.is_active);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_missing_required_field() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::post().uri("/admin/games"))
            .set_json(serde_json::json!({ "genre": "MOBA" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 302);
        assert_eq!(error.message, "name is required");

        assert_eq!(games::Entity::find().count(&db.sql_conn).await?, 0);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_missing_csrf_token() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = test::TestRequest::post()
            .uri("/admin/games")
            .cookie(session.cookie.clone())
            .set_json(serde_json::json!({ "name": "Dota 2" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 204);

        assert_eq!(games::Entity::find().count(&db.sql_conn).await?, 0);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_delete_unknown() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::delete().uri("/admin/events/4242"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 303);
        assert_eq!(error.message, "event with id `4242` not found");

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_add_tournament_unknown_game() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let uploads_before = base::uploaded_files()?;

        let req = session
            .sign(test::TestRequest::post().uri("/admin/tournaments"))
            .set_json(serde_json::json!({
                "game_id": 4242,
                "name": "Ghost Cup",
                "start_date": base::in_days(5).format("%Y-%m-%d %H:%M:%S").to_string(),
                "image_file": {
                    "file_name": "poster.png",
                    "data_base64": "aGVsbG8=",
                },
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        assert_eq!(tournaments::Entity::find().count(&db.sql_conn).await?, 0);
        // The poster saved before the insert failed is removed
        assert_eq!(base::uploaded_files()?, uploads_before);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_update_registration_status() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Valorant").await?;
        let tournament_id =
            base::insert_tournament(&db, game_id, "Campus Cup", base::in_days(10)).await?;
        let registration = registrations::ActiveModel {
            tournament_id: Set(tournament_id),
            team_type: Set(entity::types::TeamType::Solo),
            captain_name: Set("Alice".to_owned()),
            captain_email: Set("a@x.com".to_owned()),
            status: Set(RegistrationStatus::Pending),
            registered_at: Set(esports_lib::now()),
            ..Default::default()
        };
        let registration_id = registrations::Entity::insert(registration)
            .exec(&db.sql_conn)
            .await?
            .last_insert_id;

        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::put().uri(&format!(
                "/admin/registrations/{registration_id}/status"
            )))
            .set_json(serde_json::json!({ "status": "approved" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let registration = registrations::Entity::find_by_id(registration_id)
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Registration should exist in database"));
        assert_eq!(registration.status, RegistrationStatus::Approved);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_logout() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::post().uri("/admin/logout"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // The token is revoked, even if the old cookie is replayed
        let req = session
            .sign(test::TestRequest::get().uri("/admin/me"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_settings() -> anyhow::Result<()> {
    #[derive(serde::Deserialize)]
    struct Setting {
        setting_key: String,
        setting_value: String,
    }

    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let session = base::login(&app, &db).await?;

        let req = session
            .sign(test::TestRequest::get().uri("/admin/settings/discord_invite"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 304);

        let req = session
            .sign(test::TestRequest::put().uri("/admin/settings"))
            .set_json(serde_json::json!({
                "key": "discord_invite",
                "value": "https://discord.gg/campus",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = session
            .sign(test::TestRequest::get().uri("/admin/settings/discord_invite"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Setting>>(&body)?;
        assert_eq!(body.data.setting_key, "discord_invite");
        assert_eq!(body.data.setting_value, "https://discord.gg/campus");

        let req = session
            .sign(test::TestRequest::put().uri("/admin/settings"))
            .set_json(serde_json::json!({
                "key": "countdown_target",
                "value": "next friday",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 302);

        anyhow::Ok(())
    })
    .await
}
