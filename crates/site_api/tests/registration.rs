mod base;

use actix_web::test;
use entity::{
    registrations, team_members, tournaments,
    types::{MemberRole, RegistrationStatus, TeamType},
};
use sea_orm::{ColumnTrait as _, EntityTrait as _, PaginatorTrait as _, QueryFilter as _, QueryOrder as _};

#[derive(serde::Deserialize)]
struct Receipt {
    id: i32,
    tournament_id: i32,
    status: RegistrationStatus,
    team_type: TeamType,
    member_count: u64,
}

#[tokio::test]
async fn test_register_team() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Valorant").await?;
        let tournament_id =
            base::insert_tournament(&db, game_id, "Campus Cup", base::in_days(10)).await?;

        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::post()
            .uri("/tournaments_register")
            .set_json(serde_json::json!({
                "tournament_id": tournament_id.to_string(),
                "captain_name": "Alice",
                "captain_email": "a@x.com",
                "team_name": "Night Owls",
                "team_members": [
                    { "player_name": "Bob" },
                    { "player_name": "   " },
                    { "player_name": "Carol", "role": "substitute" },
                ],
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Receipt>>(&body)?;
        assert!(body.success);
        assert_eq!(body.message, "Registration successful");
        assert_eq!(body.data.tournament_id, tournament_id);
        assert_eq!(body.data.status, RegistrationStatus::Pending);
        assert_eq!(body.data.member_count, 3);

        let registration = registrations::Entity::find_by_id(body.data.id)
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Registration should be inserted in database"));
        assert_eq!(registration.captain_name, "Alice");
        assert_eq!(registration.team_type, body.data.team_type);

        let members = team_members::Entity::find()
            .filter(team_members::Column::RegistrationId.eq(registration.id))
            .order_by_asc(team_members::Column::Id)
            .all(&db.sql_conn)
            .await?;
        let members = members
            .iter()
            .map(|m| (m.player_name.as_str(), m.role))
            .collect::<Vec<_>>();
        assert_eq!(
            members,
            [
                ("Alice", MemberRole::Captain),
                ("Bob", MemberRole::Member),
                ("Carol", MemberRole::Substitute),
            ]
        );

        let tournament = tournaments::Entity::find_by_id(tournament_id)
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Tournament should exist in database"));
        assert_eq!(tournament.current_participants, 1);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_register_solo_with_aliases() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Chess").await?;
        let tournament_id =
            base::insert_tournament(&db, game_id, "Blitz Night", base::in_days(3)).await?;

        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::post()
            .uri("/tournaments_register")
            .set_json(serde_json::json!({
                "tournament_id": tournament_id,
                "player_name": "Dan",
                "player_email": "dan@x.com",
                "game_username": "dan_the_rook",
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body = test::read_body(resp).await;
        let body = base::try_from_slice::<base::Envelope<Receipt>>(&body)?;
        assert_eq!(body.data.team_type, TeamType::Solo);
        assert_eq!(body.data.member_count, 1);

        let captain = team_members::Entity::find()
            .filter(team_members::Column::RegistrationId.eq(body.data.id))
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Captain should be inserted in database"));
        assert_eq!(captain.player_name, "Dan");
        assert_eq!(captain.role, MemberRole::Captain);
        assert_eq!(captain.game_username.as_deref(), Some("dan_the_rook"));

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_register_unknown_tournament() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::post()
            .uri("/tournaments_register")
            .set_json(serde_json::json!({
                "tournament_id": 4242,
                "captain_name": "Alice",
                "captain_email": "a@x.com",
                "team_members": [{ "player_name": "Bob" }],
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert!(!error.success);
        assert_eq!(error.r#type, 303);

        assert_eq!(registrations::Entity::find().count(&db.sql_conn).await?, 0);
        assert_eq!(team_members::Entity::find().count(&db.sql_conn).await?, 0);

        anyhow::Ok(())
    })
    .await
}

#[tokio::test]
async fn test_register_missing_captain() -> anyhow::Result<()> {
    base::with_db(async |db| {
        let game_id = base::insert_game(&db, "Rocket League").await?;
        let tournament_id =
            base::insert_tournament(&db, game_id, "Aerial Open", base::in_days(7)).await?;

        let app = base::get_app(db.clone()).await;
        let req = test::TestRequest::post()
            .uri("/tournaments_register")
            .set_json(serde_json::json!({
                "tournament_id": tournament_id,
                "captain_name": "Alice",
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body = test::read_body(resp).await;
        let error: base::ErrorResponse = serde_json::from_slice(&body)?;
        assert_eq!(error.r#type, 302);
        assert!(error.message.contains("captain_email"));

        let tournament = tournaments::Entity::find_by_id(tournament_id)
            .one(&db.sql_conn)
            .await?
            .unwrap_or_else(|| panic!("Tournament should exist in database"));
        assert_eq!(tournament.current_participants, 0);
        assert_eq!(registrations::Entity::find().count(&db.sql_conn).await?, 0);

        anyhow::Ok(())
    })
    .await
}
