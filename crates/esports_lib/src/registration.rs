//! The tournament registration workflow.
//!
//! A registration is submitted by a captain, optionally with the other members of their team.
//! It is persisted in a single transaction: the registration row, one team member row
//! for the captain, one row per member, and the increment of the participant counter
//! of the tournament. If any step fails, nothing is written.
//!
//! There is no check against the maximum amount of participants of the tournament, nor
//! against duplicate registrations, and the member count isn't checked against the team type.

use entity::{
    registrations, team_members, tournaments,
    types::{MemberRole, RegistrationStatus, TeamType},
};
use sea_orm::{
    ActiveModelTrait as _, ActiveValue::Set, ColumnTrait as _, ConnectionTrait, EntityTrait as _,
    QueryFilter as _, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::EsportsResult,
    invalid, must, now, transaction,
    validate::{missing, non_blank, required_str},
};

/// An ID sent either as a number or as a string.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum IdInput {
    /// The ID as a JSON number.
    Number(i64),
    /// The ID as a string, like from an HTML form.
    Text(String),
}

impl IdInput {
    fn parse(&self, field: &str) -> EsportsResult<i32> {
        let id = match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(s) if s.trim().is_empty() => return Err(missing(field)),
            Self::Text(s) => s.trim().parse().ok(),
        };
        id.filter(|id| *id > 0)
            .ok_or_else(|| invalid!("{field} is invalid"))
    }
}

/// A team member sent along with a registration.
///
/// The `name`, `email` and `phone` fields are the names used by the older form. They are
/// only used when the `player_*` field is missing.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct TeamMemberRequest {
    /// The name of the player. Members without name are ignored.
    pub player_name: Option<String>,
    /// The email of the player.
    pub player_email: Option<String>,
    /// The phone number of the player.
    pub player_phone: Option<String>,
    /// The name of the player, older form.
    pub name: Option<String>,
    /// The email of the player, older form.
    pub email: Option<String>,
    /// The phone number of the player, older form.
    pub phone: Option<String>,
    /// The student ID of the player.
    pub student_id: Option<String>,
    /// The in-game username of the player.
    pub game_username: Option<String>,
    /// The role of the player, `member` or `substitute`.
    pub role: Option<String>,
}

/// The captain fields under the names of the older registration form.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct LegacyCaptainFields {
    /// The name of the captain.
    pub player_name: Option<String>,
    /// The email of the captain.
    pub player_email: Option<String>,
    /// The phone number of the captain.
    pub player_phone: Option<String>,
    /// The student ID of the captain.
    pub player_student_id: Option<String>,
    /// The student ID of the captain, used if `player_student_id` is missing.
    pub student_id: Option<String>,
    /// The in-game username of the captain.
    pub player_game_username: Option<String>,
    /// The in-game username of the captain, used if `player_game_username` is missing.
    pub game_username: Option<String>,
}

/// A registration submitted to a tournament.
///
/// A `captain_*` field takes precedence over its name in [`LegacyCaptainFields`].
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RegistrationRequest {
    /// The tournament to register to. Required.
    pub tournament_id: Option<IdInput>,
    /// The name of the team.
    pub team_name: Option<String>,
    /// The kind of team. Guessed from the amount of team members if missing.
    pub team_type: Option<String>,
    /// The name of the captain. Required.
    pub captain_name: Option<String>,
    /// The email of the captain. Required.
    pub captain_email: Option<String>,
    /// The phone number of the captain.
    pub captain_phone: Option<String>,
    /// The student ID of the captain.
    pub captain_student_id: Option<String>,
    /// The in-game username of the captain.
    pub captain_game_username: Option<String>,
    /// The captain fields under their older names.
    #[serde(flatten)]
    pub legacy: LegacyCaptainFields,
    /// The other members of the team.
    #[serde(default)]
    pub team_members: Option<Vec<TeamMemberRequest>>,
}

/// A validated team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMember {
    /// The name of the player.
    pub name: String,
    /// The email of the player.
    pub email: Option<String>,
    /// The phone number of the player.
    pub phone: Option<String>,
    /// The student ID of the player.
    pub student_id: Option<String>,
    /// The in-game username of the player.
    pub game_username: Option<String>,
    /// The role in the team.
    pub role: MemberRole,
}

/// A validated registration, ready to be saved.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    /// The tournament to register to.
    pub tournament_id: i32,
    /// The name of the team.
    pub team_name: Option<String>,
    /// The kind of team.
    pub team_type: TeamType,
    /// The captain.
    pub captain: ValidMember,
    /// The other members, without the ones without name.
    pub members: Vec<ValidMember>,
}

fn member_role(role: Option<&str>) -> MemberRole {
    match role.map(str::trim) {
        Some(role) if role.eq_ignore_ascii_case("substitute") => MemberRole::Substitute,
        // Only the registering player can be captain
        _ => MemberRole::Member,
    }
}

impl TeamMemberRequest {
    fn validate(self) -> Option<ValidMember> {
        Some(ValidMember {
            name: non_blank(self.player_name.or(self.name))?,
            email: non_blank(self.player_email.or(self.email)),
            phone: non_blank(self.player_phone.or(self.phone)),
            student_id: non_blank(self.student_id),
            game_username: non_blank(self.game_username),
            role: member_role(self.role.as_deref()),
        })
    }
}

impl RegistrationRequest {
    /// Checks the required fields of the registration.
    pub fn validate(self) -> EsportsResult<ValidRegistration> {
        let tournament_id = self
            .tournament_id
            .as_ref()
            .ok_or_else(|| missing("tournament_id"))?
            .parse("tournament_id")?;
        let legacy = self.legacy;
        let captain_name =
            required_str("captain_name", self.captain_name.or(legacy.player_name))?;
        let captain_email =
            required_str("captain_email", self.captain_email.or(legacy.player_email))?;

        let members = self.team_members.unwrap_or_default();
        let team_type = match non_blank(self.team_type) {
            Some(team_type) => team_type.parse().map_err(|e| invalid!("{e}"))?,
            None => TeamType::from_member_count(members.len()),
        };

        Ok(ValidRegistration {
            tournament_id,
            team_name: non_blank(self.team_name),
            team_type,
            captain: ValidMember {
                name: captain_name,
                email: Some(captain_email),
                phone: non_blank(self.captain_phone.or(legacy.player_phone)),
                student_id: non_blank(
                    self.captain_student_id
                        .or(legacy.player_student_id)
                        .or(legacy.student_id),
                ),
                game_username: non_blank(
                    self.captain_game_username
                        .or(legacy.player_game_username)
                        .or(legacy.game_username),
                ),
                role: MemberRole::Captain,
            },
            members: members
                .into_iter()
                .filter_map(TeamMemberRequest::validate)
                .collect(),
        })
    }
}

/// The summary of a saved registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    /// The ID of the registration.
    pub id: i32,
    /// The ID of the tournament.
    pub tournament_id: i32,
    /// The name of the tournament.
    pub tournament_name: String,
    /// The name of the team.
    pub team_name: Option<String>,
    /// The kind of team.
    pub team_type: TeamType,
    /// The status of the registration, always pending.
    pub status: RegistrationStatus,
    /// The amount of team member rows written, captain included.
    pub member_count: u64,
    /// The name of the captain.
    pub captain_name: String,
    /// The email of the captain.
    pub captain_email: String,
}

fn member_model(registration_id: i32, member: ValidMember) -> team_members::ActiveModel {
    team_members::ActiveModel {
        registration_id: Set(registration_id),
        player_name: Set(member.name),
        player_email: Set(member.email),
        player_phone: Set(member.phone),
        student_id: Set(member.student_id),
        game_username: Set(member.game_username),
        role: Set(member.role),
        created_at: Set(now()),
        ..Default::default()
    }
}

/// Saves the provided registration with the provided connection.
///
/// This should be called inside a transaction, see [`register`].
pub async fn insert_registration<C: ConnectionTrait>(
    conn: &C,
    registration: ValidRegistration,
) -> EsportsResult<RegistrationReceipt> {
    let tournament = must::have_tournament(conn, registration.tournament_id).await?;

    let captain_name = registration.captain.name.clone();
    let captain_email = registration.captain.email.clone().unwrap_or_default();

    let row = registrations::ActiveModel {
        tournament_id: Set(tournament.id),
        team_name: Set(registration.team_name),
        team_type: Set(registration.team_type),
        captain_name: Set(registration.captain.name.clone()),
        captain_email: Set(captain_email.clone()),
        captain_phone: Set(registration.captain.phone.clone()),
        captain_student_id: Set(registration.captain.student_id.clone()),
        captain_game_username: Set(registration.captain.game_username.clone()),
        status: Set(RegistrationStatus::Pending),
        registered_at: Set(now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    member_model(row.id, registration.captain)
        .insert(conn)
        .await?;
    let mut member_count = 1;

    if !registration.members.is_empty() {
        let members = registration
            .members
            .into_iter()
            .map(|member| member_model(row.id, member));
        member_count += team_members::Entity::insert_many(members)
            .exec_without_returning(conn)
            .await?;
    }

    tournaments::Entity::update_many()
        .col_expr(
            tournaments::Column::CurrentParticipants,
            Expr::col(tournaments::Column::CurrentParticipants).add(1),
        )
        .filter(tournaments::Column::Id.eq(tournament.id))
        .exec(conn)
        .await?;

    Ok(RegistrationReceipt {
        id: row.id,
        tournament_id: tournament.id,
        tournament_name: tournament.name,
        team_name: row.team_name,
        team_type: row.team_type,
        status: row.status,
        member_count,
        captain_name,
        captain_email,
    })
}

/// Validates and saves the provided registration in a single transaction.
///
/// Validation errors are returned before any query. Any error afterwards rolls back
/// the transaction and is returned as is.
pub async fn register<C: TransactionTrait>(
    conn: &C,
    request: RegistrationRequest,
) -> EsportsResult<RegistrationReceipt> {
    let registration = request.validate()?;
    let tournament_id = registration.tournament_id;

    let receipt = transaction::within(conn, async |txn| {
        insert_registration(txn, registration).await
    })
    .await?;

    tracing::info!(
        "New registration {} to tournament {tournament_id} ({} members, {})",
        receipt.id,
        receipt.member_count,
        receipt.team_type,
    );

    Ok(receipt)
}
