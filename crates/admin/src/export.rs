use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use esports_lib::{
    Database, must,
    repo::registrations::{self, RegistrationWithMembers},
};

#[derive(clap::Args, Debug)]
pub struct ExportCommand {
    tournament_id: i32,
    /// The output file. The CSV is written to the standard output if omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(serde::Serialize)]
struct Row<'a> {
    registration_id: i32,
    team_name: &'a str,
    team_type: String,
    status: String,
    registered_at: String,
    player_name: &'a str,
    role: String,
    player_email: &'a str,
    player_phone: &'a str,
    student_id: &'a str,
    game_username: &'a str,
}

/// Writes one CSV row per player of the provided registrations, and returns the amount of rows.
fn write_csv<W: Write>(out: W, registrations: &[RegistrationWithMembers]) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(out);

    let mut count = 0;
    for registration in registrations {
        let r = &registration.registration;
        for member in &registration.members {
            writer.serialize(Row {
                registration_id: r.id,
                team_name: r.team_name.as_deref().unwrap_or_default(),
                team_type: r.team_type.to_string(),
                status: r.status.to_string(),
                registered_at: r.registered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                player_name: &member.player_name,
                role: member.role.to_string(),
                player_email: member.player_email.as_deref().unwrap_or_default(),
                player_phone: member.player_phone.as_deref().unwrap_or_default(),
                student_id: member.student_id.as_deref().unwrap_or_default(),
                game_username: member.game_username.as_deref().unwrap_or_default(),
            })?;
            count += 1;
        }
    }
    writer.flush()?;

    Ok(count)
}

pub async fn export(db: Database, cmd: ExportCommand) -> anyhow::Result<()> {
    let tournament = must::have_tournament(&db.sql_conn, cmd.tournament_id).await?;
    let registrations = registrations::all_of_tournament(&db.sql_conn, tournament.id).await?;

    let count = match &cmd.output {
        Some(path) => write_csv(File::create(path)?, &registrations)?,
        None => write_csv(io::stdout().lock(), &registrations)?,
    };

    tracing::info!(
        "Exported {count} player(s) from {} registration(s) of `{}`",
        registrations.len(),
        tournament.name
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entity::{
        registrations, team_members,
        types::{MemberRole, RegistrationStatus, TeamType},
    };
    use esports_lib::repo::registrations::RegistrationWithMembers;

    use super::write_csv;

    fn member(id: i32, name: &str, role: MemberRole) -> team_members::Model {
        team_members::Model {
            id,
            registration_id: 7,
            player_name: name.to_owned(),
            player_email: None,
            player_phone: None,
            student_id: None,
            game_username: None,
            role,
            created_at: NaiveDate::from_ymd_opt(2026, 4, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn one_row_per_player() -> anyhow::Result<()> {
        let date = NaiveDate::from_ymd_opt(2026, 4, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let registration = RegistrationWithMembers {
            registration: registrations::Model {
                id: 7,
                tournament_id: 5,
                team_name: Some("Night Owls".to_owned()),
                team_type: TeamType::Duo,
                captain_name: "Alice".to_owned(),
                captain_email: "a@x.com".to_owned(),
                captain_phone: None,
                captain_student_id: None,
                captain_game_username: None,
                status: RegistrationStatus::Pending,
                registered_at: date,
            },
            tournament_name: Some("Spring Cup".to_owned()),
            members: vec![
                member(1, "Alice", MemberRole::Captain),
                member(2, "Bob", MemberRole::Member),
            ],
        };

        let mut out = Vec::new();
        let count = write_csv(&mut out, &[registration])?;
        assert_eq!(count, 2);

        let out = String::from_utf8(out)?;
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("registration_id,team_name,team_type"));
        assert!(lines[1].starts_with("7,Night Owls,duo,pending,2026-04-01 10:00:00,Alice,captain,"));
        assert!(lines[2].contains(",Bob,member,"));

        Ok(())
    }
}
