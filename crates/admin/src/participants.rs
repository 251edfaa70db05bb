use esports_lib::{
    Database,
    page::{MAX_LIMIT, Page},
    repo::tournaments::{self, TournamentFilter, TournamentListItem},
};

#[derive(clap::Args, Debug)]
pub struct ParticipantsCommand {
    /// Only shows this tournament.
    #[arg(long)]
    tournament: Option<i32>,
}

async fn all_tournaments(db: &Database) -> anyhow::Result<Vec<TournamentListItem>> {
    let mut out = Vec::new();
    let mut page = Page {
        offset: 0,
        limit: MAX_LIMIT,
    };

    loop {
        let rows = tournaments::list(&db.sql_conn, TournamentFilter::default(), page).await?;
        let len = rows.len() as u64;
        out.extend(rows);
        if len < page.limit {
            break;
        }
        page.offset += page.limit;
    }

    Ok(out)
}

pub async fn participants(db: Database, cmd: ParticipantsCommand) -> anyhow::Result<()> {
    let rows = match cmd.tournament {
        Some(id) => vec![tournaments::get(&db.sql_conn, id).await?],
        None => all_tournaments(&db).await?,
    };

    let mut table = prettytable::Table::init(vec![prettytable::row![
        "ID",
        "Tournament",
        "Status",
        "Counter",
        "Registrations",
        ""
    ]]);

    let mut drifting = 0;
    for row in &rows {
        let drift = i64::from(row.current_participants) != row.registration_count;
        let flag = if drift {
            drifting += 1;
            "drift"
        } else {
            ""
        };
        table.add_row(prettytable::row![
            row.id,
            row.name,
            row.status,
            row.current_participants,
            row.registration_count,
            flag
        ]);
    }

    println!("{table}");
    println!(
        "{} tournament(s), {drifting} with a counter different from the registrations",
        rows.len()
    );

    Ok(())
}
