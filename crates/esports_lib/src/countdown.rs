//! The target of the countdown widget of the home page.
//!
//! The widget counts down to the `countdown_target` site setting when it is set and in the
//! future. Otherwise, it counts down to the nearest upcoming tournament or event.

use chrono::NaiveDateTime;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::{
    date,
    error::EsportsResult,
    repo::{events, settings, tournaments},
    validate::non_blank,
};

/// Where the countdown target comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownSource {
    /// The `countdown_target` site setting.
    Setting,
    /// The start of the next tournament.
    Tournament,
    /// The next event.
    Event,
}

/// A date the countdown can target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The title shown above the countdown.
    pub title: String,
    /// The targeted date.
    pub target: NaiveDateTime,
}

/// The countdown to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// The title shown above the countdown.
    pub title: String,
    /// The targeted date.
    pub target: NaiveDateTime,
    /// Where the target comes from.
    pub source: CountdownSource,
    /// The amount of seconds remaining until the target.
    pub seconds_remaining: i64,
}

/// Chooses the countdown to show at `now`.
///
/// The setting wins if it is in the future. Otherwise, the nearest of the tournament
/// and the event wins, the tournament first on equality.
pub fn pick(
    setting: Option<Candidate>,
    tournament: Option<Candidate>,
    event: Option<Candidate>,
    now: NaiveDateTime,
) -> Option<Countdown> {
    let future = |c: &Candidate| c.target > now;

    let (candidate, source) = match setting.filter(future) {
        Some(setting) => (setting, CountdownSource::Setting),
        None => {
            let tournament = tournament
                .filter(future)
                .map(|c| (c, CountdownSource::Tournament));
            let event = event.filter(future).map(|c| (c, CountdownSource::Event));
            match (tournament, event) {
                (Some(t), Some(e)) if e.0.target < t.0.target => e,
                (Some(t), _) => t,
                (None, e) => e?,
            }
        }
    };

    Some(Countdown {
        seconds_remaining: (candidate.target - now).num_seconds(),
        title: candidate.title,
        target: candidate.target,
        source,
    })
}

/// Returns the countdown to show at `now`, if anything is coming.
pub async fn get<C: ConnectionTrait>(conn: &C, now: NaiveDateTime) -> EsportsResult<Option<Countdown>> {
    let setting = match settings::get_value(conn, settings::COUNTDOWN_TARGET)
        .await?
        .as_deref()
        .and_then(date::parse)
    {
        Some(target) => {
            let title = non_blank(settings::get_value(conn, settings::COUNTDOWN_TITLE).await?)
                .unwrap_or_else(|| "Countdown".to_owned());
            Some(Candidate { title, target })
        }
        None => None,
    };

    let tournament = tournaments::next_upcoming(conn, now)
        .await?
        .map(|t| Candidate {
            title: t.name,
            target: t.start_date,
        });
    let event = events::next_upcoming(conn, now).await?.map(|e| Candidate {
        title: e.title,
        target: e.event_date,
    });

    Ok(pick(setting, tournament, event, now))
}
