use axum::{Extension, Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::TOP_LIMIT,
    services::ranking,
    utils::jwt::Claims,
};

const VISITS_COOKIE: &str = "visits";
const LAST_VISIT_COOKIE: &str = "last_visit";

/// Minimum gap between two home page hits for them to count as separate visits.
const VISIT_GAP_SECONDS: i64 = 5;

/// Home page data: most liked categories and most viewed pages.
///
/// Also counts the client's visits in cookies.
pub async fn index(
    State(pool): State<SqlitePool>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let categories = ranking::top_categories(&pool, TOP_LIMIT).await?;
    let pages = ranking::top_pages(&pool, TOP_LIMIT).await?;

    let (visits, last_visit) = count_visit(
        stored_visits(&jar),
        stored_last_visit(&jar),
        Utc::now(),
    );
    tracing::debug!("visits: {}, last_visit: {}", visits, last_visit);

    let jar = jar
        .add(Cookie::build((VISITS_COOKIE, visits.to_string())).path("/"))
        .add(Cookie::build((LAST_VISIT_COOKIE, last_visit.to_rfc3339())).path("/"));

    Ok((
        jar,
        Json(json!({
            "categories": categories,
            "pages": pages,
            "visits": visits,
        })),
    ))
}

/// About page with the visit count recorded by the home page.
pub async fn about(jar: CookieJar) -> impl IntoResponse {
    Json(json!({
        "message": "Rango says: here is the about page.",
        "visits": stored_visits(&jar).unwrap_or(1),
    }))
}

/// Only reachable with a valid token.
pub async fn restricted(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    Json(json!({
        "message": format!("Since you're logged in, {}, you can see this text!", claims.username),
    }))
}

fn stored_visits(jar: &CookieJar) -> Option<u32> {
    jar.get(VISITS_COOKIE)?.value().parse().ok()
}

fn stored_last_visit(jar: &CookieJar) -> Option<DateTime<Utc>> {
    let value = jar.get(LAST_VISIT_COOKIE)?.value();
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Returns the new visit count and the time to record as the last visit.
///
/// A first hit counts as one visit. Later hits count only once the gap since
/// the recorded visit exceeds [`VISIT_GAP_SECONDS`].
fn count_visit(
    visits: Option<u32>,
    last_visit: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> (u32, DateTime<Utc>) {
    match last_visit {
        Some(last) if now - last > TimeDelta::seconds(VISIT_GAP_SECONDS) => {
            (visits.unwrap_or(0).saturating_add(1), now)
        }
        Some(last) => (visits.unwrap_or(1), last),
        None => (1, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_visit_starts_the_count() {
        let now = Utc::now();
        assert_eq!(count_visit(None, None, now), (1, now));
        assert_eq!(count_visit(Some(9), None, now), (1, now));
    }

    #[test]
    fn quick_reloads_are_not_counted() {
        let now = Utc::now();
        let last = now - TimeDelta::seconds(2);
        assert_eq!(count_visit(Some(3), Some(last), now), (3, last));
    }

    #[test]
    fn later_visit_increments_the_count() {
        let now = Utc::now();
        let last = now - TimeDelta::seconds(60);
        assert_eq!(count_visit(Some(3), Some(last), now), (4, now));
    }
}
