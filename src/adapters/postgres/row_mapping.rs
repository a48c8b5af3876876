//! Row → aggregate reconstitution shared by the PostgreSQL adapters.

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::domain::foundation::{
    DomainError, ErrorCode, Intent, RequestId, RequestStatus, SessionId, SessionStatus,
    SkillLevel, SkillRange, Timestamp, UserId,
};
use crate::domain::match_request::MatchRequest;
use crate::domain::session::Session;

pub(super) fn db_error(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

fn get_column<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| db_error(&format!("Failed to get {}", column), e))
}

pub(super) fn row_to_session(row: &PgRow) -> Result<Session, DomainError> {
    let id: uuid::Uuid = get_column(row, "id")?;
    let creator_id: String = get_column(row, "creator_id")?;
    let title: String = get_column(row, "title")?;
    let location: String = get_column(row, "location")?;
    let date_time: chrono::DateTime<chrono::Utc> = get_column(row, "date_time")?;
    let duration_minutes: i32 = get_column(row, "duration_minutes")?;
    let intent: String = get_column(row, "intent")?;
    let skill_min: f32 = get_column(row, "skill_min")?;
    let skill_max: f32 = get_column(row, "skill_max")?;
    let max_players: i32 = get_column(row, "max_players")?;
    let current_players: i32 = get_column(row, "current_players")?;
    let status: String = get_column(row, "status")?;
    let created_at: chrono::DateTime<chrono::Utc> = get_column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = get_column(row, "updated_at")?;

    let creator_id =
        UserId::new(creator_id).map_err(|e| db_error("Invalid creator_id in row", e))?;
    let intent: Intent = intent
        .parse()
        .map_err(|e| db_error("Invalid intent in row", e))?;
    let skill_min =
        SkillLevel::try_from_f32(skill_min).map_err(|e| db_error("Invalid skill_min in row", e))?;
    let skill_max =
        SkillLevel::try_from_f32(skill_max).map_err(|e| db_error("Invalid skill_max in row", e))?;
    let skill_range = SkillRange::new(skill_min, skill_max)
        .map_err(|e| db_error("Invalid skill range in row", e))?;
    let status: SessionStatus = status
        .parse()
        .map_err(|e| db_error("Invalid session status in row", e))?;

    Ok(Session::reconstitute(
        SessionId::from_uuid(id),
        creator_id,
        title,
        location,
        Timestamp::from_datetime(date_time),
        duration_minutes as u32,
        intent,
        skill_range,
        max_players as u32,
        current_players as u32,
        status,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

pub(super) fn row_to_request(row: &PgRow) -> Result<MatchRequest, DomainError> {
    let id: uuid::Uuid = get_column(row, "id")?;
    let session_id: uuid::Uuid = get_column(row, "session_id")?;
    let requester_id: String = get_column(row, "requester_id")?;
    let status: String = get_column(row, "status")?;
    let message: Option<String> = get_column(row, "message")?;
    let created_at: chrono::DateTime<chrono::Utc> = get_column(row, "created_at")?;
    let updated_at: chrono::DateTime<chrono::Utc> = get_column(row, "updated_at")?;

    let requester_id =
        UserId::new(requester_id).map_err(|e| db_error("Invalid requester_id in row", e))?;
    let status: RequestStatus = status
        .parse()
        .map_err(|e| db_error("Invalid request status in row", e))?;

    Ok(MatchRequest::reconstitute(
        RequestId::from_uuid(id),
        SessionId::from_uuid(session_id),
        requester_id,
        status,
        message,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
