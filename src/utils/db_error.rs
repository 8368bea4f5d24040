/// Returns the name of the violated unique constraint, if `e` is a unique violation.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<&str> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    db_err.constraint()
}

/// Unique constraint guarding `mappings.original_url`.
pub const ORIGINAL_URL_CONSTRAINT: &str = "mappings_original_url_key";

pub fn is_unique_violation_on_original_url(e: &sqlx::Error) -> bool {
    unique_violation_constraint(e) == Some(ORIGINAL_URL_CONSTRAINT)
}
