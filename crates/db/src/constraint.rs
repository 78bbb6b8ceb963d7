//! Structured classification of constraint violations.
//!
//! PostgreSQL reports the violated constraint by SQLSTATE and name; both are
//! exposed by sqlx without parsing the human-readable message. All tables name
//! their constraints explicitly (`uq_<table>_<column>`, `fk_<table>_<column>`)
//! so callers can match on the constants below.

/// SQLSTATE for `unique_violation`.
const SQLSTATE_UNIQUE: &str = "23505";
/// SQLSTATE for `foreign_key_violation`.
const SQLSTATE_FOREIGN_KEY: &str = "23503";

pub const UQ_USERS_USERNAME: &str = "uq_users_username";
pub const UQ_USERS_EMAIL: &str = "uq_users_email";
pub const UQ_LOCATIONS_NAME: &str = "uq_locations_name";
pub const UQ_CCTVS_NAME: &str = "uq_cctvs_name";
pub const UQ_CCTVS_SOURCE_URL: &str = "uq_cctvs_source_url";
pub const FK_CCTVS_LOCATION_ID: &str = "fk_cctvs_location_id";

/// The kind of integrity rule that rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

/// A write rejected by a named database constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    /// Constraint name as declared in the migrations (`"unknown"` if the
    /// driver did not report one).
    pub constraint: String,
}

impl ConstraintViolation {
    /// Classify a sqlx error. Returns `None` for anything that is not a
    /// unique or foreign-key violation.
    pub fn from_sqlx(err: &sqlx::Error) -> Option<Self> {
        let sqlx::Error::Database(db_err) = err else {
            return None;
        };
        let kind = match db_err.code().as_deref() {
            Some(SQLSTATE_UNIQUE) => ConstraintKind::Unique,
            Some(SQLSTATE_FOREIGN_KEY) => ConstraintKind::ForeignKey,
            _ => return None,
        };
        Some(Self {
            kind,
            constraint: db_err.constraint().unwrap_or("unknown").to_string(),
        })
    }

    pub fn is(&self, constraint: &str) -> bool {
        self.constraint == constraint
    }

    /// Client-facing description of the violated rule.
    pub fn describe(&self) -> String {
        match self.constraint.as_str() {
            UQ_USERS_USERNAME => "Username already exists".to_string(),
            UQ_USERS_EMAIL => "Email already exists".to_string(),
            UQ_LOCATIONS_NAME => "A location with this name already exists".to_string(),
            UQ_CCTVS_NAME => "A CCTV with this name already exists".to_string(),
            UQ_CCTVS_SOURCE_URL => "A CCTV with this source URL already exists".to_string(),
            FK_CCTVS_LOCATION_ID => match self.kind {
                ConstraintKind::ForeignKey => {
                    "Location is referenced by CCTVs or does not exist".to_string()
                }
                ConstraintKind::Unique => "Duplicate location reference".to_string(),
            },
            other => match self.kind {
                ConstraintKind::Unique => {
                    format!("Duplicate value violates unique constraint: {other}")
                }
                ConstraintKind::ForeignKey => {
                    format!("Referenced row violates foreign key constraint: {other}")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_violations() {
        assert_eq!(ConstraintViolation::from_sqlx(&sqlx::Error::RowNotFound), None);
        assert_eq!(ConstraintViolation::from_sqlx(&sqlx::Error::PoolTimedOut), None);
    }

    #[test]
    fn known_constraints_have_friendly_messages() {
        let v = ConstraintViolation {
            kind: ConstraintKind::Unique,
            constraint: UQ_USERS_EMAIL.to_string(),
        };
        assert!(v.is(UQ_USERS_EMAIL));
        assert_eq!(v.describe(), "Email already exists");
    }

    #[test]
    fn unknown_constraint_names_itself() {
        let v = ConstraintViolation {
            kind: ConstraintKind::Unique,
            constraint: "uq_widgets_slug".to_string(),
        };
        assert_eq!(
            v.describe(),
            "Duplicate value violates unique constraint: uq_widgets_slug"
        );
    }
}
