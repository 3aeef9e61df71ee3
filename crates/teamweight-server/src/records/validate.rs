//! Input validation for the record service.
//!
//! Request bodies arrive as untyped JSON so that each field can be rejected
//! with its own reason, in a fixed order, before anything is written.

use chrono::NaiveDate;
use serde_json::Value;

/// Default target weight given to a newly registered player.
pub const DEFAULT_PLAYER_TARGET_WEIGHT: f64 = 60.0;
/// Default height given to a newly registered player.
pub const DEFAULT_PLAYER_HEIGHT: f64 = 170.0;

/// A field-specific client error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Invalid userId")]
    InvalidUserId,

    #[error("Invalid weight")]
    InvalidWeight,

    #[error("Invalid date")]
    InvalidDate,

    #[error("Invalid target_weight")]
    InvalidTargetWeight,

    #[error("Invalid displayName")]
    InvalidDisplayName,

    #[error("Invalid role")]
    InvalidRole,

    #[error("Invalid height")]
    InvalidHeight,
}

/// Profile role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "player" => Some(Self::Player),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A validated weight submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitWeight {
    user_id: String,
    date: NaiveDate,
    weight: f64,
}

impl SubmitWeight {
    pub fn new(user_id: &str, date: &str, weight: f64) -> Result<Self, ValidationError> {
        let user_id = check_user_id(user_id)?;
        let weight = check_weight(weight).ok_or(ValidationError::InvalidWeight)?;
        let date = parse_date(date)?;
        Ok(Self {
            user_id,
            date,
            weight,
        })
    }

    /// Validate a `{userId, weight, date}` body.
    ///
    /// Fields are checked in that order; `weight` must be a JSON number.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let user_id = obj
            .get("userId")
            .and_then(Value::as_str)
            .ok_or(ValidationError::InvalidUserId)?;
        let user_id = check_user_id(user_id)?;

        let weight = obj
            .get("weight")
            .and_then(Value::as_f64)
            .and_then(check_weight)
            .ok_or(ValidationError::InvalidWeight)?;

        let date = obj
            .get("date")
            .and_then(Value::as_str)
            .ok_or(ValidationError::InvalidDate)?;
        let date = parse_date(date)?;

        Ok(Self {
            user_id,
            date,
            weight,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// The date in `YYYY-MM-DD` form, as stored.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub const fn weight(&self) -> f64 {
        self.weight
    }
}

/// A validated target weight change.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetWeight {
    pub user_id: String,
    pub target_weight: f64,
}

impl TargetWeight {
    /// Validate a `{userId, target_weight}` body.
    ///
    /// `target_weight` may be a number or a numeric string; `targetWeight`
    /// is accepted as an alias.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let user_id = obj
            .get("userId")
            .and_then(Value::as_str)
            .ok_or(ValidationError::InvalidUserId)?;
        let user_id = check_user_id(user_id)?;

        let target_weight = obj
            .get("target_weight")
            .or_else(|| obj.get("targetWeight"))
            .and_then(lenient_number)
            .and_then(check_weight)
            .ok_or(ValidationError::InvalidTargetWeight)?;

        Ok(Self {
            user_id,
            target_weight,
        })
    }
}

/// A validated registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
    pub target_weight: Option<f64>,
    pub height: Option<f64>,
}

impl NewRegistration {
    /// Validate a `{userId, displayName, role?, targetWeight?, height?}` body.
    ///
    /// `role` defaults to `player`. Players without a target weight or
    /// height get the team defaults.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let obj = body.as_object().ok_or(ValidationError::NotAnObject)?;

        let user_id = obj
            .get("userId")
            .and_then(Value::as_str)
            .ok_or(ValidationError::InvalidUserId)?;
        let user_id = check_user_id(user_id)?;

        let display_name = obj
            .get("displayName")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ValidationError::InvalidDisplayName)?
            .to_string();

        let role = match obj.get("role") {
            None | Some(Value::Null) => Role::Player,
            Some(v) => v
                .as_str()
                .and_then(Role::parse)
                .ok_or(ValidationError::InvalidRole)?,
        };

        let target_weight = optional_measure(obj.get("targetWeight"))
            .ok_or(ValidationError::InvalidTargetWeight)?;
        let height = optional_measure(obj.get("height")).ok_or(ValidationError::InvalidHeight)?;

        let (target_weight, height) = match role {
            Role::Player => (
                target_weight.or(Some(DEFAULT_PLAYER_TARGET_WEIGHT)),
                height.or(Some(DEFAULT_PLAYER_HEIGHT)),
            ),
            Role::Admin => (target_weight, height),
        };

        Ok(Self {
            user_id,
            display_name,
            role,
            target_weight,
            height,
        })
    }
}

fn check_user_id(user_id: &str) -> Result<String, ValidationError> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::InvalidUserId);
    }
    Ok(user_id.to_string())
}

fn check_weight(weight: f64) -> Option<f64> {
    (weight.is_finite() && weight > 0.0).then_some(weight)
}

/// Parse a strict `YYYY-MM-DD` calendar date.
fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(ValidationError::InvalidDate);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate)
}

fn lenient_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `Some(None)` when absent, `Some(Some(x))` when valid, `None` when invalid.
fn optional_measure(v: Option<&Value>) -> Option<Option<f64>> {
    match v {
        None | Some(Value::Null) => Some(None),
        Some(v) => lenient_number(v).and_then(check_weight).map(Some),
    }
}
