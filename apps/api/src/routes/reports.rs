//! Manager reports.
//!
//! Every report takes an inclusive `?from=YYYY-MM-DD&to=YYYY-MM-DD` range.
//! Missing bounds default to the last 30 days (sales) or 7 days (audit),
//! ending today (UTC).

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use elegancia_core::validation::validate_date_range;
use elegancia_core::{
    AuditEntry, RequestContext, Role, SalesByCollection, SalesByDay, SalesBySeller, ValidationError,
    MAX_AUDIT_TRAIL_ROWS,
};
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

const SALES_REPORT_DEFAULT_DAYS: u64 = 30;
const AUDIT_REPORT_DEFAULT_DAYS: u64 = 7;

/// Raw range parameters. Parsed by hand so malformed dates produce the
/// regular validation error body.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    fn resolve(&self, default_days: u64) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        let today = Utc::now().date_naive();
        let to = match self.to.as_deref() {
            Some(raw) => parse_date("to", raw)?,
            None => today,
        };
        let from = match self.from.as_deref() {
            Some(raw) => parse_date("from", raw)?,
            None => to.checked_sub_days(Days::new(default_days)).unwrap_or(to),
        };

        validate_date_range(from, to)?;
        Ok((from, to))
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

fn managers_only(ctx: &RequestContext) -> ApiResult<()> {
    ctx.require(&[Role::Manager], "view reports")?;
    Ok(())
}

pub async fn sales_by_period(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<SalesByDay>>> {
    managers_only(&ctx)?;
    let (from, to) = range.resolve(SALES_REPORT_DEFAULT_DAYS)?;
    Ok(Json(state.db.reports().sales_by_day(from, to).await?))
}

pub async fn sales_by_seller(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<SalesBySeller>>> {
    managers_only(&ctx)?;
    let (from, to) = range.resolve(SALES_REPORT_DEFAULT_DAYS)?;
    Ok(Json(state.db.reports().sales_by_seller(from, to).await?))
}

/// Revenue per collection, before sale-level discounts.
pub async fn sales_by_collection(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<SalesByCollection>>> {
    managers_only(&ctx)?;
    let (from, to) = range.resolve(SALES_REPORT_DEFAULT_DAYS)?;
    Ok(Json(state.db.reports().sales_by_collection(from, to).await?))
}

/// Newest first, capped at [`MAX_AUDIT_TRAIL_ROWS`].
pub async fn audit_trail(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    managers_only(&ctx)?;
    let (from, to) = range.resolve(AUDIT_REPORT_DEFAULT_DAYS)?;
    Ok(Json(
        state
            .db
            .audit_log()
            .trail(from, to, MAX_AUDIT_TRAIL_ROWS)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: Option<&str>, to: Option<&str>) -> RangeQuery {
        RangeQuery {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        }
    }

    #[test]
    fn test_explicit_range() {
        let (from, to) = range(Some("2024-03-01"), Some("2024-03-31")).resolve(30).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
    }

    #[test]
    fn test_missing_from_defaults_relative_to_to() {
        let (from, to) = range(None, Some("2024-03-31")).resolve(7).unwrap();
        assert_eq!(to - from, chrono::Duration::days(7));
    }

    #[test]
    fn test_bad_dates_are_validation_errors() {
        let err = range(Some("31/03/2024"), None).resolve(30).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "from"));

        assert!(range(Some("2024-04-01"), Some("2024-03-01")).resolve(30).is_err());
    }
}
