//! # Request Context
//!
//! The authenticated identity behind a single request.
//!
//! ```text
//! Bearer JWT ──► RequestContext { actor_id, role, origin }
//!                      │
//!                      ├──► require(&[Role::Manager], ...)   403 on mismatch
//!                      │
//!                      └──► SaleCoordinator::create_sale(&ctx, ...)
//!                           (operator_id = ctx.actor_id,
//!                            audit origin = ctx.origin)
//! ```
//!
//! A context is built once per request and passed explicitly to every
//! workflow. There is no ambient "current user".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Back-office roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Salesperson,
    Manager,
    StockClerk,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Salesperson => "salesperson",
            Role::Manager => "manager",
            Role::StockClerk => "stock_clerk",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salesperson" => Ok(Role::Salesperson),
            "manager" => Ok(Role::Manager),
            "stock_clerk" => Ok(Role::StockClerk),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Stable identifier of the authenticated actor (JWT `sub`).
    pub actor_id: String,
    pub role: Role,
    /// Client address, recorded in audit entries.
    pub origin: Option<String>,
}

impl RequestContext {
    pub fn new(actor_id: impl Into<String>, role: Role, origin: Option<String>) -> Self {
        RequestContext {
            actor_id: actor_id.into(),
            role,
            origin,
        }
    }

    /// Fails with [`CoreError::Forbidden`] unless the caller holds one of
    /// `allowed`.
    ///
    /// `action` only feeds the error message ("create sales", ...).
    pub fn require(&self, allowed: &[Role], action: &str) -> CoreResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(CoreError::Forbidden {
                role: self.role.to_string(),
                action: action.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_allows_listed_roles() {
        let ctx = RequestContext::new("u-1", Role::StockClerk, None);
        assert!(ctx
            .require(&[Role::StockClerk, Role::Manager], "adjust stock")
            .is_ok());
    }

    #[test]
    fn test_require_rejects_other_roles() {
        let ctx = RequestContext::new("u-1", Role::Salesperson, Some("10.0.0.7".into()));
        let err = ctx.require(&[Role::Manager], "delete customers").unwrap_err();
        assert!(matches!(err, CoreError::Forbidden { ref role, .. } if role == "salesperson"));
    }

    #[test]
    fn test_role_round_trips_through_its_wire_name() {
        for role in [Role::Salesperson, Role::Manager, Role::StockClerk] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(
                serde_json::to_value(role).unwrap(),
                serde_json::Value::String(role.as_str().to_string())
            );
        }
        assert!("cashier".parse::<Role>().is_err());
    }
}
