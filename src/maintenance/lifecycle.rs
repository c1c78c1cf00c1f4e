//! Request lifecycle state machine
//!
//! `TRANSITIONS` is the only place the status table is written down. Callers ask
//! this module which moves are legal instead of re-encoding the table.
//!
//! A status change is computed here as a [`TransitionPlan`] and handed to the store,
//! which applies the status write and any cascade as one unit, guarded by the
//! status the plan was computed from.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{enums::RequestStatus, request::MaintenanceRequest},
};

use crate::models::enums::RequestStatus::{InProgress, New, Repaired, Scrap};

/// Permitted moves, keyed by source status
pub const TRANSITIONS: &[(RequestStatus, &[RequestStatus])] = &[
    (New, &[InProgress]),
    (InProgress, &[Repaired, Scrap]),
    (Repaired, &[]),
    (Scrap, &[]),
];

/// Statuses reachable in one step from `from`
pub fn allowed_transitions(from: RequestStatus) -> &'static [RequestStatus] {
    TRANSITIONS
        .iter()
        .find(|(source, _)| *source == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

pub fn can_transition(from: RequestStatus, to: RequestStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

/// A status with no outgoing moves
pub fn is_terminal(status: RequestStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// One row of the published status table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransitionRule {
    pub from: RequestStatus,
    pub to: Vec<RequestStatus>,
}

/// The status table in a form clients can consume
pub fn transition_table() -> Vec<TransitionRule> {
    TRANSITIONS
        .iter()
        .map(|(from, to)| TransitionRule {
            from: *from,
            to: to.to_vec(),
        })
        .collect()
}

/// Secondary write triggered by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cascade {
    /// Mark the equipment as scrapped
    ScrapEquipment(Uuid),
}

/// Everything a store needs to apply one status change atomically
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub request_id: Uuid,
    /// Status the plan was computed from; the write only lands if it is still current
    pub expected: RequestStatus,
    pub next: RequestStatus,
    /// New duration, `None` keeps the stored value
    pub duration_hours: Option<f64>,
    /// New completion date, `None` keeps the stored value
    pub completion_date: Option<DateTime<Utc>>,
    pub cascade: Option<Cascade>,
}

impl TransitionPlan {
    /// Apply the request half of the plan to an in-memory copy
    pub fn apply_to(&self, request: &mut MaintenanceRequest, now: DateTime<Utc>) {
        request.status = self.next;
        if let Some(hours) = self.duration_hours {
            request.duration_hours = hours;
        }
        if let Some(date) = self.completion_date {
            request.completion_date = Some(date);
        }
        request.updated_at = now;
    }
}

/// Validate a move from the request's current status to `to` and work out its side effects.
///
/// Moving to `Repaired` stamps the completion date and records `duration_hours` when
/// one is given. Moving to `Scrap` scraps the request's equipment.
pub fn plan(
    request: &MaintenanceRequest,
    to: RequestStatus,
    duration_hours: Option<f64>,
    now: DateTime<Utc>,
) -> AppResult<TransitionPlan> {
    let from = request.status;
    if !can_transition(from, to) {
        return Err(AppError::InvalidTransition { from, to });
    }

    let mut plan = TransitionPlan {
        request_id: request.id,
        expected: from,
        next: to,
        duration_hours: None,
        completion_date: None,
        cascade: None,
    };

    match to {
        Repaired => {
            if let Some(hours) = duration_hours {
                if !hours.is_finite() || hours < 0.0 {
                    return Err(AppError::Validation(
                        "durationHours must be a non-negative number".to_string(),
                    ));
                }
                plan.duration_hours = Some(hours);
            }
            plan.completion_date = Some(now);
        }
        Scrap => {
            plan.cascade = Some(Cascade::ScrapEquipment(request.equipment));
        }
        New | InProgress => {}
    }

    Ok(plan)
}
