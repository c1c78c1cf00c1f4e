//! Kanban projection

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{
    enums::RequestStatus,
    request::{MaintenanceRequest, RequestDetails},
};

/// Anything that can be placed on the board
pub trait KanbanCard {
    fn status(&self) -> RequestStatus;
    fn created_at(&self) -> DateTime<Utc>;
}

impl KanbanCard for MaintenanceRequest {
    fn status(&self) -> RequestStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl KanbanCard for RequestDetails {
    fn status(&self) -> RequestStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Requests grouped by status. All four statuses are always present, in table order.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct KanbanBoard<T>(IndexMap<RequestStatus, Vec<T>>);

impl<T> KanbanBoard<T> {
    pub fn column(&self, status: RequestStatus) -> &[T] {
        self.0.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn columns(&self) -> impl Iterator<Item = (&RequestStatus, &Vec<T>)> {
        self.0.iter()
    }
}

/// Group cards by status, newest first within each column
pub fn project<T: KanbanCard>(cards: impl IntoIterator<Item = T>) -> KanbanBoard<T> {
    let mut columns: IndexMap<RequestStatus, Vec<T>> = RequestStatus::ALL
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();

    for card in cards {
        columns.entry(card.status()).or_default().push(card);
    }

    for column in columns.values_mut() {
        column.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    }

    KanbanBoard(columns)
}
