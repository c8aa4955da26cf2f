// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queue computations.
//!
//! Everything here is a pure function over a snapshot of one service's
//! tickets for one day. Position and wait estimates are always computed
//! within the ticket's own `(service, ticket_date)` scope, never
//! globally.

use crate::ticket::{Ticket, TicketStatus};
use crate::types::Service;
use crate::window::Window;
use serde::{Deserialize, Serialize};
use time::Date;

/// All tickets of one service for one calendar day.
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    /// The service the snapshot belongs to.
    pub service: Service,
    /// The day the snapshot covers.
    pub ticket_date: Date,
    /// The day's tickets, ordered by queue number.
    pub tickets: Vec<Ticket>,
}

/// Per-status counts for a service's day, for dashboards and boards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub waiting: usize,
    pub notified: usize,
    pub serving: usize,
    pub served: usize,
    pub cancelled: usize,
    pub skipped: usize,
    pub total: usize,
    /// Display number of the next ticket call-next would pick, if any.
    pub next_waiting: Option<String>,
}

/// A currently-served ticket together with the window serving it.
#[derive(Debug, Clone)]
pub struct ServingEntry<'a> {
    pub window: &'a Window,
    pub ticket: &'a Ticket,
}

impl QueueSnapshot {
    /// Counts the tickets ahead of the given ticket in its queue.
    ///
    /// Only tickets still occupying a queue slot (`waiting` or
    /// `notified`) with a strictly smaller queue number are counted.
    /// A ticket that has itself left the queue has nobody ahead of it.
    #[must_use]
    pub fn people_ahead(&self, ticket: &Ticket) -> usize {
        if !ticket.status.is_queued() {
            return 0;
        }

        self.tickets
            .iter()
            .filter(|t| t.status.is_queued() && t.queue_number < ticket.queue_number)
            .count()
    }

    /// Estimates the wait in minutes for the given ticket.
    ///
    /// The estimate is people-ahead multiplied by the service's average
    /// service time; zero once the ticket is being served or done.
    #[must_use]
    pub fn estimated_wait_minutes(&self, ticket: &Ticket) -> u64 {
        let ahead = u64::try_from(self.people_ahead(ticket)).unwrap_or(u64::MAX);
        ahead.saturating_mul(u64::from(self.service.average_service_time()))
    }

    /// Returns the tickets currently in `serving`, one per window,
    /// ordered by window number.
    ///
    /// Windows with no active ticket are omitted.
    #[must_use]
    pub fn currently_serving<'a>(&'a self, windows: &'a [Window]) -> Vec<ServingEntry<'a>> {
        let mut entries: Vec<ServingEntry<'a>> = Vec::new();

        for window in windows {
            let ticket = self.tickets.iter().find(|t| {
                t.status == TicketStatus::Serving && t.assigned_window == window.window_id
            });
            if let Some(ticket) = ticket {
                entries.push(ServingEntry { window, ticket });
            }
        }

        entries.sort_by_key(|e| e.window.window_number);
        entries
    }

    /// Returns the next ticket call-next would select: the waiting
    /// ticket with the smallest queue number.
    ///
    /// Notified tickets are already claimed and are not considered.
    #[must_use]
    pub fn next_waiting(&self) -> Option<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.status == TicketStatus::Waiting)
            .min_by_key(|t| t.queue_number)
    }

    /// Computes per-status counts for the day.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let count = |status: TicketStatus| self.tickets.iter().filter(|t| t.status == status).count();

        QueueStats {
            waiting: count(TicketStatus::Waiting),
            notified: count(TicketStatus::Notified),
            serving: count(TicketStatus::Serving),
            served: count(TicketStatus::Served),
            cancelled: count(TicketStatus::Cancelled),
            skipped: count(TicketStatus::Skipped),
            total: self.tickets.len(),
            next_waiting: self
                .next_waiting()
                .map(|t| self.service.display_number(t.queue_number)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowStatus;
    use time::macros::date;

    fn snapshot_with(statuses: &[TicketStatus]) -> QueueSnapshot {
        let service = Service::with_id(1, "Cashier", Some("C"), None, true, 5);
        let ticket_date = date!(2026 - 08 - 06);
        let tickets = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut ticket = Ticket::new(
                    1,
                    u32::try_from(i + 1).unwrap_or(u32::MAX),
                    ticket_date,
                    String::from("2026-08-06T09:00:00Z"),
                );
                ticket.ticket_id = Some(i64::try_from(i + 1).unwrap_or(i64::MAX));
                ticket.status = *status;
                ticket
            })
            .collect();

        QueueSnapshot {
            service,
            ticket_date,
            tickets,
        }
    }

    #[test]
    fn test_people_ahead_counts_smaller_queued_numbers() {
        let snapshot = snapshot_with(&[
            TicketStatus::Waiting,
            TicketStatus::Waiting,
            TicketStatus::Waiting,
        ]);

        assert_eq!(snapshot.people_ahead(&snapshot.tickets[0]), 0);
        assert_eq!(snapshot.people_ahead(&snapshot.tickets[1]), 1);
        assert_eq!(snapshot.people_ahead(&snapshot.tickets[2]), 2);
    }

    #[test]
    fn test_people_ahead_ignores_departed_tickets() {
        let snapshot = snapshot_with(&[
            TicketStatus::Served,
            TicketStatus::Serving,
            TicketStatus::Waiting,
        ]);

        // Tickets 1 and 2 have left the queue, so ticket 3 is front
        assert_eq!(snapshot.people_ahead(&snapshot.tickets[2]), 0);
    }

    #[test]
    fn test_people_ahead_zero_once_past_queue() {
        let snapshot = snapshot_with(&[TicketStatus::Waiting, TicketStatus::Serving]);

        assert_eq!(snapshot.people_ahead(&snapshot.tickets[1]), 0);
    }

    #[test]
    fn test_notified_still_counts_toward_people_ahead() {
        let snapshot = snapshot_with(&[TicketStatus::Notified, TicketStatus::Waiting]);

        assert_eq!(snapshot.people_ahead(&snapshot.tickets[1]), 1);
    }

    #[test]
    fn test_estimated_wait_uses_average_service_time() {
        let snapshot = snapshot_with(&[
            TicketStatus::Waiting,
            TicketStatus::Waiting,
            TicketStatus::Waiting,
        ]);

        // 2 ahead x 5 minutes
        assert_eq!(snapshot.estimated_wait_minutes(&snapshot.tickets[2]), 10);
        assert_eq!(snapshot.estimated_wait_minutes(&snapshot.tickets[0]), 0);
    }

    #[test]
    fn test_next_waiting_skips_notified() {
        let snapshot = snapshot_with(&[TicketStatus::Notified, TicketStatus::Waiting]);

        let next = snapshot.next_waiting();
        assert_eq!(next.map(|t| t.queue_number), Some(2));
    }

    #[test]
    fn test_next_waiting_empty_queue() {
        let snapshot = snapshot_with(&[TicketStatus::Served, TicketStatus::Cancelled]);
        assert!(snapshot.next_waiting().is_none());
    }

    #[test]
    fn test_currently_serving_ordered_by_window_number() {
        let mut snapshot = snapshot_with(&[TicketStatus::Serving, TicketStatus::Serving]);
        snapshot.tickets[0].assigned_window = Some(20);
        snapshot.tickets[1].assigned_window = Some(10);

        let windows = vec![
            Window::with_id(20, 1, 2, None, WindowStatus::Active, None),
            Window::with_id(10, 1, 1, None, WindowStatus::Active, None),
        ];

        let serving = snapshot.currently_serving(&windows);
        assert_eq!(serving.len(), 2);
        assert_eq!(serving[0].window.window_number, 1);
        assert_eq!(serving[0].ticket.queue_number, 2);
        assert_eq!(serving[1].window.window_number, 2);
    }

    #[test]
    fn test_stats_counts_and_next_display_number() {
        let snapshot = snapshot_with(&[
            TicketStatus::Served,
            TicketStatus::Serving,
            TicketStatus::Waiting,
            TicketStatus::Skipped,
        ]);

        let stats = snapshot.stats();
        assert_eq!(stats.waiting, 1);
        assert_eq!(stats.serving, 1);
        assert_eq!(stats.served, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.next_waiting.as_deref(), Some("C003"));
    }
}
