// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use qms_domain::{StaffIdentity, Ticket, TicketStatus, Window, WindowStatus};
use time::macros::date;

pub const NOW: &str = "2026-08-06T09:00:00Z";

pub fn test_staff() -> StaffIdentity {
    StaffIdentity::Staff {
        staff_id: 3,
        service_id: 1,
    }
}

pub fn test_window() -> Window {
    Window::with_id(10, 1, 1, None, WindowStatus::Active, Some(3))
}

pub fn test_ticket(ticket_id: i64, queue_number: u32, status: TicketStatus) -> Ticket {
    let mut ticket = Ticket::new(
        1,
        queue_number,
        date!(2026 - 08 - 06),
        String::from("2026-08-06T08:00:00Z"),
    );
    ticket.ticket_id = Some(ticket_id);
    ticket.status = status;
    ticket
}
