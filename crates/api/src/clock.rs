// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

/// Captures the caller's calendar day and the current timestamp once
/// per request.
///
/// The date fixes a new ticket's day at issuance and is never
/// recomputed for existing tickets. Local time is preferred; when the
/// local offset cannot be determined (sandboxed environments), UTC is
/// used.
#[must_use]
pub fn local_today_and_now() -> (Date, String) {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    let timestamp = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));
    (now.date(), timestamp)
}
