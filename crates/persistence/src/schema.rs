// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS services (
            service_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            prefix TEXT UNIQUE,
            description TEXT,
            is_active INTEGER NOT NULL DEFAULT 1 CHECK(is_active IN (0, 1)),
            average_service_time INTEGER NOT NULL DEFAULT 5
                CHECK(average_service_time >= 1),
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS windows (
            window_id INTEGER PRIMARY KEY AUTOINCREMENT,
            service_id INTEGER NOT NULL,
            window_number INTEGER NOT NULL CHECK(window_number >= 1),
            name TEXT,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK(status IN ('active', 'inactive', 'maintenance')),
            current_staff INTEGER,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(service_id, window_number),
            FOREIGN KEY(service_id) REFERENCES services(service_id)
        );

        -- One window per staff member at any time
        CREATE UNIQUE INDEX IF NOT EXISTS idx_windows_current_staff
            ON windows(current_staff) WHERE current_staff IS NOT NULL;

        CREATE TABLE IF NOT EXISTS tickets (
            ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
            public_id TEXT NOT NULL UNIQUE,
            service_id INTEGER NOT NULL,
            queue_number INTEGER NOT NULL CHECK(queue_number >= 1),
            status TEXT NOT NULL DEFAULT 'waiting'
                CHECK(status IN ('waiting', 'notified', 'serving',
                                 'served', 'cancelled', 'skipped')),
            ticket_date TEXT NOT NULL,
            assigned_window INTEGER,
            called_by INTEGER,
            served_by INTEGER,
            created_at TEXT NOT NULL,
            called_at TEXT,
            served_at TEXT,
            skipped_at TEXT,
            notes TEXT,
            UNIQUE(service_id, ticket_date, queue_number),
            FOREIGN KEY(service_id) REFERENCES services(service_id),
            FOREIGN KEY(assigned_window) REFERENCES windows(window_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tickets_scope
            ON tickets(service_id, ticket_date, queue_number);

        CREATE INDEX IF NOT EXISTS idx_tickets_window_status
            ON tickets(assigned_window, status);

        CREATE TABLE IF NOT EXISTS queue_events (
            event_id INTEGER PRIMARY KEY AUTOINCREMENT,
            service_id INTEGER NOT NULL,
            ticket_id INTEGER,
            actor_id TEXT NOT NULL,
            actor_type TEXT NOT NULL,
            action_name TEXT NOT NULL,
            action_details TEXT,
            prior_status TEXT,
            new_status TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(service_id) REFERENCES services(service_id),
            FOREIGN KEY(ticket_id) REFERENCES tickets(ticket_id)
        );

        CREATE INDEX IF NOT EXISTS idx_queue_events_ticket
            ON queue_events(ticket_id);

        CREATE INDEX IF NOT EXISTS idx_queue_events_scope
            ON queue_events(service_id, event_id);
        ",
    )?;

    Ok(())
}

/// Verifies that foreign key enforcement is enabled.
///
/// If foreign keys are not enabled, the database cannot guarantee the
/// referential integrity constraints the engine relies on.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &Connection) -> Result<(), PersistenceError> {
    let foreign_keys_enabled: i32 =
        conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Enable WAL mode for file-based databases.
///
/// WAL (Write-Ahead Logging) mode provides better read concurrency
/// for file-based databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &Connection) -> Result<(), PersistenceError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(())
}
