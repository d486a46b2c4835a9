//! Database migrations - embedded SQL files
//!
//! Each entry is (filename, sql). Entries are applied in order and tracked
//! in `sys_migrations`; new files get the next NNN_ prefix and an entry here.

pub const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_initial_schema.sql", include_str!("001_initial_schema.sql")),
];
