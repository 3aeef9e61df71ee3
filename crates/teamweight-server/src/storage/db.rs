//! SQLite database for the teamweight server.

teamweight_core::define_database!(TeamDatabase, "Team database migrations complete");
