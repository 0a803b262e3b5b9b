#![allow(missing_docs)]

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, app_state::Environment, build_router, db::initialize};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("could not create in-memory SQLite database");
    initialize(&conn).expect("could not initialize test DB");
    conn
}

pub(crate) fn get_test_state() -> AppState {
    let conn = Connection::open_in_memory().expect("could not create in-memory SQLite database");
    AppState::new(conn, "Etc/UTC", Environment::Development).expect("could not create app state")
}

/// A server running the full router over an in-memory database.
pub(crate) fn get_test_server() -> (TestServer, AppState) {
    let state = get_test_state();
    let server =
        TestServer::try_new(build_router(state.clone())).expect("could not create test server");

    (server, state)
}
