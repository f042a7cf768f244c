//! In-memory doubles for exercising migrations without a database engine.
//!
//! [`MemoryDriver`] records every driver interaction in a shared journal
//! and replays scripted query results, so tests can assert on the exact
//! SQL a processor issues and on the order of transaction calls.
//! [`RecordingAnnouncer`] captures announcements the same way. Both are
//! cheap clones over shared state, letting a test keep a handle while
//! the processor owns the other.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::announcer::Announcer;
use crate::driver::{
    ConnectionState, DatabaseDriver, DriverCommand, DriverConnection, DriverError, DriverRows,
    DriverTransaction,
};
use crate::rowset::RowSet;
use crate::value::SqlValue;

/// One recorded driver interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Connect(String),
    Open,
    Close,
    BeginTransaction,
    Commit,
    Rollback,
    SetTimeout(Option<Duration>),
    Execute(String),
    Query(String),
}

#[derive(Default)]
struct MemoryState {
    calls: Vec<DriverCall>,
    executed: Vec<String>,
    scripted_results: Vec<(String, RowSet)>,
    failing_execute: Option<String>,
    failing_query: Option<String>,
    failing_rollback: bool,
}

/// A scriptable driver that records calls instead of talking to a
/// database.
///
/// Connections created from a clone share the journal, so keep one
/// handle in the test and give the other to the factory or processor.
#[derive(Clone, Default)]
pub struct MemoryDriver {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the rows returned for an exact SQL text. Unscripted
    /// queries return an empty result.
    pub fn provide_rows(&self, sql: &str, rows: RowSet) {
        self.state
            .borrow_mut()
            .scripted_results
            .push((sql.to_string(), rows));
    }

    /// Makes every statement containing `fragment` fail.
    pub fn fail_execute_containing(&self, fragment: &str) {
        self.state.borrow_mut().failing_execute = Some(fragment.to_string());
    }

    /// Makes every query containing `fragment` fail.
    pub fn fail_query_containing(&self, fragment: &str) {
        self.state.borrow_mut().failing_query = Some(fragment.to_string());
    }

    /// Makes every transaction rollback fail.
    pub fn fail_rollback(&self) {
        self.state.borrow_mut().failing_rollback = true;
    }

    /// Returns the full interaction journal in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<DriverCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the statements that executed successfully, in order.
    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        self.state.borrow().executed.clone()
    }

    fn record(&self, call: DriverCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl DatabaseDriver for MemoryDriver {
    fn create_connection(
        &self,
        connection_string: &str,
    ) -> Result<Box<dyn DriverConnection>, DriverError> {
        self.record(DriverCall::Connect(connection_string.to_string()));
        Ok(Box::new(MemoryConnection {
            state: ConnectionState::Closed,
            shared: Rc::clone(&self.state),
        }))
    }
}

struct MemoryConnection {
    state: ConnectionState,
    shared: Rc<RefCell<MemoryState>>,
}

impl DriverConnection for MemoryConnection {
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn open(&mut self) -> Result<(), DriverError> {
        self.shared.borrow_mut().calls.push(DriverCall::Open);
        self.state = ConnectionState::Open;
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        self.shared.borrow_mut().calls.push(DriverCall::Close);
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result<Box<dyn DriverTransaction>, DriverError> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::new(
                "cannot begin a transaction on a closed connection",
            ));
        }
        self.shared
            .borrow_mut()
            .calls
            .push(DriverCall::BeginTransaction);
        Ok(Box::new(MemoryTransaction {
            shared: Rc::clone(&self.shared),
        }))
    }

    fn create_command<'conn>(
        &'conn mut self,
        sql: &str,
        _transaction: &'conn mut dyn DriverTransaction,
    ) -> Result<Box<dyn DriverCommand + 'conn>, DriverError> {
        if self.state != ConnectionState::Open {
            return Err(DriverError::new(
                "cannot create a command on a closed connection",
            ));
        }
        Ok(Box::new(MemoryCommand {
            sql: sql.to_string(),
            shared: Rc::clone(&self.shared),
        }))
    }
}

struct MemoryTransaction {
    shared: Rc<RefCell<MemoryState>>,
}

impl DriverTransaction for MemoryTransaction {
    fn commit(self: Box<Self>) -> Result<(), DriverError> {
        self.shared.borrow_mut().calls.push(DriverCall::Commit);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), DriverError> {
        let mut state = self.shared.borrow_mut();
        state.calls.push(DriverCall::Rollback);
        if state.failing_rollback {
            return Err(DriverError::new("rollback failed"));
        }
        Ok(())
    }
}

struct MemoryCommand {
    sql: String,
    shared: Rc<RefCell<MemoryState>>,
}

impl DriverCommand for MemoryCommand {
    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.shared
            .borrow_mut()
            .calls
            .push(DriverCall::SetTimeout(timeout));
    }

    fn execute_non_query(&mut self) -> Result<u64, DriverError> {
        let mut state = self.shared.borrow_mut();
        state.calls.push(DriverCall::Execute(self.sql.clone()));
        if let Some(fragment) = &state.failing_execute {
            if self.sql.contains(fragment.as_str()) {
                return Err(DriverError::new(format!("execute failed: {}", self.sql)));
            }
        }
        state.executed.push(self.sql.clone());
        Ok(1)
    }

    fn execute_query(&mut self) -> Result<Box<dyn DriverRows + '_>, DriverError> {
        let mut state = self.shared.borrow_mut();
        state.calls.push(DriverCall::Query(self.sql.clone()));
        if let Some(fragment) = &state.failing_query {
            if self.sql.contains(fragment.as_str()) {
                return Err(DriverError::new(format!("query failed: {}", self.sql)));
            }
        }
        let result = state
            .scripted_results
            .iter()
            .find(|(scripted, _)| scripted == &self.sql)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();
        drop(state);
        let (columns, rows) = result.into_parts();
        Ok(Box::new(MemoryRows {
            columns,
            rows: rows.into_iter(),
        }))
    }
}

struct MemoryRows {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<SqlValue>>,
}

impl DriverRows for MemoryRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<SqlValue>>, DriverError> {
        Ok(self.rows.next())
    }
}

/// One captured announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    Say(String),
    Sql(String),
    Error(String),
}

/// An announcer that stores announcements for later assertions.
///
/// Clones share the captured log.
#[derive(Clone, Default)]
pub struct RecordingAnnouncer {
    log: Rc<RefCell<Vec<Announcement>>>,
}

impl RecordingAnnouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything announced so far, in order.
    #[must_use]
    pub fn announcements(&self) -> Vec<Announcement> {
        self.log.borrow().clone()
    }

    /// Returns only the announced SQL statements, in order.
    #[must_use]
    pub fn sql_log(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                Announcement::Sql(sql) => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Announcer for RecordingAnnouncer {
    fn say(&mut self, message: &str) {
        self.log
            .borrow_mut()
            .push(Announcement::Say(message.to_string()));
    }

    fn sql(&mut self, sql: &str) {
        self.log
            .borrow_mut()
            .push(Announcement::Sql(sql.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.log
            .borrow_mut()
            .push(Announcement::Error(message.to_string()));
    }
}
