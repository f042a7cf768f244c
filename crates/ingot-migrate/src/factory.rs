//! Wires a driver, generator, and announcer into a ready processor.

use crate::announcer::Announcer;
use crate::driver::DatabaseDriver;
use crate::error::Result;
use crate::generator::SqlServerCeGenerator;
use crate::processor::{MigrationProcessor, ProcessorOptions};

/// Builds [`MigrationProcessor`]s for the SQL Server Compact dialect.
///
/// The factory owns the driver; each [`create`](Self::create) call opens
/// an independent connection, so one factory can serve several target
/// database files.
pub struct SqlServerCeProcessorFactory {
    driver: Box<dyn DatabaseDriver>,
}

impl SqlServerCeProcessorFactory {
    #[must_use]
    pub fn new(driver: Box<dyn DatabaseDriver>) -> Self {
        Self { driver }
    }

    /// Connects to `connection_string` and returns a processor with the
    /// initial transaction already active.
    pub fn create(
        &self,
        connection_string: &str,
        announcer: Box<dyn Announcer>,
        options: ProcessorOptions,
    ) -> Result<MigrationProcessor<SqlServerCeGenerator>> {
        let connection = self.driver.create_connection(connection_string)?;
        MigrationProcessor::new(connection, SqlServerCeGenerator::new(), announcer, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DriverCall, MemoryDriver, RecordingAnnouncer};

    #[test]
    fn test_create_returns_an_active_processor() {
        let driver = MemoryDriver::new();
        let announcer = RecordingAnnouncer::new();
        let factory = SqlServerCeProcessorFactory::new(Box::new(driver.clone()));

        let processor = factory
            .create(
                "Data Source=app.sdf",
                Box::new(announcer.clone()),
                ProcessorOptions::default(),
            )
            .unwrap();

        assert_eq!(processor.database_type(), "SqlCe4");
        assert!(processor.in_transaction());
        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::Connect("Data Source=app.sdf".to_string()),
                DriverCall::Open,
                DriverCall::BeginTransaction,
            ]
        );
    }

    #[test]
    fn test_create_carries_the_options_through() {
        let driver = MemoryDriver::new();
        let factory = SqlServerCeProcessorFactory::new(Box::new(driver.clone()));

        let processor = factory
            .create(
                "Data Source=app.sdf",
                Box::new(RecordingAnnouncer::new()),
                ProcessorOptions { preview_only: true },
            )
            .unwrap();

        assert!(processor.options().preview_only);
    }

    #[test]
    fn test_each_create_opens_its_own_connection() {
        let driver = MemoryDriver::new();
        let factory = SqlServerCeProcessorFactory::new(Box::new(driver.clone()));

        factory
            .create(
                "Data Source=first.sdf",
                Box::new(RecordingAnnouncer::new()),
                ProcessorOptions::default(),
            )
            .unwrap();
        factory
            .create(
                "Data Source=second.sdf",
                Box::new(RecordingAnnouncer::new()),
                ProcessorOptions::default(),
            )
            .unwrap();

        let connects: Vec<DriverCall> = driver
            .calls()
            .into_iter()
            .filter(|call| matches!(call, DriverCall::Connect(_)))
            .collect();
        assert_eq!(
            connects,
            vec![
                DriverCall::Connect("Data Source=first.sdf".to_string()),
                DriverCall::Connect("Data Source=second.sdf".to_string()),
            ]
        );
    }
}
