//! Example: Previewing a Migration Script
//!
//! This example builds a small schema migration and runs it in preview
//! mode, so the full SQL script is rendered without executing anything.
//!
//! Run with: cargo run --example preview_script -p ingot-migrate

use ingot_migrate::prelude::*;
use ingot_migrate::testing::MemoryDriver;

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    println!("[1] Building the migration script (preview mode):\n");
    println!("{}", "-".repeat(70));

    let factory = SqlServerCeProcessorFactory::new(Box::new(MemoryDriver::new()));
    let mut processor = factory.create(
        "Data Source=app.sdf",
        Box::new(ScriptAnnouncer::new(std::io::stdout())),
        ProcessorOptions { preview_only: true },
    )?;

    processor.process(ChangeExpression::CreateTable {
        name: "Users".to_string(),
        columns: vec![
            ColumnDefinition::new("Id", SqlType::Int)
                .not_null()
                .identity()
                .primary_key(),
            ColumnDefinition::new("Email", SqlType::NVarChar(200))
                .not_null()
                .unique(),
            ColumnDefinition::new("CreatedAt", SqlType::DateTime)
                .default_value(DefaultValue::Expression("GETDATE()".to_string())),
        ],
    })?;
    processor.process(ChangeExpression::CreateIndex {
        name: "IX_Users_Email".to_string(),
        table: "Users".to_string(),
        columns: vec!["Email".to_string()],
        unique: true,
    })?;
    processor.process(ChangeExpression::RenameTable {
        old_name: "Users".to_string(),
        new_name: "Members".to_string(),
    })?;
    processor.commit_transaction()?;

    println!("{}", "-".repeat(70));
    println!();
    println!("Preview completed without touching a database.");
    Ok(())
}
