use anyhow::Result;
use std::path::Path;

use dietlog_core::DietService;

pub(crate) fn cmd_init_db(svc: &DietService, db_path: &Path, json: bool) -> Result<()> {
    let created = svc.init_db()?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "created": created, "path": db_path.display().to_string() })
        );
    } else if created {
        println!("Database tables created at {}", db_path.display());
    } else {
        println!("Database already initialized at {}", db_path.display());
    }
    Ok(())
}
