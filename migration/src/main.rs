use migration::runner;
use std::{env, fs, path::Path, process};
use util::config;

#[tokio::main]
async fn main() {
    let db_path = config::database_path();
    let url = format!("sqlite://{}?mode=rwc", db_path);
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("clean") => {
            remove_db_file(&db_path);
        }
        Some("fresh") => {
            remove_db_file(&db_path);
            create_db_dir(&db_path);
            migrate(&url).await;
        }
        _ => {
            create_db_dir(&db_path);
            migrate(&url).await;
        }
    }
}

async fn migrate(url: &str) {
    if let Err(err) = runner::run_all_migrations(url).await {
        eprintln!("Migration failed: {err}");
        process::exit(1);
    }
}

fn remove_db_file(path: &str) {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path).expect("Failed to delete DB file");
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }

    // Uploaded assignment PDFs
    let storage_root = config::assignment_storage_root();
    let storage_path = Path::new(&storage_root);
    if storage_path.exists() {
        fs::remove_dir_all(storage_path).expect("Failed to delete assignment files");
        println!("Deleted assignment files: {}", storage_path.display());
    } else {
        println!("Assignment storage does not exist: {}", storage_path.display());
    }
}

fn create_db_dir(path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        fs::create_dir_all(parent).expect("Failed to create DB directory");
    }
}
