//! coursekit - Maintenance tools for Canvas courses and Panopto folders
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  coursekit::cli::run().await;
}
