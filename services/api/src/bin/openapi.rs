//! services/api/src/bin/openapi.rs
//!
//! Dumps the quiz API's OpenAPI document so front-end clients can be generated
//! without starting the server. Usage: `openapi [output-path]` (defaults to
//! `openapi.json`).

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

/// Serializes the document as pretty JSON at `path`.
fn write_document(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = api_doc.to_pretty_json()?;
    std::fs::write(path, json)?;
    println!("Wrote the quiz API document to {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());
    write_document(ApiDoc::openapi(), &path)?;
    Ok(())
}
