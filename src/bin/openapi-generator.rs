//! Prints the OpenAPI document of the HTTP API as pretty JSON.

use utoipa::OpenApi;
use wordrooms_back::services::documentation::ApiDoc;

fn main() -> Result<(), serde_json::Error> {
    let doc = ApiDoc::openapi();
    println!("{}", doc.to_pretty_json()?);
    Ok(())
}
