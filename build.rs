use std::fs;
use std::path::Path;

fn main() {
    // The OpenAPI document is derived from the handlers and response types
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=src/services/alert_service.rs");
    println!("cargo:rerun-if-changed=src/services/bulletin_service.rs");

    let openapi_path = Path::new("openapi.json");

    if !openapi_path.exists() {
        let placeholder = r#"{
  "note": "Run 'cargo run --bin generate-openapi' to generate the OpenAPI spec"
}"#;
        fs::write(openapi_path, placeholder).expect("Failed to create openapi.json placeholder");
    }
}
