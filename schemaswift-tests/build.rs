fn main() {
    // Generate the Swift file for integration tests
    // The tests read it back with include_str!, so it doesn't affect
    // normal library compilation
    let output = schemaswift::out_dir_path("Schema.swift").unwrap();
    schemaswift::CodegenBuilder::new("fixtures/schema.sql")
        .exclude_tables(&["schema_migrations"])
        .output(&output)
        .generate()
        .expect("codegen failed");

    println!("cargo:rerun-if-changed=fixtures/schema.sql");
}
