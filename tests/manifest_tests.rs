//! Build configuration checks that no native test run would otherwise catch.

const MANIFEST: &str = include_str!("../Cargo.toml");

#[test]
fn test_wasm_builds_enable_js_randomness_for_ids() {
    let wasm_section = MANIFEST
        .split("[target.'cfg(target_arch = \"wasm32\")'.dependencies]")
        .nth(1)
        .expect("wasm32 dependency table present");
    let uuid_line = wasm_section
        .lines()
        .take_while(|line| !line.starts_with('['))
        .find(|line| line.starts_with("uuid"))
        .expect("uuid listed for wasm32");
    assert!(uuid_line.contains("\"v4\""));
    assert!(uuid_line.contains("\"js\""));
}
