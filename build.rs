use std::fs;

fn main() {
    // Validate the bundled defaults at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    let Some(list) = table.get("list").and_then(|v| v.as_table()) else {
        panic!("default_config.toml: missing [list] section");
    };
    // Nested items must always land further in than their parent
    for (key, min) in [("base_indent", 1), ("ordered_marker_width", 0), ("unordered_marker_width", 0)] {
        match list.get(key).and_then(|v| v.as_integer()) {
            Some(n) if n >= min => {}
            Some(n) => panic!("default_config.toml: list.{} must be at least {}, got {}", key, min, n),
            None => panic!("default_config.toml: list.{} must be an integer", key),
        }
    }
    if !list.get("bullet").is_some_and(|v| v.is_str()) {
        panic!("default_config.toml: list.bullet must be a string");
    }
}
