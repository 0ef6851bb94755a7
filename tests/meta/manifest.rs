//! Checks package metadata in `Cargo.toml`

#[cfg(test)]
mod tests {
    use std::fs;

    // Tests the package is unpublished and names no external locations
    // Verified by adding a repository URL to the manifest
    #[test]
    fn test_manifest_has_no_external_locations() {
        let manifest = fs::read_to_string("Cargo.toml").unwrap();
        let package: Vec<&str> = manifest
            .lines()
            .skip_while(|line| line.trim() != "[package]")
            .skip(1)
            .take_while(|line| !line.starts_with('['))
            .collect();

        assert!(package.iter().any(|line| line.trim() == "publish = false"));
        for field in ["authors", "homepage", "repository", "documentation"] {
            assert!(
                !package.iter().any(|line| line.starts_with(field)),
                "unexpected package field {field}"
            );
        }
        assert!(!manifest.contains("https://"));
    }
}
