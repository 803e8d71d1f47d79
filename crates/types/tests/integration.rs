//! Integration tests for types

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use pyfreeze_types::*;

    #[test]
    fn test_color_choice_serialization() {
        let json = serde_json::to_string(&ColorChoice::Never).unwrap();
        assert_eq!(json, r#""never""#);
        let parsed: ColorChoice = serde_json::from_str(r#""always""#).unwrap();
        assert_eq!(parsed, ColorChoice::Always);
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&BuildStage::Finalizing).unwrap();
        assert_eq!(json, r#""finalizing""#);
    }

    #[test]
    fn test_manifest_json_shape() {
        let manifest = BuildManifest::new("myapp")
            .with_data_folders(["assets"])
            .with_hidden_modules(["dbdicom"]);
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["project"], "myapp");
        assert_eq!(value["single_file"], true);
        assert_eq!(value["data_mappings"][0]["source"], "assets");
        assert_eq!(value["hidden_modules"][0], "dbdicom");
    }

    proptest! {
        #[test]
        fn prop_rendered_mapping_splits_once(name in "[a-zA-Z0-9_]{1,16}") {
            let rendered = DataMapping::folder(name.clone()).render(':', '/');
            let parts: Vec<&str> = rendered.split(':').collect();
            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], name.as_str());
            prop_assert_eq!(parts[1], format!("./{name}"));
        }

        #[test]
        fn prop_hidden_modules_are_unique(modules in proptest::collection::vec("[a-z]{1,6}", 0..12)) {
            let manifest = BuildManifest::new("app").with_hidden_modules(modules.clone());
            let hidden = manifest.hidden_modules();
            for (i, m) in hidden.iter().enumerate() {
                prop_assert!(!hidden[i + 1..].contains(m));
            }
            for m in &modules {
                prop_assert!(manifest.has_hidden_module(m));
            }
        }
    }
}
