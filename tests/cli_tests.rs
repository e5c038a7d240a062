//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use tempfile::TempDir;

    use soundshift::cli::args::{Commands, RuleSetFormat};
    use soundshift::cli::commands::{execute, load_rule_set, write_derivations, ApplyOptions};
    use soundshift::cli::detect::{detect_format, DetectionMethod};
    use soundshift::cli::paths::{file_extension, PersistentConfig};

    const RULES: &str = "S=ptk\nZ=bdg\nV=aeiou\nS/Z/V_V\n";

    #[test]
    fn test_detect_text_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.sc");
        fs::write(&path, RULES).unwrap();

        let detection = detect_format(&path, None).unwrap();
        assert_eq!(detection.format, RuleSetFormat::Text);
        assert_eq!(detection.method, DetectionMethod::Extension);
    }

    #[test]
    fn test_detect_json_by_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules");
        fs::write(&path, r#"{"categories": [], "rules": ["p/b/_"]}"#).unwrap();

        let detection = detect_format(&path, None).unwrap();
        assert_eq!(detection.format, RuleSetFormat::Json);
        assert_eq!(detection.method, DetectionMethod::Content);

        let set = load_rule_set(&path, None).unwrap();
        assert_eq!(set.rules(), &["p/b/_"]);
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(file_extension(RuleSetFormat::Text), "sc");
        assert_eq!(file_extension(RuleSetFormat::Json), "json");
    }

    #[test]
    fn test_convert_text_to_json_and_back() {
        let temp_dir = TempDir::new().unwrap();
        let text = temp_dir.path().join("rules.sc");
        let json = temp_dir.path().join("rules.json");
        let back = temp_dir.path().join("back.sc");
        fs::write(&text, RULES).unwrap();

        execute(
            Commands::Convert {
                input: text.clone(),
                output: json.clone(),
                from_format: None,
                to_format: None,
            },
            None,
        )
        .unwrap();
        assert!(fs::read_to_string(&json).unwrap().contains("\"rules\""));

        execute(
            Commands::Convert {
                input: json,
                output: back.clone(),
                from_format: None,
                to_format: None,
            },
            None,
        )
        .unwrap();
        assert_eq!(
            load_rule_set(&back, None).unwrap(),
            load_rule_set(&text, None).unwrap()
        );
    }

    #[test]
    fn test_check_fails_on_bad_rule() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config.json");
        let good = temp_dir.path().join("good.sc");
        let bad = temp_dir.path().join("bad.sc");
        fs::write(&good, RULES).unwrap();
        fs::write(&bad, "p/b\n").unwrap();

        let check = |path: &std::path::Path| {
            execute(
                Commands::Check {
                    rules: Some(path.to_path_buf()),
                    format: None,
                },
                Some(config.as_path()),
            )
        };
        assert!(check(good.as_path()).is_ok());
        assert!(check(bad.as_path()).is_err());
    }

    #[test]
    fn test_apply_uses_configured_rules() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let rules = temp_dir.path().join("rules.sc");
        let lexicon = temp_dir.path().join("words.txt");
        fs::write(&rules, RULES).unwrap();
        fs::write(&lexicon, "kita\ntika\n").unwrap();

        execute(
            Commands::Settings {
                set_rules: Some(rules),
                set_show_input: Some(true),
                set_trace: None,
                reset: false,
            },
            Some(config_path.as_path()),
        )
        .unwrap();
        let config = PersistentConfig::load_from(Some(config_path.as_path())).unwrap();
        assert_eq!(config.show_input, Some(true));

        let result = execute(
            Commands::Apply {
                words: Vec::new(),
                rules: None,
                input: Some(lexicon),
                format: None,
                trace: false,
                show_input: false,
            },
            Some(config_path.as_path()),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_apply_without_rules_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let result = execute(
            Commands::Apply {
                words: vec!["kita".into()],
                rules: None,
                input: None,
                format: None,
                trace: false,
                show_input: false,
            },
            Some(config_path.as_path()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_write_derivations_skips_blank_words() {
        colored::control::set_override(false);
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.sc");
        fs::write(&path, RULES).unwrap();
        let (derivation, _) = load_rule_set(&path, None).unwrap().compile();

        let words = vec!["qipa".to_string(), "  ".to_string(), "kita\r".to_string()];
        let mut out = Vec::new();
        write_derivations(&derivation, &words, ApplyOptions::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "qiba\nkida\n");
    }
}
