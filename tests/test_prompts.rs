//! Tests for the shipped instruction templates under config/prompts

use std::fs;
use std::path::{Path, PathBuf};

use inimeg_chat::chat::Locale;
use inimeg_chat::chat::prompt::{Flow, load_template};

fn prompts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("config/prompts")
}

fn prompt_path(name: &str) -> PathBuf {
    prompts_dir().join(name)
}

#[test]
fn test_every_flow_has_a_file_per_locale() {
    for flow in [Flow::Response, Flow::Opener] {
        for locale in [Locale::Es, Locale::En] {
            let name = flow.file_name(locale);
            assert!(prompt_path(&name).exists(), "{name} prompt file missing");
        }
    }
}

#[test]
fn test_response_template_vars() {
    for name in ["response.es.txt", "response.en.txt"] {
        let text = fs::read_to_string(prompt_path(name)).unwrap();
        assert!(text.contains("{{history}}"), "{name} should contain {{{{history}}}} variable");
        assert!(text.contains("{{message}}"), "{name} should contain {{{{message}}}} variable");
    }
}

#[test]
fn test_opener_template_names_output_field() {
    for name in ["opener.es.txt", "opener.en.txt"] {
        let text = fs::read_to_string(prompt_path(name)).unwrap();
        assert!(text.contains("'prompt'"), "{name} should name the 'prompt' output field");
    }
}

#[test]
fn test_shipped_files_match_builtin_templates() {
    for flow in [Flow::Response, Flow::Opener] {
        for locale in [Locale::Es, Locale::En] {
            let on_disk = load_template(&prompts_dir(), flow, locale);
            assert_eq!(on_disk.trim(), flow.fallback(locale), "{}", flow.file_name(locale));
        }
    }
}
