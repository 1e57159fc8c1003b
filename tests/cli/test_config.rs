//! Tests for the show-config CLI command

use crate::cli::test_helpers::CliFixture;
use crate::common::TestCorpus;
use xtindex::cli::commands::config::{execute, ConfigArgs};
use xtindex::cli::OutputFormat;
use xtindex::core::config::StopwordsSpec;
use xtindex::core::services::Services;
use xtindex::core::xdg::XdgDirs;

#[test]
fn test_show_config_human() {
    let fixture = CliFixture::new(TestCorpus::small());
    let xdg = XdgDirs::new();

    let result = execute(ConfigArgs { all: false }, &fixture.services, &xdg, OutputFormat::Human);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_all_json() {
    let fixture = CliFixture::new(TestCorpus::small());
    let mut config = (*fixture.services.config).clone();
    config.indexes[0].skip = Some("*.bak.xml draft*".to_string());
    config.indexes[0].stopwords = Some(StopwordsSpec::List(vec!["The".into(), "a".into()]));
    let services = Services::new(config);
    let xdg = XdgDirs::new();

    let result = execute(ConfigArgs { all: true }, &services, &xdg, OutputFormat::Json);
    assert!(result.is_ok());
}

#[test]
fn test_show_config_with_unresolvable_index() {
    let fixture = CliFixture::new(TestCorpus::small());
    let mut config = (*fixture.services.config).clone();
    config.indexes[0].stopwords = Some(StopwordsSpec::File {
        file: fixture.data.path().join("missing-stopwords.txt"),
    });
    let services = Services::new(config);
    let xdg = XdgDirs::new();

    // The broken index is reported as a warning, not an error
    let result = execute(ConfigArgs { all: true }, &services, &xdg, OutputFormat::Human);
    assert!(result.is_ok());
}
