//! Library integration tests.

use liveproto_setup::ProvisionError;

#[test]
fn error_types_are_public() {
    let err = ProvisionError::DependencyManagerMissing {
        package: "taknone/liveproto".into(),
    };
    assert!(err.to_string().contains("taknone/liveproto"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> liveproto_setup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use liveproto_setup::cli::Cli;
    use liveproto_setup::ui::OutputMode;

    let cli = Cli::parse_from(["liveproto-setup", "--verbose", "--debug"]);
    assert!(cli.debug);
    assert_eq!(cli.output_mode(), OutputMode::Verbose);
}
