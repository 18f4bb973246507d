use ddt_config::{DdtConfig, NullabilityMode};
use figment::Jail;
use pretty_assertions::assert_eq;

#[test]
fn env_vars_fill_config_values() {
    Jail::expect_with(|jail| {
        jail.set_env("DDT_GENERATE__DEFAULT_NAMESPACE", "FromEnv");
        jail.set_env("DDT_GENERATE__NULLABILITY", "strip");
        jail.set_env("DDT_GENERATE__USE_ONLY_NEW_OPERATOR", "true");

        let config = DdtConfig::load().expect("config loads");
        assert_eq!(config.generate.default_namespace, "FromEnv");
        assert_eq!(config.generate.nullability, NullabilityMode::Strip);
        assert!(config.generate.use_only_new_operator);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir(jail.directory().join(".ddt")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".ddt/config.toml",
            "[generate]\ndefault_namespace = \"FromToml\"\nindentation = \"  \"\n",
        )?;
        jail.set_env("DDT_GENERATE__DEFAULT_NAMESPACE", "FromEnv");

        let config = DdtConfig::load().expect("config loads");
        assert_eq!(config.generate.default_namespace, "FromEnv");
        assert_eq!(config.generate.indentation, "  ");
        Ok(())
    });
}

#[test]
fn unrelated_prefixed_vars_are_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("DDT_LOG", "debug");

        let config = DdtConfig::load().expect("config loads");
        assert_eq!(config, DdtConfig::default());
        Ok(())
    });
}
