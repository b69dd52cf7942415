//! Tests for signature validation config files.

use color_eyre::eyre::Result;

use super::*;

#[test]
fn default_config_batches_schnorr_signatures() {
    let _init_guard = sigbatch_test::init();

    let config = Config::default();

    assert!(config.batch_schnorr);
    assert_eq!(config.sig_cache_max_entries, 1 << 20);
    assert_eq!(config.signature_cache().max_entries(), 1 << 20);
}

#[test]
fn empty_config_file_uses_defaults() -> Result<()> {
    let _init_guard = sigbatch_test::init();

    let config: Config = toml::from_str("")?;
    assert_eq!(config, Config::default());

    let config: Config = toml::from_str("batch_schnorr = false")?;
    assert!(!config.batch_schnorr);
    assert_eq!(config.sig_cache_max_entries, Config::default().sig_cache_max_entries);

    Ok(())
}

#[test]
fn config_survives_a_file_round_trip() -> Result<()> {
    let _init_guard = sigbatch_test::init();

    let config = Config {
        batch_schnorr: false,
        sig_cache_max_entries: 64,
    };

    let file = toml::to_string(&config)?;
    assert_eq!(toml::from_str::<Config>(&file)?, config);

    Ok(())
}

#[test]
fn unknown_config_fields_are_rejected() {
    let _init_guard = sigbatch_test::init();

    let result = toml::from_str::<Config>("batch_ecdsa = true");

    assert!(result.is_err());
}
