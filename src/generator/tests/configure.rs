use super::*;

/// Embeds the configured SID in scalable IDs only
#[test]
fn embeds_the_configured_sid_in_scalable_ids_only() {
    let config = Config::builder().sid(31).build().unwrap();

    let g = Generator::<Scalable, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(1_000),
    )
    .with_config(config);
    let e = g.generate().unwrap();
    assert_eq!(e.sid(), 31);
    assert_eq!(e.randomness(), 0x0101);
    assert_eq!(e.to_i64(), (1_000 << 20) | (0x0101 << 5) | 31);

    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(1_000),
    )
    .with_config(config);
    let e = g.generate().unwrap();
    assert_eq!(e.to_i64(), (1_000 << 20) | 0x01_0101);
}

/// Measures timestamps from the configured epoch
#[test]
fn measures_timestamps_from_the_configured_epoch() {
    let time = MockTime::at(5_000);
    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(FixedRng(0x01), time);
    assert_eq!(g.generate().unwrap().timestamp(), 5_000);

    // moving the epoch one second earlier moves timestamps one second later
    g.configure(
        Config::builder()
            .epoch(UNIX_EPOCH + Duration::from_secs(DEFAULT_EPOCH_SECS - 1)),
    )
    .unwrap();
    assert_eq!(g.generate().unwrap().timestamp(), 6_000);
}

/// Keeps the previous configuration if validation fails
#[test]
fn keeps_the_previous_configuration_if_validation_fails() {
    let g = Generator::<Scalable, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(1_000),
    );
    let epoch = UNIX_EPOCH + Duration::from_secs(DEFAULT_EPOCH_SECS - 60);
    g.configure(Config::builder().epoch(epoch).entropy_size(2).sid(9))
        .unwrap();

    let cases = [
        (Config::builder().entropy_size(0), ErrorKind::InvalidEntropy),
        (Config::builder().entropy_size(4), ErrorKind::InvalidEntropy),
        (Config::builder().sid(-1), ErrorKind::InvalidConfig),
        (Config::builder().sid(32), ErrorKind::InvalidConfig),
        (
            Config::builder().epoch(UNIX_EPOCH).sid(32),
            ErrorKind::InvalidConfig,
        ),
    ];
    for (builder, kind) in cases {
        assert_eq!(g.configure(builder).unwrap_err().kind(), kind);

        let config = g.config();
        assert_eq!(config.epoch(), epoch);
        assert_eq!(config.entropy_size(), 2);
        assert_eq!(config.sid(), 9);
    }
}

/// Replaces every option on each commit instead of merging
#[test]
fn replaces_every_option_on_each_commit_instead_of_merging() {
    let g = Generator::<Scalable, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(1_000),
    );
    g.configure(Config::builder().entropy_size(3).sid(9)).unwrap();
    g.configure(Config::builder().sid(4)).unwrap();

    let config = g.config();
    assert_eq!(config.entropy_size(), 1);
    assert_eq!(config.sid(), 4);
    assert_eq!(config, Config::builder().sid(4).build().unwrap());
}

/// Applies a new configuration to subsequent generations
#[test]
fn applies_a_new_configuration_to_subsequent_generations() {
    let g = Generator::<Scalable, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(1_000),
    );

    let first = g.generate().unwrap();
    assert_eq!(first.sid(), 0);

    g.configure(Config::builder().entropy_size(2).sid(17)).unwrap();
    let second = g.generate().unwrap();
    assert_eq!(second.sid(), 17);
    assert_eq!(second.randomness(), first.randomness() + 0x0101);
}
