use super::*;

const MAX_UNIX_SECS: i64 = DEFAULT_EPOCH_SECS as i64 + crate::MAX_TIMESTAMP / 1000;

/// Creates IDs from Unix time in seconds relative to the epoch
#[test]
fn creates_ids_from_unix_time_in_seconds_relative_to_the_epoch() {
    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(0),
    );

    let e = g.from_unix_time(DEFAULT_EPOCH_SECS as i64).unwrap();
    assert_eq!(e.timestamp(), 0);
    assert_eq!(e.randomness(), 0x01_0101);

    let e = g.from_unix_time(DEFAULT_EPOCH_SECS as i64 + 1).unwrap();
    assert_eq!(e.timestamp(), 1_000);

    let e = g.from_unix_time(MAX_UNIX_SECS).unwrap();
    assert_eq!(e.timestamp(), (crate::MAX_TIMESTAMP / 1000) * 1000);
}

/// Returns overflow error if the time is out of the range of the epoch
#[test]
fn returns_overflow_error_if_the_time_is_out_of_the_range_of_the_epoch() {
    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(0),
    );

    for unix_secs in [0, DEFAULT_EPOCH_SECS as i64 - 1, MAX_UNIX_SECS + 1, i64::MIN, i64::MAX] {
        let err = g.from_unix_time(unix_secs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }
}

/// Neither consults nor updates the sequence state
#[test]
fn neither_consults_nor_updates_the_sequence_state() {
    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
        ScriptedRng::new(&[0x00, 0x00, 0x10]),
        MockTime::at(5_000),
    );

    let first = g.generate().unwrap();
    assert_eq!(first.randomness(), 0x10);

    // earlier than the last generated ID, which the sequencer would refuse
    let e = g.from_unix_time(DEFAULT_EPOCH_SECS as i64 + 1).unwrap();
    assert_eq!(e.timestamp(), 1_000);
    assert!(e < first);

    // zero increments are redrawn until 0x10 comes around again
    let second = g.generate().unwrap();
    assert_eq!(second.timestamp(), 5_000);
    assert_eq!(second.randomness(), first.randomness() + 0x10);
}

/// Agrees with generate_at when the epoch is not a whole millisecond
#[test]
fn agrees_with_generate_at_when_the_epoch_is_not_a_whole_millisecond() {
    for offset_micros in [1, 500, 1_500, 999_999] {
        let epoch = UNIX_EPOCH
            + Duration::from_secs(DEFAULT_EPOCH_SECS)
            + Duration::from_micros(offset_micros);
        let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
            FixedRng(0x01),
            MockTime::at(0),
        )
        .with_config(Config::builder().epoch(epoch).build().unwrap());

        let unix_secs = DEFAULT_EPOCH_SECS + 5;
        let from_unix = g.from_unix_time(unix_secs as i64).unwrap();
        let at = g
            .generate_at(UNIX_EPOCH + Duration::from_secs(unix_secs))
            .unwrap();
        assert_eq!(from_unix.timestamp(), at.timestamp());
    }

    // the epoch itself lies after the whole second, so that second is out of range
    let g = Generator::<Standard, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(0),
    )
    .with_config(
        Config::builder()
            .epoch(UNIX_EPOCH + Duration::from_micros(1_500))
            .build()
            .unwrap(),
    );
    assert_eq!(g.from_unix_time(0).unwrap_err().kind(), ErrorKind::Overflow);
    assert_eq!(g.from_unix_time(1).unwrap().timestamp(), 998);
}

/// Embeds the configured SID and follows the configured epoch
#[test]
fn embeds_the_configured_sid_and_follows_the_configured_epoch() {
    let g = Generator::<Scalable, _, _>::with_rand_and_time_sources(
        FixedRng(0x01),
        MockTime::at(0),
    )
    .with_config(
        Config::builder()
            .epoch(UNIX_EPOCH)
            .sid(5)
            .build()
            .unwrap(),
    );

    let e = g.from_unix_time(1).unwrap();
    assert_eq!(e.timestamp(), 1_000);
    assert_eq!(e.sid(), 5);
    assert!(g.from_unix_time(-1).is_err());
}
