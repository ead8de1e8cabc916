use chrono::{NaiveDate, NaiveDateTime};
use trace_csv::packet::{InterleavedPacket, LogicPacket, MetaEntry, Packet};
use trace_csv::{ChannelConfig, Device, Error, ExportSession, OutputOptions, Result, TraceKind};

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap()
}

fn session(device: &Device, kind: TraceKind) -> ExportSession {
    let options = OutputOptions::new(kind).with_generated_at(fixed_time());
    ExportSession::new(device, &options).unwrap()
}

fn logic_session(channels: u16) -> ExportSession {
    let channels = (0..channels)
        .map(|i| ChannelConfig::logic(i, format!("D{i}")))
        .collect();
    session(&Device::new("la", channels), TraceKind::Logic)
}

/// Rows of a chunk, header lines removed.
fn rows(chunk: &str) -> Vec<&str> {
    chunk
        .lines()
        .filter(|l| !l.starts_with("; ") && !l.starts_with("Time(s)") && !l.starts_with(' '))
        .collect()
}

fn logic(data: Vec<u8>, suppress: bool) -> Packet {
    Packet::Logic(LogicPacket::new(data, 1, suppress))
}

#[test]
fn scenario_a_suppressed_duplicate() -> Result<()> {
    let mut s = logic_session(1);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000_000)]))?;
    let chunk = s.receive(&logic(vec![0x01, 0x01], true))?.unwrap();
    assert_eq!(rows(&chunk), ["0,1"]);
    Ok(())
}

#[test]
fn scenario_b_unsuppressed_duplicate() -> Result<()> {
    let mut s = logic_session(1);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000_000)]))?;
    let chunk = s.receive(&logic(vec![0x01, 0x01], false))?.unwrap();
    assert_eq!(rows(&chunk), ["0,1", "1e-06,1"]);
    Ok(())
}

#[test]
fn scenario_c_scope_amplitude() -> Result<()> {
    // 500 mV/div over 10 divisions: 5 V full scale
    let device = Device::new("dso", vec![ChannelConfig::scope(0, "CH0", 500.0, 128)]);
    let mut s = session(&device, TraceKind::Scope);
    assert_eq!(s.table().descriptors()[0].scale_factor, 5.0);

    s.receive(&Packet::Meta(vec![
        MetaEntry::reference_min(0),
        MetaEntry::reference_max(255),
    ]))?;
    let chunk = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![108], 1)))?
        .unwrap();
    assert_eq!(chunk.lines().last(), Some("0.39216"));
    Ok(())
}

#[test]
fn scenario_d_analog_with_disabled_slot() -> Result<()> {
    let device = Device::new(
        "daq",
        vec![
            ChannelConfig::analog(0, "A0", 0.0, 3.3, "V"),
            ChannelConfig::analog(1, "A1", 0.0, 3.3, "V").with_enabled(false),
        ],
    );
    let mut s = session(&device, TraceKind::Analog);
    s.receive(&Packet::Meta(vec![
        MetaEntry::reference_min(0),
        MetaEntry::reference_max(255),
    ]))?;
    let chunk = s
        .receive(&Packet::Analog(InterleavedPacket::new(vec![51, 200], 1)))?
        .unwrap();
    assert_eq!(chunk.lines().last(), Some("-0.66000"));
    Ok(())
}

#[test]
fn scenario_e_rate_change_is_not_retroactive() -> Result<()> {
    let mut s = logic_session(1);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(10)]))?;
    let first = s.receive(&logic(vec![0; 10], false))?.unwrap();
    let first_rows = rows(&first);
    assert_eq!(first_rows.len(), 10);
    assert_eq!(first_rows[9], "0.9,0");

    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(100)]))?;
    let second = s.receive(&logic(vec![1], false))?.unwrap();
    // Sample 11 at the new rate: 10 / 100 s
    assert_eq!(second, "0.1,1\n");
    Ok(())
}

#[test]
fn unsuppressed_rows_match_sample_count() -> Result<()> {
    let mut s = logic_session(4);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000)]))?;
    let data: Vec<u8> = (0..57).map(|i| (i % 3) as u8).collect();
    let chunk = s.receive(&logic(data, false))?.unwrap();
    assert_eq!(rows(&chunk).len(), 57);
    Ok(())
}

#[test]
fn suppression_compares_with_previous_sample_across_packets() -> Result<()> {
    let mut s = logic_session(2);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1)]))?;

    let first = s.receive(&logic(vec![0b10, 0b10, 0b11], true))?.unwrap();
    assert_eq!(rows(&first), ["0,0,1", "2,1,1"]);

    // First sample of the second packet equals the last one of the first.
    let second = s.receive(&logic(vec![0b11, 0b00], true))?.unwrap();
    assert_eq!(second, "4,0,0\n");

    // A packet whose samples are all unchanged produces no chunk.
    assert_eq!(s.receive(&logic(vec![0b00, 0b00], true))?, None);
    assert_eq!(s.sample_index(), 7);
    Ok(())
}

#[test]
fn running_index_ignores_suppression() -> Result<()> {
    let mut s = logic_session(1);
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(1_000)]))?;
    for (len, suppress) in [(5, true), (3, false), (12, true), (1, false)] {
        s.receive(&logic(vec![1; len], suppress))?;
    }
    assert_eq!(s.sample_index(), 21);
    Ok(())
}

#[test]
fn header_only_on_first_data_packet() -> Result<()> {
    let mut s = logic_session(1);
    for _ in 0..3 {
        assert_eq!(
            s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(8)]))?,
            None
        );
    }
    assert!(!s.header_emitted());

    let first = s.receive(&logic(vec![1], false))?.unwrap();
    assert!(first.starts_with("; CSV, generated by "));
    assert!(first.contains("; Sample rate: 8 Hz\n"));
    assert!(s.header_emitted());

    let second = s.receive(&logic(vec![0], false))?.unwrap();
    assert!(!second.contains("; "));
    assert_eq!(second, "0.125,0\n");
    Ok(())
}

#[test]
fn header_reports_meta_received_before_data() -> Result<()> {
    let mut s = logic_session(3);
    s.receive(&Packet::Meta(vec![
        MetaEntry::sample_rate(100_000_000),
        MetaEntry::limit_samples(16 * 1024 * 1024),
    ]))?;
    let chunk = s.receive(&logic(vec![0], false))?.unwrap();
    let lines: Vec<_> = chunk.lines().collect();
    assert_eq!(
        lines[0],
        format!(
            "; CSV, generated by {} on Thu Jan  2 03:04:05 2025",
            trace_csv::header::GENERATOR
        )
    );
    assert_eq!(lines[1], "; Channels (3/3)");
    assert_eq!(lines[2], "; Sample rate: 100 MHz");
    assert_eq!(lines[3], "; Sample count: 16 M");
    assert_eq!(lines[4], "Time(s), D0, D1, D2");
    assert_eq!(lines[5], "0,0,0,0");
    Ok(())
}

#[test]
fn equal_references_report_configuration_error() -> Result<()> {
    let device = Device::new("dso", vec![ChannelConfig::scope(0, "CH0", 500.0, 128)]);
    let mut s = session(&device, TraceKind::Scope);
    s.receive(&Packet::Meta(vec![
        MetaEntry::reference_min(200),
        MetaEntry::reference_max(200),
    ]))?;

    let err = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![1, 2, 3], 3)))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidReferenceRange {
            low: 200,
            high: 200
        }
    ));
    // The failed packet did not consume the header.
    assert!(!s.header_emitted());

    s.receive(&Packet::Meta(vec![MetaEntry::reference_max(255)]))?;
    let chunk = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![183], 1)))?
        .unwrap();
    // (128 - 183) * 5 / (255 - 200)
    assert!(chunk.starts_with("; CSV"));
    assert!(chunk.ends_with("\n-5.00000\n"));
    Ok(())
}

#[test]
fn analog_equal_references_report_configuration_error() {
    let device = Device::new("daq", vec![ChannelConfig::analog(0, "A0", 0.0, 1.0, "V")]);
    let mut s = session(&device, TraceKind::Analog);
    let err = s
        .receive(&Packet::Analog(InterleavedPacket::new(vec![9], 1)))
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn custom_separator_applies_to_header_and_rows() -> Result<()> {
    let device = Device::new(
        "la",
        vec![ChannelConfig::logic(0, "A"), ChannelConfig::logic(1, "B")],
    );
    let options = OutputOptions::new(TraceKind::Logic)
        .with_separator('\t')
        .with_generated_at(fixed_time());
    let mut s = ExportSession::new(&device, &options)?;
    s.receive(&Packet::Meta(vec![MetaEntry::sample_rate(2)]))?;
    let chunk = s.receive(&logic(vec![0b10, 0b01], false))?.unwrap();
    assert!(chunk.ends_with("Time(s)\t A\t B\n0\t0\t1\n0.5\t1\t0\n"));
    Ok(())
}

#[test]
fn meta_channel_offset_refreshes_zero() -> Result<()> {
    let device = Device::new(
        "dso",
        vec![
            ChannelConfig::scope(0, "CH0", 500.0, 128),
            ChannelConfig::scope(1, "CH1", 500.0, 128),
        ],
    );
    let mut s = session(&device, TraceKind::Scope);
    s.receive(&Packet::Meta(vec![
        MetaEntry::reference_min(0),
        MetaEntry::reference_max(255),
    ]))?;
    let before = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![128, 128], 1)))?
        .unwrap();
    assert!(before.ends_with("\n0.00000,0.00000\n"));

    s.receive(&Packet::Meta(vec![MetaEntry::channel_offset(1, 179)]))?;
    let after = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![128, 128], 1)))?
        .unwrap();
    assert_eq!(after, "0.00000,1.00000\n");
    Ok(())
}

#[test]
fn foreign_data_packet_emits_header_only() -> Result<()> {
    let mut s = logic_session(1);
    let chunk = s
        .receive(&Packet::Scope(InterleavedPacket::new(vec![1], 1)))?
        .unwrap();
    assert!(chunk.ends_with("Time(s), D0\n"));
    assert!(s.header_emitted());
    assert_eq!(s.sample_index(), 0);

    assert_eq!(
        s.receive(&Packet::Analog(InterleavedPacket::new(vec![1], 1)))?,
        None
    );
    Ok(())
}

#[test]
fn logic_without_samplerate_fails() {
    let mut s = logic_session(1);
    let err = s.receive(&logic(vec![1], false)).unwrap_err();
    assert!(err.is_configuration());
    assert!(!s.header_emitted());
    assert_eq!(s.sample_index(), 0);
}

#[test]
fn sessions_are_independent() -> Result<()> {
    let mut a = logic_session(1);
    let mut b = logic_session(1);
    let stream = [
        Packet::Meta(vec![MetaEntry::sample_rate(4)]),
        logic(vec![1, 1, 0], true),
    ];
    let mut out_a = String::new();
    for p in &stream {
        if let Some(c) = a.receive(p)? {
            out_a.push_str(&c);
        }
    }
    let mut out_b = String::new();
    for p in &stream {
        if let Some(c) = b.receive(p)? {
            out_b.push_str(&c);
        }
    }
    assert_eq!(out_a, out_b);
    assert_eq!(rows(&out_a), ["0,1", "0.5,0"]);
    Ok(())
}
