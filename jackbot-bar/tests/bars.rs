use jackbot_bar::{
    bar::{Bar, BarKind, BarSpec, accumulator::BarAccumulator},
    compute::{Computable, ComputableFactory, Computed, Timed, compute_derivative_bars},
    config::ComputeConfig,
    event::MarketEvent,
    test_utils::{book_change, oi_ticker, time_ms},
};

fn accumulator(kind: BarKind, interval: f64) -> BarAccumulator {
    BarAccumulator::new(BarSpec::new(kind, interval).unwrap())
}

fn consume_all(acc: &mut BarAccumulator, events: &[MarketEvent]) -> Vec<Bar> {
    events.iter().flat_map(|event| acc.consume(event)).collect()
}

#[test]
fn tick_bars_close_on_exact_count() {
    let mut acc = accumulator(BarKind::Tick, 3.0);

    let mut emitted = Vec::new();
    for (index, millis) in [1_000, 2_000, 3_000, 4_000, 5_000].into_iter().enumerate() {
        let bars = acc.consume(&oi_ticker(millis, 100.0 + index as f64)).into_vec();
        emitted.push(bars.len());
        if index == 2 {
            assert_eq!(bars[0].ticks, 3);
            assert_eq!(bars[0].time, time_ms(3_000));
            assert_eq!(bars[0].name, "derivative_bar_3ticks");
        }
    }

    assert_eq!(emitted, vec![0, 0, 1, 0, 0]);
    assert_eq!(acc.ticks(), 2);
}

#[test]
fn time_bar_closed_by_book_change_heartbeat() {
    let mut acc = accumulator(BarKind::Time, 60_000.0);

    assert!(acc.consume(&oi_ticker(10_000, 5000.0)).is_none());

    let bars = acc.consume(&book_change(65_000)).into_vec();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].time, time_ms(60_000));
    assert_eq!(bars[0].open_time, time_ms(10_000));
    assert_eq!(bars[0].received_time, time_ms(65_000));
    assert_eq!(bars[0].ticks, 1);

    // Book change never opens the next bucket's bar
    assert_eq!(acc.ticks(), 0);

    // Next ticker opens a bar in bucket 1, closing at 120_000
    assert!(acc.consume(&oi_ticker(70_000, 5100.0)).is_none());
    let bars = acc.consume(&book_change(120_000)).into_vec();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].time, time_ms(120_000));
}

#[test]
fn volume_bar_closes_on_open_interest_increase() {
    let mut acc = accumulator(BarKind::Volume, 1000.0);

    assert!(acc.consume(&oi_ticker(1_000, 5000.0)).is_none());
    assert!(acc.consume(&oi_ticker(2_000, 5400.0)).is_none());

    let bars = acc.consume(&oi_ticker(3_000, 6200.0)).into_vec();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].delta_oi, 1200.0);
    assert_eq!(bars[0].open.open_interest, Some(5000.0));
    assert_eq!(bars[0].close.open_interest, Some(6200.0));
    assert_eq!(bars[0].time, time_ms(3_000));
    assert_eq!(acc.ticks(), 0);
}

#[test]
fn volume_bar_never_closes_on_decreasing_open_interest() {
    let mut acc = accumulator(BarKind::Volume, 10.0);

    let events = (0..100)
        .map(|step| oi_ticker(step * 1_000, 10_000.0 - step as f64 * 50.0))
        .collect::<Vec<_>>();

    assert!(consume_all(&mut acc, &events).is_empty());
    assert_eq!(acc.ticks(), 100);
}

#[test]
fn book_changes_alone_never_emit() {
    for kind in [BarKind::Time, BarKind::Volume, BarKind::Tick] {
        let mut acc = accumulator(kind, 1.0);
        let events = (0..1_000)
            .map(|step| book_change(step * 3_600_000))
            .collect::<Vec<_>>();

        assert!(consume_all(&mut acc, &events).is_empty(), "{kind} emitted");
        assert_eq!(acc.ticks(), 0);
    }
}

#[test]
fn time_bar_gap_closes_exactly_one_bar_with_historical_stamp() {
    let mut acc = accumulator(BarKind::Time, 1_000.0);

    let events = vec![
        oi_ticker(500, 1.0),
        // Jumps over buckets 1..=9 with no events in between
        book_change(10_250),
        book_change(10_500),
        oi_ticker(10_750, 2.0),
        oi_ticker(12_100, 3.0),
    ];

    let bars = consume_all(&mut acc, &events);

    // Empty buckets are not fabricated, and late emissions keep the correct boundary
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].time, time_ms(1_000));
    assert_eq!(bars[0].received_time, time_ms(10_250));
    assert_eq!(bars[1].time, time_ms(11_000));
    assert_eq!(bars[1].received_time, time_ms(12_100));
    assert_eq!(acc.ticks(), 1);
}

#[test]
fn time_bar_boundaries_reproduce_bucket_indices() {
    let spec = BarSpec::new(BarKind::Time, 250.0).unwrap();
    let mut acc = BarAccumulator::new(spec.clone());

    let events = (0..200)
        .map(|step| {
            let millis = step * 37;
            if step % 3 == 0 {
                book_change(millis)
            } else {
                oi_ticker(millis, step as f64)
            }
        })
        .collect::<Vec<_>>();

    let bars = consume_all(&mut acc, &events);
    assert!(!bars.is_empty());

    let mut previous_bucket = None;
    for bar in &bars {
        let open_bucket = spec.time_bucket(bar.open_time);
        let close_bucket = spec.time_bucket(bar.time);

        assert_eq!(bar.time.timestamp_millis() % 250, 0);
        assert_eq!(close_bucket, open_bucket + 1);
        assert_eq!(spec.time_bucket_close(open_bucket), bar.time);
        assert_eq!(spec.time_bucket(bar.close_time), open_bucket);

        if let Some(previous) = previous_bucket {
            assert!(open_bucket > previous, "buckets emitted out of order");
        }
        previous_bucket = Some(open_bucket);
    }
}

#[test]
fn bars_emitted_in_non_decreasing_time_order() {
    for (kind, interval) in [
        (BarKind::Time, 100.0),
        (BarKind::Volume, 3.0),
        (BarKind::Tick, 4.0),
    ] {
        let mut acc = accumulator(kind, interval);
        let events = (0..500)
            .map(|step| oi_ticker(step * 13, (step % 17) as f64))
            .collect::<Vec<_>>();

        let bars = consume_all(&mut acc, &events);
        assert!(!bars.is_empty(), "{kind} emitted no bars");
        assert!(
            bars.windows(2).all(|pair| pair[0].time <= pair[1].time),
            "{kind} bars out of order"
        );

        for bar in &bars {
            assert!(bar.ticks > 0);
            match kind {
                BarKind::Volume => assert!(bar.delta_oi >= interval),
                BarKind::Tick => assert_eq!(bar.ticks, interval as u64),
                BarKind::Time => {}
            }
        }
    }
}

#[test]
fn factory_sessions_are_isolated() {
    let factory = compute_derivative_bars(
        serde_json::from_str(r#"{"kind": "tick", "interval": 2}"#).unwrap(),
    )
    .unwrap();

    let events = [oi_ticker(1, 1.0), oi_ticker(2, 2.0), oi_ticker(3, 3.0)];

    let mut first = factory.init();
    let mut second = factory.init();

    let first_bars = events
        .iter()
        .flat_map(|event| first.compute(event))
        .collect::<Vec<_>>();
    let second_bars = events[..1]
        .iter()
        .flat_map(|event| second.compute(event))
        .collect::<Vec<_>>();

    assert_eq!(first_bars.len(), 1);
    assert!(second_bars.is_empty());
    assert_eq!(second.ticks(), 1);
}

#[test]
fn bar_serialises_with_data_type_discriminator() {
    let mut acc = accumulator(BarKind::Tick, 1.0);
    let bar = acc.consume(&oi_ticker(1_000, 42.0)).into_vec().remove(0);

    let json = serde_json::to_value(&bar).unwrap();

    assert_eq!(json["type"], "derivative_bar");
    assert_eq!(json["name"], "derivative_bar_1ticks");
    assert_eq!(json["kind"], "tick");
    assert_eq!(json["exchange"], "mock");
    assert_eq!(json["symbol"], "BTCUSD");
    assert_eq!(json["ticks"], 1);
}

#[test]
fn router_computes_configured_bars_in_event_order() {
    let config = ComputeConfig::from_json_str(
        r#"{"bars": [
            {"kind": "time", "interval": 1000},
            {"kind": "tick", "interval": 2}
        ]}"#,
    )
    .unwrap();

    let outputs = config
        .router()
        .unwrap()
        .compute([
            oi_ticker(100, 1.0),
            oi_ticker(200, 2.0),
            book_change(1_100),
            oi_ticker(1_200, 3.0),
        ])
        .collect::<Vec<_>>();

    let data_types = outputs
        .iter()
        .map(Computed::data_type)
        .collect::<Vec<_>>();

    assert_eq!(
        data_types,
        vec![
            "derivative_ticker",
            "derivative_bar",
            "derivative_ticker",
            "derivative_bar",
            "book_change",
            "derivative_ticker",
        ]
    );

    let names = outputs
        .iter()
        .filter_map(Computed::output)
        .map(|bar| bar.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["derivative_bar_2ticks", "derivative_bar_1000ms"]);
}

#[test]
fn router_output_stays_time_ordered_across_mixed_configurations() {
    let config = ComputeConfig::from_json_str(
        r#"{"bars": [
            {"kind": "tick", "interval": 3},
            {"kind": "volume", "interval": 5},
            {"kind": "time", "interval": 250}
        ]}"#,
    )
    .unwrap();

    let events = (0..300).map(|step| {
        if step % 4 == 0 {
            book_change(step * 41)
        } else {
            oi_ticker(step * 41, (step % 13) as f64)
        }
    });

    let outputs = config.router().unwrap().compute(events).collect::<Vec<_>>();

    assert!(outputs.iter().filter_map(Computed::output).count() > 0);
    assert!(
        outputs.windows(2).all(|pair| pair[0].time() <= pair[1].time()),
        "router output out of time order"
    );
}
