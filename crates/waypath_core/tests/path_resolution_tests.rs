mod setup;

use std::time::Duration;

use setup::{Event, Outcome, Reply, ScriptedProvider, create_assembler, create_route, points};
use waypath_core::{detailed_path::PathKind, geopoint::GeoPoint, path_assembler::Resolution};

fn victoria_vancouver() -> waypath_core::route::Route {
    create_route(&[("Victoria", 48.43, -123.37), ("Vancouver", 49.28, -123.12)])
}

#[tokio::test(start_paused = true)]
async fn test_provider_geometry_is_transposed() {
    let provider = ScriptedProvider::new(|_, _| {
        Reply::now(Outcome::Road(vec![
            vec![-123.37, 48.43],
            vec![-123.30, 48.50],
            vec![-123.12, 49.28],
        ]))
    });
    let assembler = create_assembler(provider);
    let route = victoria_vancouver();

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(
        path.points(),
        points(&[(48.43, -123.37), (48.50, -123.30), (49.28, -123.12)]).as_slice()
    );
    assert_eq!(path.kind(), PathKind::RoadFollowing);
    assert_eq!(path.straight_segments(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_network_error_falls_back_to_straight_segment() {
    let assembler = create_assembler(ScriptedProvider::new(|_, _| Reply::now(Outcome::Fail)));
    let route = victoria_vancouver();

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(
        path.points(),
        points(&[(48.43, -123.37), (49.28, -123.12)]).as_slice()
    );
    assert_eq!(path.segments(), 1);
    assert_eq!(path.straight_segments(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_one_failed_leg_only_degrades_that_leg() {
    let provider = ScriptedProvider::new(|start, end| {
        if start.lat == 1.0 {
            Reply::now(Outcome::NoRoute)
        } else {
            Reply::now(Outcome::Road(setup::midpoint_geometry(start, end)))
        }
    });
    let assembler = create_assembler(provider);
    let route = create_route(&[("A", 0.0, 0.0), ("B", 1.0, 1.0), ("C", 2.0, 0.0), ("D", 3.0, 1.0)]);

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(path.segments(), 3);
    assert_eq!(path.straight_segments(), 1);
    assert_eq!(
        path.points(),
        points(&[
            (0.0, 0.0),
            (0.5, 0.5),
            (1.0, 1.0),
            (1.0, 1.0),
            (2.0, 0.0),
            (2.0, 0.0),
            (2.5, 0.5),
            (3.0, 1.0),
        ])
        .as_slice()
    );
}

#[tokio::test]
async fn test_short_routes_issue_no_requests() {
    let assembler = create_assembler(ScriptedProvider::midpoints());

    for route in [create_route(&[]), create_route(&[("Solo", 48.43, -123.37)])] {
        let token = assembler.begin(&route);
        let resolution = assembler.resolve_path(&route, &token).await;

        let path = resolution.into_path().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.kind(), PathKind::Empty);
    }

    assert_eq!(assembler.router().provider().calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_legs_are_requested_sequentially_with_pacing() {
    let provider = ScriptedProvider::new(|start, end| {
        let outcome = if start.lat == 1.0 {
            Outcome::Fail
        } else {
            Outcome::Road(setup::midpoint_geometry(start, end))
        };
        Reply::after(Duration::from_secs(1), outcome)
    });
    let assembler = create_assembler(provider);
    let route = create_route(&[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 2.0, 0.0), ("D", 3.0, 0.0)]);

    let token = assembler.begin(&route);
    assembler.resolve_path(&route, &token).await;

    let events = assembler.router().provider().events();
    assert_eq!(events.len(), 6);

    for (leg, pair) in events.chunks(2).enumerate() {
        match pair {
            [
                Event::Started { from: started, .. },
                Event::Finished { from: finished, .. },
            ] => {
                assert_eq!(started.lat, leg as f64);
                assert_eq!(finished.lat, leg as f64);
            }
            other => panic!("leg {leg} overlapped another request: {other:?}"),
        }
    }

    // Pacing applies after failed legs too
    for window in events.windows(2) {
        if let [Event::Finished { at: finished, .. }, Event::Started { at: started, .. }] = window
        {
            assert!(*started - *finished >= setup::PACING);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_provider_coordinates_are_dropped() {
    let provider = ScriptedProvider::new(|_, _| {
        Reply::now(Outcome::Road(vec![
            vec![-123.37, 48.43],
            vec![20.0, 200.0],
            vec![-200.0, 45.0],
            vec![-123.30],
            vec![-123.12, 49.28],
        ]))
    });
    let assembler = create_assembler(provider);
    let route = victoria_vancouver();

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(
        path.points(),
        points(&[(48.43, -123.37), (49.28, -123.12)]).as_slice()
    );
}

#[tokio::test(start_paused = true)]
async fn test_fully_invalid_geometry_falls_back_to_straight_segment() {
    let provider = ScriptedProvider::new(|_, _| {
        Reply::now(Outcome::Road(vec![vec![20.0, 200.0], vec![f64::NAN, 45.0]]))
    });
    let assembler = create_assembler(provider);
    let route = victoria_vancouver();

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(
        path.points(),
        points(&[(48.43, -123.37), (49.28, -123.12)]).as_slice()
    );
    assert_eq!(path.segments(), 1);
    assert_eq!(path.straight_segments(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_aborted_resolution_draws_waypoints() {
    let provider = ScriptedProvider::new(|start, end| {
        if start.lat == 1.0 {
            Reply::now(Outcome::Panic)
        } else {
            Reply::now(Outcome::Road(setup::midpoint_geometry(start, end)))
        }
    });
    let assembler = create_assembler(provider);
    let route = create_route(&[("A", 0.0, 0.0), ("B", 1.0, 1.0), ("C", 2.0, 2.0)]);

    let token = assembler.begin(&route);
    let path = assembler
        .resolve_path(&route, &token)
        .await
        .into_path()
        .unwrap();

    assert_eq!(path.kind(), PathKind::WaypointFallback);
    assert_eq!(
        path.points(),
        points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).as_slice()
    );
    assert_eq!(assembler.snapshot().path, path);
}

#[tokio::test(start_paused = true)]
async fn test_latest_route_wins() {
    // Route A's leg is slow, route B's is fast
    let provider = ScriptedProvider::new(|start, end| {
        let after = if start.lat < 15.0 {
            Duration::from_secs(5)
        } else {
            Duration::from_millis(100)
        };
        Reply::after(after, Outcome::Road(setup::midpoint_geometry(start, end)))
    });
    let assembler = create_assembler(provider);
    let route_a = create_route(&[("A1", 10.0, 10.0), ("A2", 12.0, 12.0)]);
    let route_b = create_route(&[("B1", 20.0, 20.0), ("B2", 22.0, 22.0)]);

    let handle_a = assembler.spawn(route_a);
    tokio::time::sleep(Duration::from_millis(1)).await;
    let handle_b = assembler.spawn(route_b);

    assert!(handle_a.token().is_cancelled());

    let path_b = handle_b.join().await.into_path().unwrap();
    assert_eq!(handle_a.join().await, Resolution::Superseded);

    // Let anything left over from route A run to completion
    tokio::time::sleep(Duration::from_secs(10)).await;

    let snapshot = assembler.snapshot();
    assert_eq!(snapshot.path, path_b);
    assert!(!snapshot.resolving);
    assert!(
        snapshot
            .path
            .points()
            .iter()
            .all(|point| point.lat >= 20.0)
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_token_never_writes_snapshot() {
    let assembler = create_assembler(ScriptedProvider::midpoints());
    let route_a = create_route(&[("A1", 10.0, 10.0), ("A2", 12.0, 12.0)]);
    let route_b = create_route(&[("B1", 20.0, 20.0), ("B2", 22.0, 22.0)]);

    let token_a = assembler.begin(&route_a);
    let token_b = assembler.begin(&route_b);

    let path_b = assembler
        .resolve_path(&route_b, &token_b)
        .await
        .into_path()
        .unwrap();

    let resolution_a = assembler.resolve_path(&route_a, &token_a).await;

    assert_eq!(resolution_a, Resolution::Superseded);
    assert_eq!(assembler.snapshot().path, path_b);
}

#[tokio::test(start_paused = true)]
async fn test_snapshots_grow_in_route_order() {
    let provider = ScriptedProvider::new(|start, end| {
        Reply::after(
            Duration::from_millis(500),
            Outcome::Road(setup::midpoint_geometry(start, end)),
        )
    });
    let assembler = create_assembler(provider);
    let route = create_route(&[("A", 0.0, 0.0), ("B", 2.0, 2.0), ("C", 4.0, 4.0)]);
    let mut receiver = assembler.subscribe();

    let handle = assembler.spawn(route);
    let generation = handle.token().generation();

    let mut lengths = Vec::new();
    loop {
        receiver.changed().await.unwrap();
        let snapshot = receiver.borrow_and_update().clone();
        if snapshot.generation != generation {
            continue;
        }
        lengths.push(snapshot.path.len());
        if !snapshot.resolving {
            break;
        }
    }

    let path = handle.join().await.into_path().unwrap();

    assert_eq!(lengths.last(), Some(&6));
    assert!(lengths.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(
        &path.points()[..3],
        points(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).as_slice()
    );
    assert_eq!(path.points().first(), Some(&GeoPoint::new(0.0, 0.0)));
}

fn one_second_legs() -> ScriptedProvider {
    ScriptedProvider::new(|start, end| {
        Reply::after(
            Duration::from_secs(1),
            Outcome::Road(setup::midpoint_geometry(start, end)),
        )
    })
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_request_stops_resolving() {
    let assembler = create_assembler(one_second_legs());
    let route = create_route(&[("A", 0.0, 0.0), ("B", 2.0, 2.0), ("C", 4.0, 4.0)]);
    let mut receiver = assembler.subscribe();

    let handle = assembler.spawn(route);
    let generation = handle.token().generation();

    // First leg done, second one in flight
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assembler.cancel();

    assert_eq!(handle.join().await, Resolution::Superseded);

    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            let snapshot = receiver.borrow_and_update().clone();
            if snapshot.generation == generation && !snapshot.resolving {
                return snapshot;
            }
            receiver.changed().await.unwrap();
        }
    })
    .await
    .unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(stopped.path.segments(), 1);
    assert_eq!(stopped.path.len(), 3);
    assert_eq!(assembler.snapshot(), stopped);
    assert_eq!(assembler.router().provider().calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_pacing_stops_resolving() {
    let assembler = create_assembler(one_second_legs());
    let route = create_route(&[("A", 0.0, 0.0), ("B", 2.0, 2.0), ("C", 4.0, 4.0)]);

    let handle = assembler.spawn(route);

    // Between the end of the first leg and the start of the second
    tokio::time::sleep(Duration::from_secs(1) + setup::PACING / 2).await;
    handle.cancel();

    assert_eq!(handle.join().await, Resolution::Superseded);
    tokio::time::sleep(Duration::from_secs(10)).await;

    let snapshot = assembler.snapshot();
    assert!(!snapshot.resolving);
    assert_eq!(snapshot.path.segments(), 1);
    assert_eq!(assembler.router().provider().calls(), 1);
}
