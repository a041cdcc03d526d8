//! End-to-end composition tests.
//!
//! Each test exercises the full pipeline: tree build -> sample -> per-space
//! solve -> splice, against the in-memory store and cache.

use std::time::Duration;

use async_trait::async_trait;
use patrol_rs::{
    Asset, Checkpoint, ComposeOptions, Error, Fingerprint, MemoryCache, MemoryStore, Planner,
    Route, RouteCache, Space, SpaceStore,
};
use pretty_assertions::assert_eq;

fn names(route: &Route) -> Vec<&str> {
    route.sequence.iter().map(|cp| cp.name.as_str()).collect()
}

async fn wait_for_cache_len(cache: &MemoryCache, expected: usize) {
    for _ in 0..200 {
        if cache.len() >= expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("cache never reached {expected} entries");
}

// ============================================================================
// 1. Demo site: the full two-level route, checked stop by stop
// ============================================================================

#[tokio::test]
async fn test_demo_site_full_route() {
    let planner = Planner::open_demo();
    let initial = Asset::new("init", "base", 0.0, 0.0);

    let route = planner.compose_route(initial, 1.0).await.unwrap();

    assert_eq!(
        names(&route),
        vec!["init", "A", "Meeting Room", "D", "Meeting Room", "B", "C"]
    );
    let expected = 2.0 + 4.0 * 2.0_f64.sqrt();
    assert!((route.distance - expected).abs() < 1e-9);

    // D is translated out of the meeting room frame.
    let d = &route.sequence[3];
    assert_eq!((d.rx, d.ry), (2.0, 3.0));

    // Doorway markers enter and leave at the same position.
    for marker in [&route.sequence[2], &route.sequence[4]] {
        assert!(marker.is_portal);
        assert_eq!(marker.weight, 0.0);
        assert_eq!((marker.rx, marker.ry), (2.0, 2.0));
    }
    assert!(!route.sequence[0].is_portal);
    assert_eq!((route.sequence[0].rx, route.sequence[0].ry), (0.0, 0.0));
}

// ============================================================================
// 2. Three-level nesting: offsets accumulate through every ancestor
// ============================================================================

#[tokio::test]
async fn test_three_level_nesting_accumulates_offsets() {
    let planner = Planner::open_memory();
    planner
        .store()
        .insert_spaces(vec![
            Space::new("site", "", 0.0, 0.0),
            Space::new("wing", "site", 2.0, 2.0),
            Space::new("cell", "wing", 1.0, 1.0),
        ])
        .await
        .unwrap();
    planner
        .store()
        .insert_assets(vec![Asset::new("deep", "cell", 0.5, 0.0)])
        .await
        .unwrap();

    let initial = Asset::new("init", "site", 0.0, 0.0);
    let route = planner.compose_route(initial, 1.0).await.unwrap();

    assert_eq!(
        names(&route),
        vec!["init", "wing", "cell", "deep", "cell", "wing"]
    );

    // wing sits at (2,2) in the site frame; cell at (1,1) inside wing;
    // deep at (0.5,0) inside cell. All of it must land in the site frame.
    let wing = &route.sequence[1];
    assert_eq!((wing.rx, wing.ry), (2.0, 2.0));
    let cell = &route.sequence[2];
    assert_eq!((cell.rx, cell.ry), (3.0, 3.0));
    let deep = &route.sequence[3];
    assert_eq!((deep.rx, deep.ry), (3.5, 3.0));
    assert_eq!((route.sequence[4].rx, route.sequence[4].ry), (3.0, 3.0));

    // site walk 2√2, wing circuit 2√2, cell circuit 1.
    let expected = 4.0 * 2.0_f64.sqrt() + 1.0;
    assert!((route.distance - expected).abs() < 1e-9);
}

// ============================================================================
// 3. Idempotence: a warm-cache rerun reproduces the route bit for bit
// ============================================================================

#[tokio::test]
async fn test_warm_cache_rerun_is_identical() {
    let planner = Planner::open_demo();
    let initial = Asset::new("init", "base", 0.0, 0.0);

    let cold = planner.compose_route(initial.clone(), 1.0).await.unwrap();
    // Two active spaces, so two detached cache writes to wait out.
    wait_for_cache_len(planner.cache(), 2).await;

    let warm = planner.compose_route(initial, 1.0).await.unwrap();
    assert_eq!(cold, warm);
    assert_eq!(planner.cache().len(), 2);
}

// ============================================================================
// 4. Sampling edges: too-low rates, invalid rates, invalid start
// ============================================================================

#[tokio::test]
async fn test_low_rate_surfaces_empty_sample() {
    let planner = Planner::open_demo();
    // 0.05 × (4 + 0.5) = 0.225 → zero assets drawn.
    let err = planner
        .compose_route(Asset::new("init", "base", 0.0, 0.0), 0.05)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptySample));
}

#[tokio::test]
async fn test_invalid_parameters_rejected() {
    let planner = Planner::open_demo();
    for rate in [0.0, -0.5, 1.5, f64::NAN] {
        let err = planner
            .compose_route(Asset::new("init", "base", 0.0, 0.0), rate)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)), "rate {rate}");
    }

    let err = planner
        .compose_route(Asset::new("init", "base", f64::INFINITY, 0.0), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[tokio::test]
async fn test_missing_root_space() {
    let planner = Planner::open_memory();
    let err = planner
        .compose_route(Asset::new("init", "nowhere", 0.0, 0.0), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

// ============================================================================
// 5. Inactive subtrees contribute nothing
// ============================================================================

#[tokio::test]
async fn test_empty_subtree_is_not_entered() {
    let planner = Planner::open_memory();
    planner
        .store()
        .insert_spaces(vec![
            Space::new("site", "", 0.0, 0.0),
            Space::new("wing", "site", 2.0, 2.0),
        ])
        .await
        .unwrap();
    planner
        .store()
        .insert_assets(vec![Asset::new("a", "site", 1.0, 1.0)])
        .await
        .unwrap();

    let route = planner
        .compose_route(Asset::new("init", "site", 0.0, 0.0), 1.0)
        .await
        .unwrap();

    assert_eq!(names(&route), vec!["init", "a"]);
    assert!(route.sequence.iter().all(|cp| !cp.is_portal));
    assert!((route.distance - 2.0_f64.sqrt()).abs() < 1e-9);
}

// ============================================================================
// 6. Seeded partial-rate runs are reproducible
// ============================================================================

#[tokio::test]
async fn test_seeded_partial_rate_is_deterministic() {
    let options = ComposeOptions {
        seed: Some(42),
        ..ComposeOptions::default()
    };
    let initial = Asset::new("init", "base", 0.0, 0.0);

    let first = Planner::open_demo()
        .with_options(options.clone())
        .compose_route(initial.clone(), 0.5)
        .await
        .unwrap();
    let second = Planner::open_demo()
        .with_options(options)
        .compose_route(initial, 0.5)
        .await
        .unwrap();

    assert_eq!(first, second);
    // 0.5 × (4 + 0.5) = 2 sampled assets, plus the start point.
    let stops = first.sequence.iter().filter(|cp| !cp.is_portal).count();
    assert_eq!(stops, 3);
}

// ============================================================================
// 7. Oversized spaces fail fast instead of allocating
// ============================================================================

#[tokio::test]
async fn test_oversized_space_fails_fast() {
    let planner = Planner::open_memory();
    planner
        .store()
        .insert_spaces(vec![Space::new("site", "", 0.0, 0.0)])
        .await
        .unwrap();
    let crowd: Vec<Asset> = (0..25)
        .map(|i| Asset::new(format!("a{i}"), "site", i as f64, 0.0))
        .collect();
    planner.store().insert_assets(crowd).await.unwrap();

    let err = planner
        .compose_route(Asset::new("init", "site", 0.0, 0.0), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SolverLimit { len: 26, max: 25 }));
}

// ============================================================================
// 8. Collaborator failures: store aborts, cache never does
// ============================================================================

/// Store whose asset listing always fails, after the tree root resolves.
struct BrokenListingStore {
    inner: MemoryStore,
}

#[async_trait]
impl SpaceStore for BrokenListingStore {
    async fn get_space(&self, name: &str) -> patrol_rs::Result<Space> {
        self.inner.get_space(name).await
    }
    async fn list_child_spaces(&self, parent: &str) -> patrol_rs::Result<Vec<Space>> {
        self.inner.list_child_spaces(parent).await
    }
    async fn get_asset(&self, name: &str, base: &str) -> patrol_rs::Result<Asset> {
        self.inner.get_asset(name, base).await
    }
    async fn list_assets(&self, _base: &str) -> patrol_rs::Result<Vec<Asset>> {
        Err(Error::Storage("layout service unavailable".to_string()))
    }
    async fn insert_spaces(&self, spaces: Vec<Space>) -> patrol_rs::Result<()> {
        self.inner.insert_spaces(spaces).await
    }
    async fn insert_assets(&self, assets: Vec<Asset>) -> patrol_rs::Result<()> {
        self.inner.insert_assets(assets).await
    }
    async fn update_asset(&self, asset: Asset) -> patrol_rs::Result<()> {
        self.inner.update_asset(asset).await
    }
    async fn delete_asset(&self, name: &str, base: &str) -> patrol_rs::Result<()> {
        self.inner.delete_asset(name, base).await
    }
    async fn delete_space(&self, name: &str) -> patrol_rs::Result<()> {
        self.inner.delete_space(name).await
    }
}

#[tokio::test]
async fn test_store_failure_aborts_composition() {
    let inner = MemoryStore::with_demo_data();
    let planner = Planner::new(BrokenListingStore { inner }, MemoryCache::new());

    let err = planner
        .compose_route(Asset::new("init", "base", 0.0, 0.0), 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
}

/// Cache that fails every operation.
struct BrokenCache;

#[async_trait]
impl RouteCache for BrokenCache {
    async fn get(&self, _fingerprint: &Fingerprint) -> patrol_rs::Result<Option<Route>> {
        Err(Error::Storage("cache unreachable".to_string()))
    }
    async fn set_with_expiry(
        &self,
        _fingerprint: Fingerprint,
        _route: Route,
        _ttl: Duration,
    ) -> patrol_rs::Result<()> {
        Err(Error::Storage("cache unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_cache_failure_never_blocks_composition() {
    let planner = Planner::new(MemoryStore::with_demo_data(), BrokenCache);

    let route = planner
        .compose_route(Asset::new("init", "base", 0.0, 0.0), 1.0)
        .await
        .unwrap();
    assert_eq!(
        names(&route),
        vec!["init", "A", "Meeting Room", "D", "Meeting Room", "B", "C"]
    );
}

// ============================================================================
// 9. Minimal site: one asset
// ============================================================================

#[tokio::test]
async fn test_single_asset_site() {
    let planner = Planner::open_memory();
    planner
        .store()
        .insert_spaces(vec![Space::new("site", "", 0.0, 0.0)])
        .await
        .unwrap();
    planner
        .store()
        .insert_assets(vec![Asset::new("only", "site", 3.0, 4.0)])
        .await
        .unwrap();

    let route = planner
        .compose_route(Asset::new("init", "site", 0.0, 0.0), 1.0)
        .await
        .unwrap();
    assert_eq!(names(&route), vec!["init", "only"]);
    assert_eq!(route.distance, 5.0);
}

// ============================================================================
// 10. Concurrency cap of one still completes
// ============================================================================

#[tokio::test]
async fn test_serial_concurrency_cap() {
    let options = ComposeOptions {
        max_concurrent: 1,
        ..ComposeOptions::default()
    };
    let planner = Planner::open_demo().with_options(options);

    let route = planner
        .compose_route(Asset::new("init", "base", 0.0, 0.0), 1.0)
        .await
        .unwrap();
    let expected = 2.0 + 4.0 * 2.0_f64.sqrt();
    assert!((route.distance - expected).abs() < 1e-9);
}

// ============================================================================
// 11. Checkpoints keep their owning space through the splice
// ============================================================================

#[tokio::test]
async fn test_sequence_checkpoints_carry_bases() {
    let planner = Planner::open_demo();
    let route = planner
        .compose_route(Asset::new("init", "base", 0.0, 0.0), 1.0)
        .await
        .unwrap();

    let d: &Checkpoint = &route.sequence[3];
    assert_eq!(d.base, "Meeting Room");
    let a = &route.sequence[1];
    assert_eq!(a.base, "base");
}
