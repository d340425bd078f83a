//! End-to-end routing tests through the public `ResourceSystem` API.
//!
//! Each test mounts real providers over scratch directories and drives
//! them only through path strings, the way callers do.

use std::sync::Arc;

use resmount_core::{
    FilesystemProvider, Provider, Query, ResourceError, ResourceSystem, TempProvider, UrlProvider,
};
use tempfile::TempDir;

// ============================================================================
// Shared test setup
// ============================================================================

/// A system with a filesystem mount at `/alias` and a delegating mount at
/// `/a` pointing into it.
async fn setup_alias() -> (ResourceSystem, TempDir) {
    let dir = TempDir::new().unwrap();
    let system = ResourceSystem::new();
    system
        .mount("/alias", FilesystemProvider::new(dir.path()))
        .await
        .unwrap();
    system
        .mount("/a", UrlProvider::parse("/alias").unwrap())
        .await
        .unwrap();
    (system, dir)
}

async fn read_resource(system: &ResourceSystem, path: &str) -> Vec<u8> {
    let resource = system
        .get(path, &Query::new())
        .await
        .unwrap()
        .expect("resource should be mounted");
    tokio::fs::read(resource.path_string()).await.unwrap()
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn longest_prefix_is_selected() {
    let outer = TempDir::new().unwrap();
    let inner = TempDir::new().unwrap();
    let system = ResourceSystem::new();
    system.mount("/mnt", FilesystemProvider::new(outer.path())).await.unwrap();
    system
        .mount("/mnt/project", FilesystemProvider::new(inner.path()))
        .await
        .unwrap();
    let q = Query::new();

    system.set("/mnt/project/f.txt", "inner", &q).await.unwrap();
    system.set("/mnt/f.txt", "outer", &q).await.unwrap();

    assert_eq!(std::fs::read_to_string(inner.path().join("f.txt")).unwrap(), "inner");
    assert_eq!(std::fs::read_to_string(outer.path().join("f.txt")).unwrap(), "outer");
    assert!(!outer.path().join("project").exists());

    assert!(system.exists("/mnt/project/f.txt", &q).await.unwrap());
    system.remove("/mnt/project/f.txt", &q).await.unwrap();
    assert!(outer.path().join("f.txt").exists());
    assert!(!inner.path().join("f.txt").exists());
}

#[tokio::test]
async fn set_then_get_round_trips_content() {
    let dir = TempDir::new().unwrap();
    let system = ResourceSystem::new();
    system.mount("/data", FilesystemProvider::new(dir.path())).await.unwrap();
    let q = Query::new();

    system.set("/data/notes.txt", "hello, resources", &q).await.unwrap();
    assert_eq!(read_resource(&system, "/data/notes.txt").await, b"hello, resources");

    let bytes: Vec<u8> = (0u8..=255).collect();
    system.set("/data/blob.bin", bytes.clone(), &q).await.unwrap();
    assert_eq!(read_resource(&system, "/data/blob.bin").await, bytes);
}

#[tokio::test]
async fn traversal_outside_root_is_invalid_path() {
    let dir = TempDir::new().unwrap();
    let sandbox = dir.path().join("sandbox");
    std::fs::create_dir(&sandbox).unwrap();
    let system = ResourceSystem::new();
    system.mount("/", FilesystemProvider::new(&sandbox)).await.unwrap();
    let q = Query::new();

    let result = system.get("../../etc/passwd", &q).await;
    assert!(matches!(result, Err(ResourceError::InvalidPath(_))));

    let result = system.set("/x/../../escape.txt", "x", &q).await;
    assert!(matches!(result, Err(ResourceError::InvalidPath(_))));
    assert!(!dir.path().join("escape.txt").exists());
}

#[tokio::test]
async fn exists_on_unmounted_path_is_false() {
    let system = ResourceSystem::new();
    system
        .mount("/data", FilesystemProvider::new(std::env::temp_dir()))
        .await
        .unwrap();

    assert!(!system.exists("/nowhere/file.txt", &Query::new()).await.unwrap());
    assert!(!system.exists("/datafile", &Query::new()).await.unwrap());
}

#[tokio::test]
async fn missing_file_removal_surfaces_io_not_found() {
    let dir = TempDir::new().unwrap();
    let system = ResourceSystem::new();
    system.mount("/data", FilesystemProvider::new(dir.path())).await.unwrap();

    let err = system.remove("/data/absent", &Query::new()).await.unwrap_err();
    assert!(matches!(&err, ResourceError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
}

// ============================================================================
// Temp provider lifecycle
// ============================================================================

#[tokio::test]
async fn temp_provider_invalid_after_close() {
    let system = ResourceSystem::new();
    let temp = Arc::new(TempProvider::new().unwrap());
    system.mount_arc("/tmp", temp.clone()).await.unwrap();
    let q = Query::new();

    let resource = system.get("/tmp/work.bin", &q).await.unwrap().unwrap();
    tokio::fs::write(resource.local_path().unwrap(), b"scratch").await.unwrap();
    assert!(system.exists("/tmp/work.bin", &q).await.unwrap());

    temp.close().await.unwrap();
    temp.close().await.unwrap();

    assert!(matches!(
        system.get("/tmp/work.bin", &q).await,
        Err(ResourceError::InvalidState(_))
    ));
    assert!(matches!(
        system.exists("/tmp/work.bin", &q).await,
        Err(ResourceError::InvalidState(_))
    ));
    assert!(matches!(
        system.remove("/tmp/work.bin", &q).await,
        Err(ResourceError::InvalidState(_))
    ));
    assert!(!resource.local_path().unwrap().exists());
}

#[tokio::test]
async fn temp_provider_set_is_unsupported() {
    let system = ResourceSystem::new();
    system.mount("/tmp", TempProvider::new().unwrap()).await.unwrap();
    let q = Query::new();

    assert!(matches!(
        system.set("/tmp/a.txt", "text", &q).await,
        Err(ResourceError::Unsupported(_))
    ));
    assert!(matches!(
        system.set("/tmp/a.bin", vec![1u8, 2, 3], &q).await,
        Err(ResourceError::Unsupported(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn temp_close_is_serialized_against_operations() {
    let system = Arc::new(ResourceSystem::new());
    let temp = Arc::new(TempProvider::new().unwrap());
    system.mount_arc("/tmp", temp.clone()).await.unwrap();
    let store = temp.store_path().await.unwrap();

    // Every task works on a file that really is in the store, so an
    // operation overlapping the directory's deletion would show up as an
    // I/O error or a wrong answer.
    for i in 0..32 {
        std::fs::write(store.join(format!("f{i}")), b"live").unwrap();
    }

    let mut handles = Vec::new();
    for i in 0..32 {
        let system = Arc::clone(&system);
        handles.push(tokio::spawn(async move {
            let q = Query::new();
            let path = format!("/tmp/f{i}");
            let exists = system.exists(&path, &q).await;
            let removed = system.remove(&path, &q).await;
            (exists, removed)
        }));
    }
    temp.close().await.unwrap();

    for handle in handles {
        match handle.await.unwrap() {
            (Ok(true), Ok(())) => {}
            (Ok(true), Err(ResourceError::InvalidState(_))) => {}
            (Err(ResourceError::InvalidState(_)), Err(ResourceError::InvalidState(_))) => {}
            other => panic!("operation overlapped close: {other:?}"),
        }
    }
    assert!(!store.exists());
}

// ============================================================================
// Delegation
// ============================================================================

#[tokio::test]
async fn alias_returns_same_content_as_target() {
    let (system, dir) = setup_alias().await;
    std::fs::write(dir.path().join("x.txt"), "shared").unwrap();

    assert_eq!(
        read_resource(&system, "/a/x.txt").await,
        read_resource(&system, "/alias/x.txt").await
    );
    assert_eq!(read_resource(&system, "/a/x.txt").await, b"shared");
}

#[tokio::test]
async fn alias_passes_query_through() {
    let (system, dir) = setup_alias().await;
    let q = Query::parse("mode=ignored&rev=2");

    system.set("/a/q.txt", "with query", &q).await.unwrap();
    assert!(system.exists("/a/q.txt", &q).await.unwrap());
    assert_eq!(std::fs::read_to_string(dir.path().join("q.txt")).unwrap(), "with query");
}

#[tokio::test]
async fn mutual_aliases_fail_with_cycle() {
    let system = ResourceSystem::with_max_depth(8);
    system.mount("/ping", UrlProvider::parse("/pong").unwrap()).await.unwrap();
    system.mount("/pong", UrlProvider::parse("/ping").unwrap()).await.unwrap();
    let q = Query::new();

    assert!(matches!(system.get("/ping/x", &q).await, Err(ResourceError::Cycle { .. })));
    assert!(matches!(system.exists("/ping/x", &q).await, Err(ResourceError::Cycle { .. })));
    assert!(matches!(system.remove("/pong/x", &q).await, Err(ResourceError::Cycle { .. })));
}

#[tokio::test]
async fn alias_chain_within_bound_resolves() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deep.txt"), "end of chain").unwrap();

    let system = ResourceSystem::with_max_depth(3);
    system.mount("/real", FilesystemProvider::new(dir.path())).await.unwrap();
    system.mount("/l1", UrlProvider::parse("/real").unwrap()).await.unwrap();
    system.mount("/l2", UrlProvider::parse("/l1").unwrap()).await.unwrap();
    system.mount("/l3", UrlProvider::parse("/l2").unwrap()).await.unwrap();
    system.mount("/l4", UrlProvider::parse("/l3").unwrap()).await.unwrap();

    assert_eq!(read_resource(&system, "/l3/deep.txt").await, b"end of chain");
    assert!(matches!(
        system.get("/l4/deep.txt", &Query::new()).await,
        Err(ResourceError::Cycle { .. })
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_while_mounting() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("r.txt"), "read me").unwrap();
    let system = Arc::new(ResourceSystem::new());
    system.mount("/data", FilesystemProvider::new(dir.path())).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let system = Arc::clone(&system);
        handles.push(tokio::spawn(async move {
            let resource = system.get("/data/r.txt", &Query::new()).await?;
            Ok::<_, ResourceError>(resource.map(|r| r.path_string()))
        }));
    }
    for i in 0..8 {
        system
            .mount(&format!("/extra{i}"), UrlProvider::parse("/data").unwrap())
            .await
            .unwrap();
    }

    for handle in handles {
        let path = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "read me");
    }
    assert_eq!(system.mounts().await.len(), 9);
}
